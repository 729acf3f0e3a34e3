// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The address-lookup service seam.
//!
//! The controller never talks to the network itself. It issues four kinds of request through
//! [`LookupClient`] and reacts to the results:
//!
//! | Request                         | Result                |
//! |---------------------------------|-----------------------|
//! | [`check_key`](LookupClient::check_key)       | [`KeyStatus`]         |
//! | [`autocomplete`](LookupClient::autocomplete) | [`SearchResults`]     |
//! | [`lookup_umprn`](LookupClient::lookup_umprn) | [`AddressRecord`]     |
//! | [`lookup_udprn`](LookupClient::lookup_udprn) | [`AddressRecord`]     |
//!
//! Every request carries the allow-listed [`RequestOptions`]. Transport and service failures
//! are reported as [`LookupError`]; the controller absorbs them.

use std::borrow::Cow;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use understory_field_map::Attributes;

use crate::settings::RequestOptions;

/// Name of the organisation attribute in resolved addresses.
pub const ORGANISATION_ATTRIBUTE: &str = "organisation_name";

/// Client for the remote address-lookup service.
///
/// Futures are not required to be `Send`: the controller runs on a single-threaded event loop
/// and requests complete on that loop in whatever order responses arrive.
#[async_trait(?Send)]
pub trait LookupClient {
    /// Check that the configured credentials and options are usable.
    async fn check_key(&self, options: &RequestOptions) -> Result<KeyStatus, LookupError>;

    /// Search for addresses matching partial text.
    async fn autocomplete(
        &self,
        query: &str,
        options: &RequestOptions,
    ) -> Result<SearchResults, LookupError>;

    /// Resolve a multi-residence identifier to a full address.
    async fn lookup_umprn(
        &self,
        umprn: u64,
        options: &RequestOptions,
    ) -> Result<AddressRecord, LookupError>;

    /// Resolve a delivery-point identifier to a full address.
    async fn lookup_udprn(
        &self,
        udprn: u64,
        options: &RequestOptions,
    ) -> Result<AddressRecord, LookupError>;
}

/// Result of a capability check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStatus {
    /// Whether the service will answer requests made with these credentials.
    pub available: bool,
}

/// Result of an autocomplete search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching suggestions, best first.
    pub hits: Vec<Suggestion>,
}

/// One autocomplete suggestion.
///
/// Carries the text shown to the user and the identifiers needed to resolve it. In practice a
/// suggestion has one identifier; when it has both, the UMPRN wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Text shown in the suggestion list.
    pub suggestion: String,
    /// Delivery-point identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udprn: Option<u64>,
    /// Multi-residence identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub umprn: Option<u64>,
}

impl Suggestion {
    /// A suggestion with display text and no identifiers.
    pub fn new(suggestion: impl Into<String>) -> Self {
        Self {
            suggestion: suggestion.into(),
            udprn: None,
            umprn: None,
        }
    }

    /// Set the delivery-point identifier.
    #[must_use]
    pub fn with_udprn(mut self, udprn: u64) -> Self {
        self.udprn = Some(udprn);
        self
    }

    /// Set the multi-residence identifier.
    #[must_use]
    pub fn with_umprn(mut self, umprn: u64) -> Self {
        self.umprn = Some(umprn);
        self
    }

    /// The identifier a lookup for this suggestion uses: UMPRN if present, else UDPRN.
    pub fn address_id(&self) -> Option<AddressId> {
        self.umprn
            .map(AddressId::Umprn)
            .or(self.udprn.map(AddressId::Udprn))
    }
}

/// Identifier used to resolve a suggestion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AddressId {
    /// Multi-residence identifier.
    Umprn(u64),
    /// Delivery-point identifier.
    Udprn(u64),
}

/// A fully resolved address: attribute name → JSON scalar.
///
/// Attribute values render as text for field population: strings verbatim, numbers and
/// booleans in canonical form, `null` as the empty string. Arrays and objects have no text
/// form and are never written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressRecord(Map<String, Value>);

impl AddressRecord {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, returning the previous value.
    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(attribute.into(), value.into())
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(attribute, value);
        self
    }

    /// Raw value of an attribute.
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.0.get(attribute)
    }

    /// Whether the attribute is present.
    pub fn contains(&self, attribute: &str) -> bool {
        self.0.contains_key(attribute)
    }

    /// Remove an attribute, returning its value.
    pub fn remove(&mut self, attribute: &str) -> Option<Value> {
        self.0.remove(attribute)
    }

    /// Remove the organisation attribute.
    pub fn remove_organisation(&mut self) -> Option<Value> {
        self.remove(ORGANISATION_ATTRIBUTE)
    }

    /// Text form of an attribute, if it has one.
    pub fn text(&self, attribute: &str) -> Option<Cow<'_, str>> {
        match self.0.get(attribute)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Null => Some(Cow::Borrowed("")),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(attribute, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl Attributes for AddressRecord {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.text(name)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AddressRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Failure of a lookup-service request.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LookupError {
    /// The request never produced a response (connection refused, timeout, …).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with an error.
    #[error("lookup service error {status}: {message}")]
    Service {
        /// Status code reported by the service.
        status: u16,
        /// Message reported by the service.
        message: String,
    },

    /// A selected suggestion carries neither a UMPRN nor a UDPRN, so no lookup was issued.
    #[error("suggestion carries neither a UMPRN nor a UDPRN")]
    MissingIdentifier,
}
