// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller configuration.
//!
//! Configuration has a data half, [`Settings`], which can be read from JSON, and a callable
//! half, [`Hooks`]. [`Configuration`] bundles both and is consumed once by
//! [`Controller::new`](crate::Controller::new).
//!
//! The request-shaping options forwarded to the lookup service are a fixed set,
//! [`RequestOptions`]. Any other key in a settings document is dropped while parsing, so an
//! unsupported parameter can never reach a lookup request.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use understory_field_map::{FieldMapping, Selector, Targets};

use crate::hooks::Hooks;

/// Lookup-service options forwarded verbatim with every request.
///
/// This is the complete allow-list. Unset options are omitted from serialized requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Sub-licensee the requests are billed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licensee: Option<String>,
    /// Restrict returned address attributes to these names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<String>>,
    /// Free-form tags attached to requests for usage reporting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl RequestOptions {
    /// Whether no option is set.
    pub fn is_empty(&self) -> bool {
        self.licensee.is_none() && self.filter.is_none() && self.tags.is_none()
    }

    /// Options as query-string pairs, lists joined with commas.
    ///
    /// ```rust
    /// use understory_autocomplete::RequestOptions;
    ///
    /// let options = RequestOptions {
    ///     licensee: Some("acme".into()),
    ///     filter: None,
    ///     tags: Some(vec!["checkout".into(), "web".into()]),
    /// };
    /// assert_eq!(
    ///     options.query_pairs(),
    ///     vec![("licensee", "acme".to_string()), ("tags", "checkout,web".to_string())],
    /// );
    /// ```
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(licensee) = &self.licensee {
            pairs.push(("licensee", licensee.clone()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.join(",")));
        }
        if let Some(tags) = &self.tags {
            pairs.push(("tags", tags.join(",")));
        }
        pairs
    }
}

/// Serializable controller settings.
///
/// Read from a camel-cased document:
///
/// ```rust
/// use understory_autocomplete::Settings;
///
/// let settings = Settings::from_json(r##"{
///     "inputField": "#addr",
///     "checkKey": true,
///     "outputFields": { "line_1": "#l1", "post_town": ["#town"] },
///     "licensee": "acme",
///     "apiSecret": "never forwarded"
/// }"##).unwrap();
///
/// assert!(settings.check_key);
/// assert_eq!(settings.request.licensee.as_deref(), Some("acme"));
/// assert_eq!(settings.output_fields.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Input element the widget binds to. Required.
    pub input_field: Selector,
    /// Run the capability check before attaching.
    #[serde(default)]
    pub check_key: bool,
    /// Strip the organisation attribute from resolved addresses before populating fields.
    #[serde(default)]
    pub remove_organisation: bool,
    /// Where resolved address attributes are written.
    #[serde(default)]
    pub output_fields: FieldMapping,
    /// Allow-listed request options.
    #[serde(flatten)]
    pub request: RequestOptions,
}

impl Settings {
    /// Settings for `input_field` with everything else at its default.
    pub fn new(input_field: impl Into<Selector>) -> Self {
        Self {
            input_field: input_field.into(),
            check_key: false,
            remove_organisation: false,
            output_fields: FieldMapping::new(),
            request: RequestOptions::default(),
        }
    }

    /// Parse settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()
    }

    /// Parse settings from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_value(value)?;
        settings.validate()
    }

    fn validate(self) -> Result<Self, SettingsError> {
        if self.input_field.as_str().trim().is_empty() {
            return Err(SettingsError::EmptyInputField);
        }
        Ok(self)
    }

    /// Enable or disable the capability check.
    #[must_use]
    pub fn with_check_key(mut self, check_key: bool) -> Self {
        self.check_key = check_key;
        self
    }

    /// Enable or disable organisation removal.
    #[must_use]
    pub fn with_remove_organisation(mut self, remove: bool) -> Self {
        self.remove_organisation = remove;
        self
    }

    /// Bind an address attribute to one or more output fields.
    #[must_use]
    pub fn with_output(mut self, attribute: impl Into<String>, targets: impl Into<Targets>) -> Self {
        self.output_fields.insert(attribute, targets);
        self
    }

    /// Replace the request options.
    #[must_use]
    pub fn with_request(mut self, request: RequestOptions) -> Self {
        self.request = request;
        self
    }
}

/// Errors reading [`Settings`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),

    /// `inputField` is present but blank.
    #[error("inputField must not be empty")]
    EmptyInputField,
}

/// Everything a [`Controller`](crate::Controller) is built from.
#[derive(Clone, Debug)]
pub struct Configuration {
    /// Data settings.
    pub settings: Settings,
    /// Lifecycle and event hooks.
    pub hooks: Hooks,
}

impl Configuration {
    /// Configuration with no hooks.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            hooks: Hooks::default(),
        }
    }

    /// Attach hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }
}

impl From<Settings> for Configuration {
    fn from(settings: Settings) -> Self {
        Self::new(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_keys_never_reach_request_options() {
        let settings = Settings::from_value(json!({
            "inputField": "#addr",
            "licensee": "acme",
            "filter": ["line_1", "postcode"],
            "tags": ["web"],
            "api_key": "ak_secret",
            "page": 3,
            "onLoaded": "not a function"
        }))
        .unwrap();

        let sent = serde_json::to_value(&settings.request).unwrap();
        let keys: Vec<&str> = sent
            .as_object()
            .map(|o| o.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["filter", "licensee", "tags"]);
    }

    #[test]
    fn unset_options_are_omitted() {
        let settings = Settings::from_json(r##"{ "inputField": "#addr" }"##).unwrap();
        assert!(settings.request.is_empty());
        assert_eq!(serde_json::to_value(&settings.request).unwrap(), json!({}));
        assert!(settings.request.query_pairs().is_empty());
    }

    #[test]
    fn flags_default_to_off() {
        let settings = Settings::from_json(r##"{ "inputField": "#addr" }"##).unwrap();
        assert!(!settings.check_key);
        assert!(!settings.remove_organisation);
        assert!(settings.output_fields.is_empty());
    }

    #[test]
    fn missing_input_field_is_an_error() {
        let err = Settings::from_json(r#"{ "checkKey": true }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
        assert!(err.to_string().contains("inputField"));
    }

    #[test]
    fn blank_input_field_is_an_error() {
        let err = Settings::from_json(r#"{ "inputField": "  " }"#).unwrap_err();
        assert!(matches!(err, SettingsError::EmptyInputField));
    }

    #[test]
    fn builder_matches_parsed_settings() {
        let parsed = Settings::from_json(
            r##"{ "inputField": "#addr", "removeOrganisation": true, "outputFields": { "line_1": "#l1" } }"##,
        )
        .unwrap();
        let built = Settings::new("#addr")
            .with_remove_organisation(true)
            .with_output("line_1", "#l1");
        assert_eq!(parsed, built);
    }
}
