// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector and target list types.

use core::fmt;

use serde::{Deserialize, Deserializer};
use smallvec::SmallVec;

/// Opaque handle naming zero or more fields in a host document.
///
/// For a DOM host this is a CSS selector such as `#line_1` or `input[name=town]`; other hosts
/// may use any naming scheme their [`FormDocument`](crate::FormDocument) understands.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Selector(String);

impl Selector {
    /// Create a selector from any string-like value.
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// The selector text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Selector {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Selector {
    fn from(selector: &str) -> Self {
        Self::new(selector)
    }
}

impl From<String> for Selector {
    fn from(selector: String) -> Self {
        Self(selector)
    }
}

/// Ordered selectors bound to a single address attribute.
///
/// Always a list, even when built from a single selector. Order is preserved and is the order
/// in which fields are written. Duplicates are kept; writing the same value twice is harmless.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Targets(SmallVec<[Selector; 1]>);

impl Targets {
    /// An empty target list.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Append a selector.
    pub fn push(&mut self, selector: impl Into<Selector>) {
        self.0.push(selector.into());
    }

    /// Number of selectors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no selectors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate selectors in order.
    pub fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Targets {
    type Item = &'a Selector;
    type IntoIter = core::slice::Iter<'a, Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Selector> for Targets {
    fn from(selector: Selector) -> Self {
        let mut targets = Self::new();
        targets.push(selector);
        targets
    }
}

impl From<&str> for Targets {
    fn from(selector: &str) -> Self {
        Selector::from(selector).into()
    }
}

impl From<String> for Targets {
    fn from(selector: String) -> Self {
        Selector::from(selector).into()
    }
}

impl<S: Into<Selector>> From<Vec<S>> for Targets {
    fn from(selectors: Vec<S>) -> Self {
        selectors.into_iter().collect()
    }
}

impl<S: Into<Selector>, const N: usize> From<[S; N]> for Targets {
    fn from(selectors: [S; N]) -> Self {
        selectors.into_iter().collect()
    }
}

impl<S: Into<Selector>> FromIterator<S> for Targets {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'de> Deserialize<'de> for Targets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(Selector),
            Many(Vec<Selector>),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(selector) => selector.into(),
            OneOrMany::Many(selectors) => selectors.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_selector_becomes_one_element_list() {
        let targets = Targets::from("#l1");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets.iter().next().map(Selector::as_str), Some("#l1"));
    }

    #[test]
    fn list_keeps_order_and_duplicates() {
        let targets = Targets::from(["#b", "#a", "#b"]);
        let order: Vec<&str> = targets.iter().map(Selector::as_str).collect();
        assert_eq!(order, vec!["#b", "#a", "#b"]);
    }

    #[test]
    fn deserializes_string_or_array() {
        let one: Targets = serde_json::from_str(r##""#l1""##).unwrap();
        let many: Targets = serde_json::from_str(r##"["#l1", "#l1-copy"]"##).unwrap();
        assert_eq!(one, Targets::from("#l1"));
        assert_eq!(many, Targets::from(["#l1", "#l1-copy"]));
    }

    #[test]
    fn rejects_non_selector_values() {
        assert!(serde_json::from_str::<Targets>("42").is_err());
        assert!(serde_json::from_str::<Targets>(r#"{"a": "b"}"#).is_err());
    }
}
