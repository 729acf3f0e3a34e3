// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute → selector mapping.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Deserialize;

use crate::types::Targets;

/// Mapping from logical address attribute (`line_1`, `post_town`, …) to the fields that
/// receive it.
///
/// The keys are exactly the attributes the host intends to populate. Every value is a
/// [`Targets`] list, so a mapping built or deserialized from single selectors and one built
/// from lists look the same afterwards.
///
/// Deserializes from an object whose values are a selector string or an array of them:
///
/// ```rust
/// use understory_field_map::FieldMapping;
///
/// let mapping: FieldMapping = serde_json::from_str(
///     r##"{ "line_1": "#l1", "post_town": ["#town", "#town-alt"] }"##,
/// ).unwrap();
/// assert_eq!(mapping.get("line_1").map(|t| t.len()), Some(1));
/// assert_eq!(mapping.get("post_town").map(|t| t.len()), Some(2));
/// assert!(mapping.get("postcode").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    attributes: BTreeMap<String, Targets>,
}

impl FieldMapping {
    /// An empty mapping; populating with it writes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `attribute` to `targets`, replacing any previous binding.
    pub fn insert(&mut self, attribute: impl Into<String>, targets: impl Into<Targets>) -> &mut Self {
        self.attributes.insert(attribute.into(), targets.into());
        self
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, targets: impl Into<Targets>) -> Self {
        self.insert(attribute, targets);
        self
    }

    /// Selectors bound to `attribute`, if it is mapped.
    pub fn get(&self, attribute: &str) -> Option<&Targets> {
        self.attributes.get(attribute)
    }

    /// Whether `attribute` is mapped.
    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Number of mapped attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether no attribute is mapped.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate `(attribute, targets)` in attribute order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Targets> {
        self.attributes.iter()
    }
}

impl<'a> IntoIterator for &'a FieldMapping {
    type Item = (&'a String, &'a Targets);
    type IntoIter = btree_map::Iter<'a, String, Targets>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<A, T> FromIterator<(A, T)> for FieldMapping
where
    A: Into<String>,
    T: Into<Targets>,
{
    fn from_iter<I: IntoIterator<Item = (A, T)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (attribute, targets) in iter {
            mapping.insert(attribute, targets);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Selector;

    #[test]
    fn insert_replaces_previous_binding() {
        let mut mapping = FieldMapping::new();
        mapping.insert("line_1", "#old");
        mapping.insert("line_1", ["#new", "#new-2"]);

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("line_1"), Some(&Targets::from(["#new", "#new-2"])));
    }

    #[test]
    fn mixed_shapes_normalize_to_lists() {
        let mapping: FieldMapping = [
            ("line_1", Targets::from("#l1")),
            ("post_town", Targets::from(vec!["#t1", "#t2"])),
        ]
        .into_iter()
        .collect();

        for (_, targets) in &mapping {
            assert!(!targets.is_empty());
        }
        let towns: Vec<&str> = mapping
            .get("post_town")
            .map(|t| t.iter().map(Selector::as_str).collect())
            .unwrap_or_default();
        assert_eq!(towns, vec!["#t1", "#t2"]);
    }

    #[test]
    fn deserialized_and_built_mappings_agree() {
        let parsed: FieldMapping =
            serde_json::from_str(r##"{ "line_1": "#l1", "postcode": ["#pc"] }"##).unwrap();
        let built = FieldMapping::new().with("line_1", ["#l1"]).with("postcode", "#pc");
        assert_eq!(parsed, built);
    }

    #[test]
    fn empty_object_is_empty_mapping() {
        let parsed: FieldMapping = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_empty());
        assert!(!parsed.contains("line_1"));
    }
}
