// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field population: copy resolved attributes into the fields a [`FieldMapping`] names.
//!
//! Population is a pure walk over the mapping:
//!
//! - attributes with no value in the [`Attributes`] source are skipped;
//! - selectors that match nothing are a silent no-op;
//! - fields that do not accept text (checkboxes, buttons, …) are skipped.
//!
//! Nothing here is an error. The return value of [`populate`] reports how many fields were
//! written so callers can log or assert on it.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use tracing::trace;

use crate::mapping::FieldMapping;
use crate::types::Selector;

/// A single writable field in a host document.
pub trait FormField {
    /// Whether the field holds a free-text value.
    fn accepts_text(&self) -> bool;

    /// Replace the field's value.
    fn set_value(&mut self, value: &str);
}

/// A host document that can resolve a [`Selector`] to its matching fields.
pub trait FormDocument {
    /// Every field matching `selector`, in document order. Empty when nothing matches.
    fn query_all(&mut self, selector: &Selector) -> Vec<&mut dyn FormField>;
}

/// Source of resolved attribute values, keyed by logical attribute name.
pub trait Attributes {
    /// Text value of `name`, or `None` if the attribute is absent or has no text form.
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl Attributes for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl<S: BuildHasher> Attributes for HashMap<String, String, S> {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl<T: Attributes + ?Sized> Attributes for &T {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).attribute(name)
    }
}

/// Write every mapped attribute of `attributes` into the matching fields of `document`.
///
/// Returns the number of fields written.
pub fn populate<A, D>(mapping: &FieldMapping, attributes: &A, document: &mut D) -> usize
where
    A: Attributes + ?Sized,
    D: FormDocument + ?Sized,
{
    let mut written = 0;
    for (attribute, targets) in mapping {
        let Some(value) = attributes.attribute(attribute) else {
            continue;
        };
        for selector in targets {
            for field in document.query_all(selector) {
                if field.accepts_text() {
                    field.set_value(&value);
                    written += 1;
                }
            }
        }
        trace!(%attribute, targets = targets.len(), "populated attribute");
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{FieldKind, MemoryDocument};

    fn address(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn writes_every_field_matched_by_every_selector() {
        let mapping = FieldMapping::new().with("line_1", ["#l1", ".line"]);
        let mut doc = MemoryDocument::new();
        doc.add("#l1", FieldKind::Input);
        doc.add(".line", FieldKind::Input);
        doc.add(".line", FieldKind::TextArea);

        let written = populate(&mapping, &address(&[("line_1", "10 Down St")]), &mut doc);

        assert_eq!(written, 3);
        assert_eq!(doc.values("#l1"), vec!["10 Down St"]);
        assert_eq!(doc.values(".line"), vec!["10 Down St", "10 Down St"]);
    }

    #[test]
    fn unmapped_attributes_are_ignored() {
        let mapping = FieldMapping::new().with("line_1", "#l1");
        let mut doc = MemoryDocument::new();
        doc.add("#l1", FieldKind::Input);
        doc.add("#pc", FieldKind::Input);

        let written = populate(
            &mapping,
            &address(&[("line_1", "1 High St"), ("postcode", "AB1 2CD")]),
            &mut doc,
        );

        assert_eq!(written, 1);
        assert_eq!(doc.values("#pc"), vec![""]);
    }

    #[test]
    fn missing_values_and_unmatched_selectors_are_silent() {
        let mapping = FieldMapping::new()
            .with("line_1", "#nowhere")
            .with("line_2", "#l2");
        let mut doc = MemoryDocument::new();
        doc.add("#l2", FieldKind::Input);

        let written = populate(&mapping, &address(&[("line_1", "1 High St")]), &mut doc);

        assert_eq!(written, 0);
        assert_eq!(doc.values("#l2"), vec![""]);
    }

    #[test]
    fn non_text_fields_are_skipped() {
        let mapping = FieldMapping::new().with("line_1", ".any");
        let mut doc = MemoryDocument::new();
        doc.add(".any", FieldKind::Other);
        doc.add(".any", FieldKind::Input);

        let written = populate(&mapping, &address(&[("line_1", "1 High St")]), &mut doc);

        assert_eq!(written, 1);
        assert_eq!(doc.values(".any"), vec!["", "1 High St"]);
    }

    #[test]
    fn hash_map_sources_work() {
        let mapping = FieldMapping::new().with("post_town", "#town");
        let mut doc = MemoryDocument::new();
        doc.add("#town", FieldKind::Input);
        let mut source = HashMap::new();
        source.insert("post_town".to_string(), "Leeds".to_string());

        assert_eq!(populate(&mapping, &source, &mut doc), 1);
        assert_eq!(doc.values("#town"), vec!["Leeds"]);
    }
}
