// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory [`FormDocument`] for headless hosts and tests.

use crate::populate::{FormDocument, FormField};
use crate::types::Selector;

/// Kind of an in-memory field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single-line text input.
    Input,
    /// Multi-line text area.
    TextArea,
    /// Anything that does not hold free text (checkbox, button, …).
    Other,
}

/// A field stored in a [`MemoryDocument`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryField {
    /// What kind of field this is.
    pub kind: FieldKind,
    /// Current value.
    pub value: String,
}

impl FormField for MemoryField {
    fn accepts_text(&self) -> bool {
        matches!(self.kind, FieldKind::Input | FieldKind::TextArea)
    }

    fn set_value(&mut self, value: &str) {
        self.value.clear();
        self.value.push_str(value);
    }
}

/// Flat list of fields, each registered under one selector.
///
/// Selectors are matched by exact text; there is no selector engine. Register a field once per
/// selector it should answer to.
#[derive(Clone, Debug, Default)]
pub struct MemoryDocument {
    fields: Vec<(Selector, MemoryField)>,
}

impl MemoryDocument {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty field of `kind` under `selector`.
    pub fn add(&mut self, selector: impl Into<Selector>, kind: FieldKind) {
        self.fields.push((
            selector.into(),
            MemoryField {
                kind,
                value: String::new(),
            },
        ));
    }

    /// Values of the fields registered under `selector`, in registration order.
    pub fn values(&self, selector: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(s, _)| s.as_str() == selector)
            .map(|(_, f)| f.value.as_str())
            .collect()
    }

    /// Reset every field to the empty string.
    pub fn clear(&mut self) {
        for (_, field) in &mut self.fields {
            field.value.clear();
        }
    }
}

impl FormDocument for MemoryDocument {
    fn query_all(&mut self, selector: &Selector) -> Vec<&mut dyn FormField> {
        self.fields
            .iter_mut()
            .filter(|(s, _)| s == selector)
            .map(|(_, f)| f as &mut dyn FormField)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_matches_exact_selector_only() {
        let mut doc = MemoryDocument::new();
        doc.add("#a", FieldKind::Input);
        doc.add("#ab", FieldKind::Input);

        assert_eq!(doc.query_all(&Selector::from("#a")).len(), 1);
        assert!(doc.query_all(&Selector::from("#b")).is_empty());
    }

    #[test]
    fn clear_resets_values() {
        let mut doc = MemoryDocument::new();
        doc.add("#a", FieldKind::Input);
        for field in doc.query_all(&Selector::from("#a")) {
            field.set_value("x");
        }
        assert_eq!(doc.values("#a"), vec!["x"]);
        doc.clear();
        assert_eq!(doc.values("#a"), vec![""]);
    }
}
