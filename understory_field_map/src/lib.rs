// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_field_map --heading-base-level=0

//! Understory Field Map: write resolved address attributes into form fields.
//!
//! ## Overview
//!
//! An address lookup resolves to a flat set of named attributes (`line_1`, `post_town`,
//! `postcode`, …). A page wants some of those attributes copied into its own form fields.
//! This crate describes that binding and performs the copy:
//!
//! - [`Selector`]: an opaque handle naming zero or more fields in a host document.
//! - [`Targets`]: the ordered selectors bound to one attribute. A single selector and a list of
//!   selectors both normalize to a list.
//! - [`FieldMapping`]: logical attribute name → [`Targets`]. Attributes missing from the
//!   mapping are never written.
//! - [`FormDocument`] / [`FormField`]: the seam to the host's fields. The crate never
//!   interprets selectors itself; the document resolves them.
//! - [`Attributes`]: the seam to the resolved values.
//! - [`populate`]: for each mapped attribute with a value, for each selector, for each matching
//!   field that accepts text, set the value.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use understory_field_map::{populate, FieldKind, FieldMapping, MemoryDocument};
//!
//! let mut mapping = FieldMapping::new();
//! mapping.insert("line_1", "#l1");
//! mapping.insert("post_town", ["#town", "#town-copy"]);
//!
//! let mut document = MemoryDocument::new();
//! document.add("#l1", FieldKind::Input);
//! document.add("#town", FieldKind::Input);
//! document.add("#town-copy", FieldKind::TextArea);
//!
//! let mut address = BTreeMap::new();
//! address.insert("line_1".to_string(), "10 Downing Street".to_string());
//! address.insert("post_town".to_string(), "London".to_string());
//! address.insert("postcode".to_string(), "SW1A 2AA".to_string());
//!
//! // `postcode` is not mapped, so three fields are written.
//! assert_eq!(populate(&mapping, &address, &mut document), 3);
//! assert_eq!(document.values("#town-copy"), vec!["London"]);
//! ```
//!
//! Mappings can also be read from configuration; see [`FieldMapping`] for the accepted shape.

mod mapping;
mod memory;
mod populate;
mod types;

pub use mapping::FieldMapping;
pub use memory::{FieldKind, MemoryDocument, MemoryField};
pub use populate::{Attributes, FormDocument, FormField, populate};
pub use types::{Selector, Targets};
