// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_autocomplete --heading-base-level=0

//! Understory Autocomplete: address search-as-you-type for a single input field.
//!
//! ## Overview
//!
//! A [`Controller`] ties three collaborators together:
//!
//! - a [`LookupClient`] that talks to the address-lookup service,
//! - a [`WidgetFactory`] that builds the input widget bound to the page's address field,
//! - a [`FormDocument`](understory_field_map::FormDocument) whose fields receive the resolved
//!   address.
//!
//! The host forwards two kinds of event:
//!
//! - [`Controller::handle_input`]: the user typed. Every event issues an autocomplete search
//!   and the suggestions are handed to the widget.
//! - [`Controller::handle_selection`]: the user picked a suggestion. It is resolved by UMPRN if
//!   it has one, otherwise by UDPRN, and the result is written into the mapped output fields.
//!
//! Any failed search or lookup shows [`FALLBACK_MESSAGE`] in the widget and calls the
//! `on_search_error` hook. Nothing is retried.
//!
//! Attachment is explicit and idempotent. [`Controller::start`] runs an optional capability
//! check first; see [`GateState`].
//!
//! ## Configuration
//!
//! [`Settings`] is the declarative part of a [`Configuration`]. Only the allow-listed
//! [`RequestOptions`] (`licensee`, `filter`, `tags`) are ever sent to the service; any other
//! key in the source is ignored.
//!
//! ```rust
//! use understory_autocomplete::Settings;
//!
//! let settings = Settings::from_json(r##"{
//!     "inputField": "#address",
//!     "licensee": "acme",
//!     "apiKey": "never forwarded",
//!     "outputFields": { "post_town": ["#town", "#billing-town"] }
//! }"##).unwrap();
//!
//! assert_eq!(settings.request.query_pairs(), vec![("licensee", "acme".to_string())]);
//! ```
//!
//! ## Minimal example
//!
//! ```rust
//! use async_trait::async_trait;
//! use understory_autocomplete::understory_field_map::{FieldKind, MemoryDocument};
//! use understory_autocomplete::{
//!     AddressRecord, Controller, InputEvent, InputWidget, KeyStatus, LookupClient, LookupError,
//!     RequestOptions, SearchResults, Settings, Suggestion, WidgetError, WidgetFactory,
//!     WidgetOptions,
//! };
//!
//! struct Downing;
//!
//! #[async_trait(?Send)]
//! impl LookupClient for Downing {
//!     async fn check_key(&self, _: &RequestOptions) -> Result<KeyStatus, LookupError> {
//!         Ok(KeyStatus { available: true })
//!     }
//!     async fn autocomplete(&self, _: &str, _: &RequestOptions) -> Result<SearchResults, LookupError> {
//!         let hit = Suggestion::new("10 Downing Street, London").with_udprn(23747771);
//!         Ok(SearchResults { hits: vec![hit] })
//!     }
//!     async fn lookup_umprn(&self, _: u64, _: &RequestOptions) -> Result<AddressRecord, LookupError> {
//!         Err(LookupError::Service { status: 404, message: "no such UMPRN".into() })
//!     }
//!     async fn lookup_udprn(&self, _: u64, _: &RequestOptions) -> Result<AddressRecord, LookupError> {
//!         Ok(AddressRecord::new()
//!             .with("line_1", "10 Downing Street")
//!             .with("post_town", "London"))
//!     }
//! }
//!
//! #[derive(Default)]
//! struct List(Vec<Suggestion>);
//!
//! impl InputWidget for List {
//!     fn set_message(&mut self, _: Option<&str>) {}
//!     fn set_suggestions(&mut self, hits: &[Suggestion]) {
//!         self.0 = hits.to_vec();
//!     }
//!     fn detach(&mut self) {}
//! }
//!
//! struct Lists;
//!
//! impl WidgetFactory for Lists {
//!     type Widget = List;
//!     fn build(&self, _: WidgetOptions) -> Result<List, WidgetError> {
//!         Ok(List::default())
//!     }
//! }
//!
//! let mut form = MemoryDocument::new();
//! form.add("#line1", FieldKind::Input);
//! form.add("#town", FieldKind::Input);
//!
//! let settings = Settings::new("#address")
//!     .with_output("line_1", "#line1")
//!     .with_output("post_town", "#town");
//!
//! futures::executor::block_on(async {
//!     let controller = Controller::create(settings.into(), Downing, Lists, form)
//!         .await
//!         .unwrap();
//!
//!     controller.handle_input(&InputEvent::new("10 Down")).await;
//!     let picked = Suggestion::new("10 Downing Street, London").with_udprn(23747771);
//!     controller.handle_selection(&picked).await;
//!
//!     assert_eq!(controller.document().values("#town"), vec!["London"]);
//!     assert!(controller.detach());
//! });
//! ```
//!
//! ## Threading
//!
//! The controller is `!Sync` and its futures are `!Send`. It is meant to live on one
//! event loop, with each entry point spawned as a local task. Responses are applied in the
//! order they arrive; see [`Controller`] for the ordering rules.

mod controller;
mod hooks;
mod lookup;
mod settings;
mod widget;

#[cfg(test)]
mod testing;

pub use controller::{CheckFailure, Controller, FALLBACK_MESSAGE, GateState};
pub use hooks::{Hook, Hooks, Notify, PopulatedHook, SuggestionsHook, WidgetHooks};
pub use lookup::{
    AddressId, AddressRecord, KeyStatus, LookupClient, LookupError, ORGANISATION_ATTRIBUTE,
    SearchResults, Suggestion,
};
pub use settings::{Configuration, RequestOptions, Settings, SettingsError};
pub use widget::{InputEvent, InputWidget, WidgetError, WidgetFactory, WidgetOptions};

pub use understory_field_map;
