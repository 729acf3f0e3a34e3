// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless address finder: controller + in-memory lookup service + console widget.
//!
//! This example shows:
//! - the attach gate with a capability check,
//! - a search per keystroke and a UMPRN-first lookup on selection,
//! - fields written through an output mapping, with the organisation stripped,
//! - the fallback message when a lookup fails.
//!
//! Run:
//! - `cargo run -p understory_demos --example address_finder`
//! - `RUST_LOG=understory_autocomplete=trace cargo run -p understory_demos --example address_finder`

use async_trait::async_trait;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use understory_autocomplete::{
    AddressRecord, Configuration, Controller, Hooks, InputEvent, InputWidget, KeyStatus,
    LookupClient, LookupError, RequestOptions, SearchResults, Settings, Suggestion, WidgetError,
    WidgetFactory, WidgetOptions,
};
use understory_field_map::{FieldKind, MemoryDocument};

/// A tiny address dataset standing in for the remote service.
struct Directory {
    entries: Vec<(Suggestion, AddressRecord)>,
}

impl Directory {
    fn sample() -> Self {
        let downing = |organisation: &str, line_1: &str| {
            AddressRecord::new()
                .with("organisation_name", organisation)
                .with("line_1", line_1)
                .with("post_town", "London")
                .with("postcode", "SW1A 2AA")
        };
        Self {
            entries: vec![
                (
                    Suggestion::new("Prime Minister's Office, 10 Downing Street, London")
                        .with_udprn(23747771),
                    downing("Prime Minister's Office", "10 Downing Street"),
                ),
                (
                    Suggestion::new("Flat 1, 11 Downing Street, London")
                        .with_udprn(23747772)
                        .with_umprn(50906066),
                    downing("", "Flat 1, 11 Downing Street"),
                ),
                (
                    // Listed, but the service has no record behind it.
                    Suggestion::new("12 Downing Street, London").with_udprn(1),
                    AddressRecord::new(),
                ),
            ],
        }
    }

    fn find(&self, matches: impl Fn(&Suggestion) -> bool) -> Result<AddressRecord, LookupError> {
        self.entries
            .iter()
            .find(|(s, record)| matches(s) && !record.is_empty())
            .map(|(_, record)| record.clone())
            .ok_or_else(|| LookupError::Service {
                status: 404,
                message: "address not found".into(),
            })
    }
}

#[async_trait(?Send)]
impl LookupClient for Directory {
    async fn check_key(&self, options: &RequestOptions) -> Result<KeyStatus, LookupError> {
        Ok(KeyStatus {
            available: options.licensee.as_deref() != Some("revoked"),
        })
    }

    async fn autocomplete(
        &self,
        query: &str,
        _options: &RequestOptions,
    ) -> Result<SearchResults, LookupError> {
        let query = query.to_lowercase();
        let hits = self
            .entries
            .iter()
            .filter(|(s, _)| s.suggestion.to_lowercase().contains(&query))
            .map(|(s, _)| s.clone())
            .collect();
        Ok(SearchResults { hits })
    }

    async fn lookup_umprn(
        &self,
        umprn: u64,
        _options: &RequestOptions,
    ) -> Result<AddressRecord, LookupError> {
        self.find(|s| s.umprn == Some(umprn))
    }

    async fn lookup_udprn(
        &self,
        udprn: u64,
        _options: &RequestOptions,
    ) -> Result<AddressRecord, LookupError> {
        self.find(|s| s.udprn == Some(udprn))
    }
}

/// Widget that renders to the log.
struct ConsoleWidget {
    input: String,
}

impl InputWidget for ConsoleWidget {
    fn set_message(&mut self, message: Option<&str>) {
        if let Some(message) = message {
            warn!(input = %self.input, "{message}");
        }
    }

    fn set_suggestions(&mut self, suggestions: &[Suggestion]) {
        for (i, s) in suggestions.iter().enumerate() {
            info!(input = %self.input, "  {i}: {}", s.suggestion);
        }
    }

    fn detach(&mut self) {
        info!(input = %self.input, "widget removed");
    }
}

struct Console;

impl WidgetFactory for Console {
    type Widget = ConsoleWidget;

    fn build(&self, options: WidgetOptions) -> Result<ConsoleWidget, WidgetError> {
        Ok(ConsoleWidget {
            input: options.input.to_string(),
        })
    }
}

fn form() -> MemoryDocument {
    let mut form = MemoryDocument::new();
    form.add("#line1", FieldKind::Input);
    form.add("#town", FieldKind::Input);
    form.add("#billing-town", FieldKind::TextArea);
    form.add("#postcode", FieldKind::Input);
    form.add("#organisation", FieldKind::Input);
    form.add("#country", FieldKind::Other);
    form
}

fn settings(licensee: &str) -> Result<Settings, Box<dyn std::error::Error>> {
    Ok(Settings::from_json(&format!(
        r##"{{
            "inputField": "#address",
            "checkKey": true,
            "removeOrganisation": true,
            "licensee": "{licensee}",
            "tags": ["demo"],
            "outputFields": {{
                "line_1": "#line1",
                "post_town": ["#town", "#billing-town"],
                "postcode": "#postcode",
                "organisation_name": "#organisation",
                "country": "#country"
            }}
        }}"##
    ))?)
}

fn hooks() -> Hooks {
    Hooks::default()
        .on_loaded(|| info!("address finder ready"))
        .on_failed_check(|failure| warn!(?failure, "address finder disabled"))
        .on_suggestions_retrieved(|hits| info!(count = hits.len(), "suggestions"))
        .on_address_selected(|s| info!(suggestion = %s.suggestion, "selected"))
        .on_address_populated(|address, written| {
            info!(attributes = address.len(), written, "form filled");
        })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Configuration::new(settings("acme")?).with_hooks(hooks());
    let finder = Controller::create(config, Directory::sample(), Console, form()).await?;

    for text in ["d", "do", "downing"] {
        finder.handle_input(&InputEvent::new(text)).await;
    }

    let flat = Suggestion::new("Flat 1, 11 Downing Street, London")
        .with_udprn(23747772)
        .with_umprn(50906066);
    finder.handle_selection(&flat).await;
    for selector in ["#line1", "#town", "#billing-town", "#postcode", "#organisation"] {
        info!(selector, value = ?finder.document().values(selector), "field");
    }

    // No record behind this one: the widget shows the fallback message.
    finder
        .handle_selection(&Suggestion::new("12 Downing Street, London").with_udprn(1))
        .await;

    finder.detach();
    finder.handle_input(&InputEvent::new("ignored")).await;

    // A revoked licensee fails the check, so the widget never attaches.
    let config = Configuration::new(settings("revoked")?).with_hooks(hooks());
    let rejected = Controller::create(config, Directory::sample(), Console, form()).await?;
    info!(gate = ?rejected.gate(), attached = rejected.is_attached(), "second finder");

    Ok(())
}
