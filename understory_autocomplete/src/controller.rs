// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The autocomplete controller.
//!
//! ## Attach gate
//!
//! [`Controller::start`] decides whether the widget attaches automatically:
//!
//! ```text
//! Pending ──(check_key off)──────────────────────────▶ Attached
//! Pending ──(check_key on)──▶ Checking ──(available)──▶ Attached
//!                                      └─(otherwise)──▶ Rejected
//! ```
//!
//! `Rejected` is terminal for the automatic path: `on_failed_check` fires once and nothing is
//! retried. A transport failure during the check counts as a rejection and is reported as
//! [`CheckFailure::Error`]. The gate only guards the automatic path; [`Controller::attach`]
//! still works afterwards.
//!
//! ## Attachment
//!
//! The controller holds at most one widget. [`attach`](Controller::attach) is a no-op while a
//! widget is attached and [`detach`](Controller::detach) is a no-op while none is. Attaching
//! builds exactly one widget and makes the controller the single receiver of search results
//! for that widget; detaching releases both.
//!
//! ## Ordering
//!
//! Every request is issued as soon as its event arrives and nothing is cancelled. Responses
//! are applied in arrival order, so a slow response to an old keystroke can replace the
//! suggestions of a newer one. Search results that arrive while detached are dropped. Lookups
//! that complete after a detach still populate fields; only the widget message is skipped.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::mem;

use tracing::{debug, info, trace, warn};
use understory_field_map::{FieldMapping, FormDocument, Selector, populate};

use crate::hooks::{BoundHooks, WidgetHooks};
use crate::lookup::{AddressId, AddressRecord, LookupClient, LookupError, SearchResults, Suggestion};
use crate::settings::{Configuration, RequestOptions};
use crate::widget::{InputEvent, InputWidget, WidgetError, WidgetFactory, WidgetOptions};

/// Message shown by the widget whenever a search or lookup fails.
pub const FALLBACK_MESSAGE: &str =
    "We are unable to retrieve your address at the moment. Please enter your address manually.";

/// Progress of the automatic attach path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GateState {
    /// [`Controller::start`] has not run, or its attach failed.
    Pending,
    /// Waiting for the capability check.
    Checking,
    /// The gate let the widget attach. A later detach does not change this.
    Attached,
    /// The capability check failed; the widget was not attached.
    Rejected,
}

/// Why the capability check did not let the widget attach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckFailure {
    /// The service answered that the credentials are not usable.
    Unavailable,
    /// The check itself failed.
    Error(LookupError),
}

enum Attachment<W> {
    Detached,
    Attached(W),
}

/// Coordinates a [`LookupClient`], an input widget, and a form.
///
/// - `C` issues lookup-service requests.
/// - `F` builds the widget on attach.
/// - `D` receives resolved addresses.
///
/// The controller is driven from a single-threaded event loop. Event entry points take `&self`
/// and may be in flight concurrently; hosts typically keep the controller in an `Rc` and spawn
/// each entry point as a local task.
///
/// Requests are never cancelled and responses are applied in arrival order, so a slow
/// response to an old keystroke can replace the suggestions of a newer one. Search results
/// that arrive while detached are dropped; a lookup that completes after a detach still
/// populates fields.
pub struct Controller<C, F, D>
where
    F: WidgetFactory,
{
    input: Selector,
    options: RequestOptions,
    fields: FieldMapping,
    check_key: bool,
    remove_organisation: bool,
    hooks: BoundHooks,
    widget_hooks: WidgetHooks,
    client: C,
    widgets: F,
    document: RefCell<D>,
    gate: Cell<GateState>,
    attachment: RefCell<Attachment<F::Widget>>,
}

impl<C, F, D> Controller<C, F, D>
where
    C: LookupClient,
    F: WidgetFactory,
    D: FormDocument,
{
    /// Build a controller from `config`.
    ///
    /// Derives the request options, output mapping, and hooks once. Does not attach; call
    /// [`start`](Self::start) to run the attach gate, or use [`create`](Self::create).
    pub fn new(config: Configuration, client: C, widgets: F, document: D) -> Self {
        let Configuration { settings, hooks } = config;
        let (hooks, widget_hooks) = hooks.bind();
        debug!(
            input = %settings.input_field,
            check_key = settings.check_key,
            remove_organisation = settings.remove_organisation,
            outputs = settings.output_fields.len(),
            "controller configured"
        );
        Self {
            input: settings.input_field,
            options: settings.request,
            fields: settings.output_fields,
            check_key: settings.check_key,
            remove_organisation: settings.remove_organisation,
            hooks,
            widget_hooks,
            client,
            widgets,
            document: RefCell::new(document),
            gate: Cell::new(GateState::Pending),
            attachment: RefCell::new(Attachment::Detached),
        }
    }

    /// [`new`](Self::new) followed by [`start`](Self::start).
    pub async fn create(
        config: Configuration,
        client: C,
        widgets: F,
        document: D,
    ) -> Result<Self, WidgetError> {
        let controller = Self::new(config, client, widgets, document);
        controller.start().await?;
        Ok(controller)
    }

    /// Run the attach gate.
    ///
    /// Runs once; later calls return the current state without issuing requests. A widget
    /// build failure leaves the gate [`Pending`](GateState::Pending) so `start` can be retried.
    pub async fn start(&self) -> Result<GateState, WidgetError> {
        if self.gate.get() != GateState::Pending {
            return Ok(self.gate.get());
        }

        if self.check_key {
            self.gate.set(GateState::Checking);
            debug!("checking key");
            let failure = match self.client.check_key(&self.options).await {
                Ok(status) if status.available => None,
                Ok(_) => Some(CheckFailure::Unavailable),
                Err(error) => Some(CheckFailure::Error(error)),
            };
            if let Some(failure) = failure {
                warn!(?failure, "key check failed; not attaching");
                self.gate.set(GateState::Rejected);
                (self.hooks.on_failed_check)(&failure);
                return Ok(GateState::Rejected);
            }
        }

        self.gate.set(GateState::Attached);
        if let Err(error) = self.attach() {
            warn!(%error, "attach failed");
            self.gate.set(GateState::Pending);
            return Err(error);
        }
        Ok(GateState::Attached)
    }

    /// Build and attach the widget.
    ///
    /// Returns `Ok(false)` without doing anything if a widget is already attached.
    pub fn attach(&self) -> Result<bool, WidgetError> {
        if self.is_attached() {
            trace!("attach ignored; already attached");
            return Ok(false);
        }

        let widget = self.widgets.build(WidgetOptions {
            input: self.input.clone(),
            hooks: self.widget_hooks.clone(),
        })?;
        *self.attachment.borrow_mut() = Attachment::Attached(widget);
        info!(input = %self.input, "widget attached");

        (self.hooks.on_loaded)();
        Ok(true)
    }

    /// Detach and drop the widget.
    ///
    /// Returns `false` without doing anything if no widget is attached.
    pub fn detach(&self) -> bool {
        let previous = mem::replace(&mut *self.attachment.borrow_mut(), Attachment::Detached);
        match previous {
            Attachment::Detached => {
                trace!("detach ignored; not attached");
                false
            }
            Attachment::Attached(mut widget) => {
                widget.detach();
                info!(input = %self.input, "widget detached");
                true
            }
        }
    }

    /// Input adapter: run the input hook, clear any message, and search for the current text.
    ///
    /// Every call issues a search. Ignored while detached.
    pub async fn handle_input(&self, event: &InputEvent) {
        if !self.is_attached() {
            debug!("input ignored; not attached");
            return;
        }

        (self.hooks.on_input)(event);
        self.with_widget(|widget| widget.set_message(None));

        debug!(query = %event.value, "searching");
        let result = self.client.autocomplete(&event.value, &self.options).await;
        self.receive_suggestions(result);
    }

    /// Selection adapter: run the selection hook, clear any message, resolve the suggestion,
    /// and populate fields from the result.
    ///
    /// Ignored while detached. A lookup already in flight completes even if the widget is
    /// detached meanwhile.
    pub async fn handle_selection(&self, suggestion: &Suggestion) {
        if !self.is_attached() {
            debug!("selection ignored; not attached");
            return;
        }

        (self.hooks.on_address_selected)(suggestion);
        self.with_widget(|widget| widget.set_message(None));

        let result = match suggestion.address_id() {
            Some(AddressId::Umprn(umprn)) => {
                debug!(umprn, "looking up address");
                self.client.lookup_umprn(umprn, &self.options).await
            }
            Some(AddressId::Udprn(udprn)) => {
                debug!(udprn, "looking up address");
                self.client.lookup_udprn(udprn, &self.options).await
            }
            None => Err(LookupError::MissingIdentifier),
        };

        match result {
            Ok(address) => self.receive_address(address),
            Err(error) => self.fail(&error),
        }
    }

    /// Write `address` into the mapped output fields, returning how many fields were written.
    pub fn populate_address(&self, address: &AddressRecord) -> usize {
        populate(&self.fields, address, &mut *self.document.borrow_mut())
    }

    /// The registered result callback for autocomplete searches.
    fn receive_suggestions(&self, result: Result<SearchResults, LookupError>) {
        if !self.is_attached() {
            debug!("search results dropped; not attached");
            return;
        }
        match result {
            Ok(results) => {
                trace!(hits = results.hits.len(), "suggestions retrieved");
                (self.hooks.on_suggestions_retrieved)(&results.hits);
                self.with_widget(|widget| widget.set_suggestions(&results.hits));
            }
            Err(error) => self.fail(&error),
        }
    }

    fn receive_address(&self, mut address: AddressRecord) {
        (self.hooks.on_address_retrieved)(&address);
        if self.remove_organisation {
            address.remove_organisation();
        }
        let written = self.populate_address(&address);
        debug!(written, "address populated");
        (self.hooks.on_address_populated)(&address, written);
    }

    fn fail(&self, error: &LookupError) {
        warn!(%error, "address search failed");
        self.with_widget(|widget| widget.set_message(Some(FALLBACK_MESSAGE)));
        (self.hooks.on_search_error)(error);
    }

    fn with_widget(&self, f: impl FnOnce(&mut F::Widget)) {
        if let Attachment::Attached(widget) = &mut *self.attachment.borrow_mut() {
            f(widget);
        }
    }
}

impl<C, F, D> Controller<C, F, D>
where
    F: WidgetFactory,
{
    /// Current state of the attach gate.
    pub fn gate(&self) -> GateState {
        self.gate.get()
    }

    /// Whether a widget is attached right now.
    pub fn is_attached(&self) -> bool {
        matches!(*self.attachment.borrow(), Attachment::Attached(_))
    }

    /// Input element the widget binds to.
    pub fn input(&self) -> &Selector {
        &self.input
    }

    /// Allow-listed options sent with every request.
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Output field mapping.
    pub fn fields(&self) -> &FieldMapping {
        &self.fields
    }

    /// Whether the attach gate runs a capability check.
    pub fn check_key(&self) -> bool {
        self.check_key
    }

    /// Whether the organisation attribute is stripped before populating.
    pub fn remove_organisation(&self) -> bool {
        self.remove_organisation
    }

    /// The lookup client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The widget factory.
    pub fn widgets(&self) -> &F {
        &self.widgets
    }

    /// The form document.
    ///
    /// # Panics
    ///
    /// Panics if called while the controller is writing fields, which only a
    /// [`FormDocument`] implementation could observe.
    pub fn document(&self) -> Ref<'_, D> {
        self.document.borrow()
    }
}

impl<C, F, D> fmt::Debug for Controller<C, F, D>
where
    F: WidgetFactory,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("input", &self.input)
            .field("options", &self.options)
            .field("fields", &self.fields)
            .field("check_key", &self.check_key)
            .field("remove_organisation", &self.remove_organisation)
            .field("widget_hooks", &self.widget_hooks)
            .field("gate", &self.gate.get())
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}
