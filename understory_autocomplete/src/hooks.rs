// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle and event hooks.
//!
//! Every hook is optional. Unset hooks resolve to a no-op once, when the controller is built,
//! so the controller calls each hook unconditionally.
//!
//! Hooks run on the event loop that drives the controller. They may call back into the
//! controller (for example, detaching from `on_address_populated`).

use std::fmt;
use std::rc::Rc;

use crate::controller::CheckFailure;
use crate::lookup::{AddressRecord, LookupError, Suggestion};
use crate::widget::InputEvent;

/// Hook with no payload.
pub type Notify = Rc<dyn Fn()>;

/// Hook receiving a borrowed payload.
pub type Hook<T> = Rc<dyn Fn(&T)>;

/// Hook receiving the suggestions of a search.
pub type SuggestionsHook = Rc<dyn Fn(&[Suggestion])>;

/// Hook receiving the address written to fields and how many fields were written.
pub type PopulatedHook = Rc<dyn Fn(&AddressRecord, usize)>;

/// Optional hooks supplied with a [`Configuration`](crate::Configuration).
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use understory_autocomplete::Hooks;
///
/// let loaded = Rc::new(Cell::new(false));
/// let flag = loaded.clone();
/// let hooks = Hooks::default()
///     .on_loaded(move || flag.set(true))
///     .on_search_error(|error| eprintln!("lookup failed: {error}"));
/// # let _ = hooks;
/// ```
#[derive(Clone, Default)]
pub struct Hooks {
    on_loaded: Option<Notify>,
    on_failed_check: Option<Hook<CheckFailure>>,
    on_suggestions_retrieved: Option<SuggestionsHook>,
    on_address_selected: Option<Hook<Suggestion>>,
    on_address_retrieved: Option<Hook<AddressRecord>>,
    on_address_populated: Option<PopulatedHook>,
    on_search_error: Option<Hook<LookupError>>,
    on_input: Option<Hook<InputEvent>>,
    widget: WidgetHooks,
}

impl Hooks {
    /// Called after the widget attaches.
    #[must_use]
    pub fn on_loaded(mut self, f: impl Fn() + 'static) -> Self {
        self.on_loaded = Some(Rc::new(f));
        self
    }

    /// Called once when the capability check does not let the widget attach.
    #[must_use]
    pub fn on_failed_check(mut self, f: impl Fn(&CheckFailure) + 'static) -> Self {
        self.on_failed_check = Some(Rc::new(f));
        self
    }

    /// Called with every successful search result, before the widget renders it.
    #[must_use]
    pub fn on_suggestions_retrieved(mut self, f: impl Fn(&[Suggestion]) + 'static) -> Self {
        self.on_suggestions_retrieved = Some(Rc::new(f));
        self
    }

    /// Called when the user picks a suggestion, before the lookup is issued.
    #[must_use]
    pub fn on_address_selected(mut self, f: impl Fn(&Suggestion) + 'static) -> Self {
        self.on_address_selected = Some(Rc::new(f));
        self
    }

    /// Called with the raw resolved address, before any organisation removal.
    #[must_use]
    pub fn on_address_retrieved(mut self, f: impl Fn(&AddressRecord) + 'static) -> Self {
        self.on_address_retrieved = Some(Rc::new(f));
        self
    }

    /// Called after fields are written, with the address as written.
    #[must_use]
    pub fn on_address_populated(mut self, f: impl Fn(&AddressRecord, usize) + 'static) -> Self {
        self.on_address_populated = Some(Rc::new(f));
        self
    }

    /// Called when a search or lookup fails.
    #[must_use]
    pub fn on_search_error(mut self, f: impl Fn(&LookupError) + 'static) -> Self {
        self.on_search_error = Some(Rc::new(f));
        self
    }

    /// Called with every input event, before the search is issued.
    #[must_use]
    pub fn on_input(mut self, f: impl Fn(&InputEvent) + 'static) -> Self {
        self.on_input = Some(Rc::new(f));
        self
    }

    /// Passed through to the widget: suggestion list opened.
    #[must_use]
    pub fn on_open(mut self, f: impl Fn() + 'static) -> Self {
        self.widget.on_open = Some(Rc::new(f));
        self
    }

    /// Passed through to the widget: input lost focus.
    #[must_use]
    pub fn on_blur(mut self, f: impl Fn() + 'static) -> Self {
        self.widget.on_blur = Some(Rc::new(f));
        self
    }

    /// Passed through to the widget: suggestion list closed.
    #[must_use]
    pub fn on_close(mut self, f: impl Fn() + 'static) -> Self {
        self.widget.on_close = Some(Rc::new(f));
        self
    }

    /// Passed through to the widget: input gained focus.
    #[must_use]
    pub fn on_focus(mut self, f: impl Fn() + 'static) -> Self {
        self.widget.on_focus = Some(Rc::new(f));
        self
    }

    /// Resolve unset hooks to no-ops and split off the widget passthrough hooks.
    pub(crate) fn bind(self) -> (BoundHooks, WidgetHooks) {
        fn notify() -> Notify {
            Rc::new(|| {})
        }
        fn ignore<T: ?Sized + 'static>() -> Rc<dyn Fn(&T)> {
            Rc::new(|_: &T| {})
        }

        let bound = BoundHooks {
            on_loaded: self.on_loaded.unwrap_or_else(notify),
            on_failed_check: self.on_failed_check.unwrap_or_else(ignore),
            on_suggestions_retrieved: self.on_suggestions_retrieved.unwrap_or_else(ignore),
            on_address_selected: self.on_address_selected.unwrap_or_else(ignore),
            on_address_retrieved: self.on_address_retrieved.unwrap_or_else(ignore),
            on_address_populated: self
                .on_address_populated
                .unwrap_or_else(|| Rc::new(|_: &AddressRecord, _: usize| {})),
            on_search_error: self.on_search_error.unwrap_or_else(ignore),
            on_input: self.on_input.unwrap_or_else(ignore),
        };
        (bound, self.widget)
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_loaded", &self.on_loaded.is_some())
            .field("on_failed_check", &self.on_failed_check.is_some())
            .field(
                "on_suggestions_retrieved",
                &self.on_suggestions_retrieved.is_some(),
            )
            .field("on_address_selected", &self.on_address_selected.is_some())
            .field("on_address_retrieved", &self.on_address_retrieved.is_some())
            .field("on_address_populated", &self.on_address_populated.is_some())
            .field("on_search_error", &self.on_search_error.is_some())
            .field("on_input", &self.on_input.is_some())
            .field("widget", &self.widget)
            .finish()
    }
}

/// Hooks forwarded to the widget as-is.
///
/// Input and selection are routed through the controller, so only the remaining widget
/// events pass through. A `None` hook is simply not registered with the widget.
#[derive(Clone, Default)]
pub struct WidgetHooks {
    /// Suggestion list opened.
    pub on_open: Option<Notify>,
    /// Input lost focus.
    pub on_blur: Option<Notify>,
    /// Suggestion list closed.
    pub on_close: Option<Notify>,
    /// Input gained focus.
    pub on_focus: Option<Notify>,
}

impl fmt::Debug for WidgetHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetHooks")
            .field("on_open", &self.on_open.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_focus", &self.on_focus.is_some())
            .finish()
    }
}

/// Hooks with every slot filled.
#[derive(Clone)]
pub(crate) struct BoundHooks {
    pub(crate) on_loaded: Notify,
    pub(crate) on_failed_check: Hook<CheckFailure>,
    pub(crate) on_suggestions_retrieved: SuggestionsHook,
    pub(crate) on_address_selected: Hook<Suggestion>,
    pub(crate) on_address_retrieved: Hook<AddressRecord>,
    pub(crate) on_address_populated: PopulatedHook,
    pub(crate) on_search_error: Hook<LookupError>,
    pub(crate) on_input: Hook<InputEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn unset_hooks_bind_to_no_ops() {
        let (bound, widget) = Hooks::default().bind();
        (bound.on_loaded)();
        (bound.on_failed_check)(&CheckFailure::Unavailable);
        (bound.on_suggestions_retrieved)(&[] as &[Suggestion]);
        (bound.on_search_error)(&LookupError::MissingIdentifier);
        (bound.on_address_populated)(&AddressRecord::default(), 0);
        assert!(widget.on_open.is_none());
        assert!(widget.on_focus.is_none());
    }

    #[test]
    fn supplied_hooks_are_kept() {
        let calls = Rc::new(Cell::new(0));
        let (a, b) = (calls.clone(), calls.clone());
        let (bound, widget) = Hooks::default()
            .on_loaded(move || a.set(a.get() + 1))
            .on_blur(move || b.set(b.get() + 10))
            .bind();

        (bound.on_loaded)();
        if let Some(on_blur) = &widget.on_blur {
            on_blur();
        }
        assert_eq!(calls.get(), 11);
        assert!(widget.on_close.is_none());
    }

    #[test]
    fn debug_reports_which_hooks_are_set() {
        let hooks = Hooks::default().on_input(|_| {});
        let text = format!("{hooks:?}");
        assert!(text.contains("on_input: true"));
        assert!(text.contains("on_loaded: false"));
    }
}
