// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The input widget seam.
//!
//! The widget owns rendering: the text box, the suggestion list, and binding to the host's
//! input element. The controller builds one through a [`WidgetFactory`] on attach, drives it
//! through [`InputWidget`], and tears it down on detach.
//!
//! Input and selection events flow the other way. The host forwards them to
//! [`Controller::handle_input`](crate::Controller::handle_input) and
//! [`Controller::handle_selection`](crate::Controller::handle_selection); those are the input
//! and selection adapters and take precedence over anything the widget would do itself. The
//! remaining widget events (open, close, focus, blur) go straight to the caller's hooks, which
//! arrive in [`WidgetOptions::hooks`].

use thiserror::Error;
use understory_field_map::Selector;

use crate::hooks::WidgetHooks;
use crate::lookup::Suggestion;

/// A raw input event from the widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEvent {
    /// Current text of the input element.
    pub value: String,
}

impl InputEvent {
    /// Event carrying `value`.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Everything a widget is built from.
#[derive(Clone, Debug)]
pub struct WidgetOptions {
    /// Input element to bind to.
    pub input: Selector,
    /// Passthrough hooks to register with the widget.
    pub hooks: WidgetHooks,
}

/// A live, attached input widget.
///
/// Implementations must not call back into the controller synchronously from these methods;
/// forward such events through the host's event loop instead.
pub trait InputWidget {
    /// Show a message in place of suggestions, or clear it with `None`.
    fn set_message(&mut self, message: Option<&str>);

    /// Replace the rendered suggestion list.
    fn set_suggestions(&mut self, suggestions: &[Suggestion]);

    /// Unbind from the input element and remove any rendered UI.
    fn detach(&mut self);
}

/// Builds widgets for the controller.
pub trait WidgetFactory {
    /// Widget type produced.
    type Widget: InputWidget;

    /// Bind a new widget to `options.input`.
    fn build(&self, options: WidgetOptions) -> Result<Self::Widget, WidgetError>;
}

/// Failure to build a widget.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum WidgetError {
    /// The input selector matched nothing.
    #[error("input field `{0}` not found")]
    InputNotFound(Selector),

    /// The host could not construct the widget.
    #[error("widget construction failed: {0}")]
    Build(String),
}
