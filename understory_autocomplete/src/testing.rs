// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording collaborators for controller tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::oneshot;
use understory_field_map::{FieldKind, MemoryDocument, Selector};

use crate::hooks::WidgetHooks;
use crate::lookup::{AddressRecord, KeyStatus, LookupClient, LookupError, SearchResults, Suggestion};
use crate::settings::RequestOptions;
use crate::widget::{InputWidget, WidgetError, WidgetFactory, WidgetOptions};

/// A request seen by [`FakeClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    CheckKey(RequestOptions),
    Autocomplete(String, RequestOptions),
    Umprn(u64, RequestOptions),
    Udprn(u64, RequestOptions),
}

/// A scripted response: available now, or when the test sends it.
pub(crate) enum Reply<T> {
    Now(Result<T, LookupError>),
    Later(oneshot::Receiver<Result<T, LookupError>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T, LookupError> {
        match self {
            Self::Now(result) => result,
            Self::Later(rx) => rx
                .await
                .unwrap_or_else(|_| Err(LookupError::Transport("reply dropped".into()))),
        }
    }
}

/// Lookup client that records requests and answers from queues.
///
/// Empty queues answer with an available key, no hits, and an empty address.
#[derive(Default)]
pub(crate) struct FakeClient {
    calls: RefCell<Vec<Call>>,
    keys: RefCell<VecDeque<Reply<KeyStatus>>>,
    searches: RefCell<VecDeque<Reply<SearchResults>>>,
    addresses: RefCell<VecDeque<Reply<AddressRecord>>>,
}

impl FakeClient {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn reply_key(&self, reply: Reply<KeyStatus>) {
        self.keys.borrow_mut().push_back(reply);
    }

    pub(crate) fn reply_search(&self, reply: Reply<SearchResults>) {
        self.searches.borrow_mut().push_back(reply);
    }

    pub(crate) fn reply_address(&self, reply: Reply<AddressRecord>) {
        self.addresses.borrow_mut().push_back(reply);
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl LookupClient for FakeClient {
    async fn check_key(&self, options: &RequestOptions) -> Result<KeyStatus, LookupError> {
        self.record(Call::CheckKey(options.clone()));
        let reply = self.keys.borrow_mut().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Ok(KeyStatus { available: true }),
        }
    }

    async fn autocomplete(
        &self,
        query: &str,
        options: &RequestOptions,
    ) -> Result<SearchResults, LookupError> {
        self.record(Call::Autocomplete(query.to_string(), options.clone()));
        let reply = self.searches.borrow_mut().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Ok(SearchResults::default()),
        }
    }

    async fn lookup_umprn(
        &self,
        umprn: u64,
        options: &RequestOptions,
    ) -> Result<AddressRecord, LookupError> {
        self.record(Call::Umprn(umprn, options.clone()));
        self.next_address().await
    }

    async fn lookup_udprn(
        &self,
        udprn: u64,
        options: &RequestOptions,
    ) -> Result<AddressRecord, LookupError> {
        self.record(Call::Udprn(udprn, options.clone()));
        self.next_address().await
    }
}

impl FakeClient {
    async fn next_address(&self) -> Result<AddressRecord, LookupError> {
        let reply = self.addresses.borrow_mut().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Ok(AddressRecord::new()),
        }
    }
}

/// What the widgets built by a [`FakeFactory`] were told to do.
#[derive(Debug, Default)]
pub(crate) struct WidgetLog {
    pub(crate) built: Vec<Selector>,
    pub(crate) messages: Vec<Option<String>>,
    pub(crate) suggestions: Vec<Vec<Suggestion>>,
    pub(crate) detached: usize,
    pub(crate) hooks: Option<WidgetHooks>,
}

impl WidgetLog {
    /// Messages actually shown, ignoring clears.
    pub(crate) fn shown(&self) -> Vec<&str> {
        self.messages.iter().flatten().map(String::as_str).collect()
    }
}

pub(crate) struct FakeWidget {
    log: Rc<RefCell<WidgetLog>>,
}

impl InputWidget for FakeWidget {
    fn set_message(&mut self, message: Option<&str>) {
        self.log
            .borrow_mut()
            .messages
            .push(message.map(str::to_string));
    }

    fn set_suggestions(&mut self, suggestions: &[Suggestion]) {
        self.log.borrow_mut().suggestions.push(suggestions.to_vec());
    }

    fn detach(&mut self) {
        self.log.borrow_mut().detached += 1;
    }
}

/// Widget factory sharing one [`WidgetLog`] across every widget it builds.
#[derive(Default)]
pub(crate) struct FakeFactory {
    pub(crate) log: Rc<RefCell<WidgetLog>>,
    pub(crate) fail: bool,
}

impl WidgetFactory for FakeFactory {
    type Widget = FakeWidget;

    fn build(&self, options: WidgetOptions) -> Result<FakeWidget, WidgetError> {
        if self.fail {
            return Err(WidgetError::InputNotFound(options.input));
        }
        let mut log = self.log.borrow_mut();
        log.built.push(options.input);
        log.hooks = Some(options.hooks);
        Ok(FakeWidget {
            log: self.log.clone(),
        })
    }
}

/// A document with one text input per selector.
pub(crate) fn document(selectors: &[&str]) -> MemoryDocument {
    let mut document = MemoryDocument::new();
    for selector in selectors {
        document.add(*selector, FieldKind::Input);
    }
    document
}
