//! Testing utilities for the storefront workspace
//!
//! Shared fixtures, a scripted query transport and a notifier that records
//! what the shopper would have seen.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use storefront_cart::{CartEngine, CartStore, MemoryStorage, CART_KEY};
use storefront_checkout::{QueryRequest, QueryResponse, QueryTransport, TransportError};
use storefront_ui::{Notice, Notifier, PageBindings, Storefront};

pub const TEST_EMAIL: &str = "shopper@example.com";
pub const TEST_CSRF_TOKEN: &str = "test-csrf-token";

/// Memory storage already holding a raw cart value
pub fn seeded_storage(raw_cart: &str) -> MemoryStorage {
    MemoryStorage::with_item(CART_KEY, raw_cart)
}

/// Engine holding one unit of each `(name, price)`, in order
pub fn engine_with_items(items: &[(&str, &str)]) -> (CartEngine, MemoryStorage) {
    let storage = MemoryStorage::new();
    let mut engine = CartEngine::load(CartStore::new(storage.clone()));
    for (name, price) in items {
        let image = format!("images/{}.jpg", name.to_lowercase());
        engine.add_item(*name, *price, image).unwrap();
    }
    (engine, storage)
}

/// Every element present, email filled in, token on the page
pub fn full_page(email: &str, csrf_token: &str) -> PageBindings {
    PageBindings::full()
        .with_email(email)
        .with_csrf_token(csrf_token)
}

/// Storefront over memory storage with a recording notifier
pub fn storefront_with_items(
    items: &[(&str, &str)],
    page: PageBindings,
) -> (Storefront, Arc<RecordingNotifier>, MemoryStorage) {
    let (engine, storage) = engine_with_items(items);
    let notifier = Arc::new(RecordingNotifier::new());
    let storefront = Storefront::new(engine, page, notifier.clone(), "Rs.");
    (storefront, notifier, storage)
}

/// Scripted reply for [`ScriptedTransport`]
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(QueryResponse),
    Fail(String),
}

/// Transport that replays scripted replies and records every request
///
/// Once the script runs out every call is accepted.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<QueryRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepting() -> Self {
        Self::new().then(Reply::Respond(QueryResponse::accepted()))
    }

    pub fn rejecting(reason: &str) -> Self {
        Self::new().then(Reply::Respond(QueryResponse::rejected(reason)))
    }

    pub fn failing() -> Self {
        Self::new().then(Reply::Fail("connection refused".to_string()))
    }

    #[must_use]
    pub fn then(self, reply: Reply) -> Self {
        self.replies.lock().push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl QueryTransport for ScriptedTransport {
    async fn send_query(&self, request: QueryRequest) -> Result<QueryResponse, TransportError> {
        self.requests.lock().push(request);
        let reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or(Reply::Respond(QueryResponse::accepted()));
        match reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(reason) => Err(TransportError::Unreachable(reason)),
        }
    }
}

/// Notifier that keeps every notice
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.notices.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().push(notice.clone());
    }
}
