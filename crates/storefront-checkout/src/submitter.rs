//! Order submitter
//!
//! Checkout runs in two steps so the UI loop never blocks on the network:
//! 1. [`OrderSubmitter::prepare`] checks the preconditions synchronously and
//!    takes the in-flight slot
//! 2. [`PendingOrder::send`] performs the single POST and yields a
//!    [`SubmitOutcome`], which [`SubmitOutcome::apply`] folds back into the
//!    cart
//!
//! Only one order can be pending per submitter. Dropping a
//! `PendingOrder` (or its `send` future) cancels it and frees the slot.

use crate::error::{CheckoutError, TransportError};
use crate::summary::order_message;
use crate::transport::{QueryRequest, QueryResponse, QueryTransport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use storefront_cart::{Cart, CartEngine, CartError};

/// Currency label used when none is configured
pub const DEFAULT_CURRENCY_LABEL: &str = "Rs.";

/// Fallback shown when a rejection carries no reason
pub const UNKNOWN_REJECTION: &str = "Something went wrong";

/// Validated order ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Trimmed contact email
    pub email: String,
    /// Order summary
    pub message: String,
    /// CSRF token for the request header
    pub csrf_token: String,
}

impl OrderRequest {
    /// Multipart form for the query endpoint
    #[must_use]
    pub fn to_query(&self) -> QueryRequest {
        QueryRequest {
            fields: vec![
                ("email".to_string(), self.email.clone()),
                ("message".to_string(), self.message.clone()),
            ],
            csrf_token: self.csrf_token.clone(),
        }
    }
}

/// How a sent order ended
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Backend accepted the order
    Accepted,
    /// Backend rejected the order with a reason
    Rejected(String),
    /// No usable answer; not retried
    TransportFailed(TransportError),
}

impl SubmitOutcome {
    /// Interpret a backend verdict
    #[must_use]
    pub fn from_response(response: QueryResponse) -> Self {
        if response.success {
            Self::Accepted
        } else {
            Self::Rejected(
                response
                    .error
                    .unwrap_or_else(|| UNKNOWN_REJECTION.to_string()),
            )
        }
    }

    /// Check if the order went through
    #[inline]
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Fold the outcome into the cart: accepted orders empty it, anything
    /// else leaves it untouched
    ///
    /// # Errors
    /// - `CartError::Persist` if clearing cannot be written through
    pub fn apply(&self, engine: &mut CartEngine) -> Result<(), CartError> {
        if self.is_accepted() {
            engine.clear()?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Order holding the in-flight slot
#[derive(Debug)]
pub struct PendingOrder {
    request: OrderRequest,
    _guard: InFlightGuard,
}

impl PendingOrder {
    /// Request that will be sent
    #[inline]
    #[must_use]
    pub fn request(&self) -> &OrderRequest {
        &self.request
    }

    /// Send the order; the in-flight slot is released when this completes
    pub async fn send(self, transport: &dyn QueryTransport) -> SubmitOutcome {
        match transport.send_query(self.request.to_query()).await {
            Ok(response) => {
                let outcome = SubmitOutcome::from_response(response);
                if let SubmitOutcome::Rejected(reason) = &outcome {
                    tracing::warn!("Order rejected: {}", reason);
                }
                outcome
            }
            Err(e) => {
                tracing::error!("Order submission failed: {}", e);
                SubmitOutcome::TransportFailed(e)
            }
        }
    }
}

/// Checkout entry point
#[derive(Debug, Clone)]
pub struct OrderSubmitter {
    in_flight: Arc<AtomicBool>,
    currency_label: String,
}

impl Default for OrderSubmitter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_LABEL)
    }
}

impl OrderSubmitter {
    /// Create submitter labelling prices with `currency_label`
    #[must_use]
    pub fn new(currency_label: impl Into<String>) -> Self {
        Self {
            in_flight: Arc::new(AtomicBool::new(false)),
            currency_label: currency_label.into(),
        }
    }

    /// Check if an order is outstanding
    #[inline]
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate checkout and take the in-flight slot
    ///
    /// Checked in order, none touching the network:
    /// 1. email non-empty after trimming
    /// 2. cart non-empty
    /// 3. CSRF token present
    /// 4. no other order pending
    ///
    /// # Errors
    /// - `CheckoutError::MissingEmail`
    /// - `CheckoutError::EmptyCart`
    /// - `CheckoutError::MissingCsrfToken`
    /// - `CheckoutError::InFlight`
    pub fn prepare(
        &self,
        cart: &Cart,
        email: &str,
        csrf_token: Option<&str>,
    ) -> Result<PendingOrder, CheckoutError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CheckoutError::MissingEmail);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let csrf_token = csrf_token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(CheckoutError::MissingCsrfToken)?;

        let guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            tracing::warn!("Checkout ignored: an order is already in flight");
            CheckoutError::InFlight
        })?;

        tracing::info!("Submitting order of {} items for {}", cart.len(), email);
        Ok(PendingOrder {
            request: OrderRequest {
                email: email.to_string(),
                message: order_message(cart, &self.currency_label),
                csrf_token: csrf_token.to_string(),
            },
            _guard: guard,
        })
    }

    /// Prepare, send and apply in one call
    ///
    /// # Errors
    /// - Any [`Self::prepare`] error, with no network call made
    /// - `CheckoutError::Cart` if an accepted order cannot be cleared
    pub async fn checkout(
        &self,
        engine: &mut CartEngine,
        email: &str,
        csrf_token: Option<&str>,
        transport: &dyn QueryTransport,
    ) -> Result<SubmitOutcome, CheckoutError> {
        let pending = self.prepare(engine.cart(), email, csrf_token)?;
        let outcome = pending.send(transport).await;
        outcome.apply(engine)?;
        Ok(outcome)
    }
}
