//! Error types for checkout
//!
//! - `CheckoutError`: preconditions that abort before any network call
//! - `TransportError`: the request never produced a usable answer

use storefront_cart::CartError;

/// Checkout aborted locally
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// Contact email empty after trimming
    #[error("missing email")]
    MissingEmail,

    /// Nothing to order
    #[error("empty cart")]
    EmptyCart,

    /// Page carries no CSRF token to send
    #[error("missing csrf token")]
    MissingCsrfToken,

    /// A submission is already outstanding
    #[error("submission already in flight")]
    InFlight,

    /// Accepted order could not be cleared from the cart
    #[error("cart error: {0}")]
    Cart(#[from] CartError),
}

impl CheckoutError {
    /// Check if error is a user-input validation failure
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingEmail | Self::EmptyCart)
    }
}

/// Transport-level failure
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (timeout, body read)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Body was not the expected JSON payload
    #[error("malformed response (status {status}): {reason}")]
    MalformedResponse {
        /// HTTP status of the response
        status: u16,
        /// Decode failure
        reason: String,
    },

    /// Endpoint could not be reached
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),
}

impl TransportError {
    /// Classify a failed request, splitting out connection failures
    #[must_use]
    pub fn from_request(error: reqwest::Error) -> Self {
        if error.is_connect() {
            Self::Unreachable(error.to_string())
        } else {
            Self::Request(error)
        }
    }
}
