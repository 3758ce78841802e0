//! Storefront Checkout
//!
//! Outbound calls of the storefront page:
//! - **Order submission**: validates the checkout preconditions, posts the
//!   order summary, clears the cart once the backend accepts it
//! - **Contact form**: posts the whole form as-is
//!
//! Both go through [`QueryTransport`], a single POST to the query endpoint
//! answered with `{"success": bool, "error"?: string}`.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_checkout::{HttpTransport, OrderSubmitter, DEFAULT_TIMEOUT};
//!
//! # async fn example(engine: &mut storefront_cart::CartEngine) -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new("https://shop.example/send-query-email/".parse()?, DEFAULT_TIMEOUT)?;
//! let submitter = OrderSubmitter::default();
//!
//! let outcome = submitter
//!     .checkout(engine, "buyer@example.com", Some("csrf-token"), &transport)
//!     .await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod contact;
pub mod error;
pub mod submitter;
pub mod summary;
pub mod transport;

// Re-exports for convenience
pub use contact::{ContactForm, ContactOutcome, CSRF_FIELD};
pub use error::{CheckoutError, TransportError};
pub use submitter::{
    OrderRequest, OrderSubmitter, PendingOrder, SubmitOutcome, DEFAULT_CURRENCY_LABEL,
    UNKNOWN_REJECTION,
};
pub use summary::{order_message, ORDER_HEADING};
pub use transport::{
    HttpTransport, QueryRequest, QueryResponse, QueryTransport, CSRF_HEADER, DEFAULT_TIMEOUT,
};

/// Endpoint URL type accepted by [`HttpTransport`]
pub use reqwest::Url;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for submitting orders
    pub use crate::contact::{ContactForm, ContactOutcome};
    pub use crate::error::{CheckoutError, TransportError};
    pub use crate::submitter::{OrderSubmitter, PendingOrder, SubmitOutcome};
    pub use crate::transport::{HttpTransport, QueryRequest, QueryResponse, QueryTransport};
}
