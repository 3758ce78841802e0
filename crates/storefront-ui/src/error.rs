//! Error types for the storefront session

use crate::page::Role;
use std::path::PathBuf;
use storefront_cart::CartError;
use storefront_checkout::{CheckoutError, TransportError};

/// Session-level errors
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    /// Required page element absent
    #[error("required page element missing: {0}")]
    MissingElement(Role),

    /// Cart mutation failed
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout aborted
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Outbound transport could not be set up
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration unusable
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Request timeout of zero seconds
    #[error("request_timeout_secs must be at least 1")]
    ZeroTimeout,

    /// Endpoint is not an absolute http(s) URL
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Configured value
        endpoint: String,
        /// Why it was refused
        reason: String,
    },
}
