//! Error types for the cart
//!
//! Provides error handling for:
//! - Durable storage reads and writes
//! - Cart mutations (positions, names, persistence)

use std::path::PathBuf;

/// Errors raised by a storage backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Cart could not be encoded
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    /// IO error on the backing file
    #[error("io error on {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Key is not usable by the backend
    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised by cart mutations
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// Position does not address an item
    #[error("position {index} out of range for cart of {len} items")]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Items in the cart
        len: usize,
    },

    /// No item carries this name
    #[error("no cart item named '{0}'")]
    NotFound(String),

    /// Two items share a name
    #[error("duplicate cart item: '{0}'")]
    DuplicateItem(String),

    /// Item quantity must be at least one
    #[error("cart item '{0}' has zero quantity")]
    ZeroQuantity(String),

    /// Mutation applied in memory but the write-through failed
    #[error("failed to persist cart: {0}")]
    Persist(#[from] StoreError),
}

impl CartError {
    /// Check if the in-memory cart was changed despite the error
    #[inline]
    #[must_use]
    pub fn state_changed(&self) -> bool {
        matches!(self, Self::Persist(_))
    }
}
