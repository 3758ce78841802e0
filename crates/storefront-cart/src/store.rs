//! Durable cart storage
//!
//! [`KeyValueStore`] mirrors the browser storage API (string keys, string
//! values). [`CartStore`] keeps the whole cart as JSON under [`CART_KEY`]:
//! - `load` never fails; absent or malformed data yields an empty cart
//! - `save` overwrites the previous value entirely
//!
//! Writers in other processes are not coordinated; last write wins.

use crate::error::StoreError;
use crate::types::Cart;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Fixed storage key of the cart
pub const CART_KEY: &str = "cart";

/// String key-value storage backend
pub trait KeyValueStore: Send + Sync + Debug {
    /// Read the value under `key`, `None` if absent
    ///
    /// # Errors
    /// Backend-specific read failures
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`
    ///
    /// # Errors
    /// Backend-specific write failures
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the value under `key`, if any
    ///
    /// # Errors
    /// Backend-specific write failures
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process storage
///
/// Clones share the same map, so a test can keep a handle while the engine
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create empty storage
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-seeded with one value
    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.inner.lock().insert(key.to_string(), value.to_string());
        storage
    }

    /// Raw value under `key`
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.inner.lock().remove(key);
        Ok(())
    }
}

/// Directory-backed storage, one `<key>.json` file per key
///
/// Writes land in a temporary file in the same directory and are renamed
/// over the target, so readers see either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `dir` (created lazily on first write)
    #[inline]
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage directory
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a key
    ///
    /// # Errors
    /// - `StoreError::InvalidKey` for empty keys or keys with characters
    ///   outside `[A-Za-z0-9_-]`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io_error(path, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::io_error(&self.dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(|e| StoreError::io_error(&self.dir, e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| StoreError::io_error(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| StoreError::io_error(&path, e.error))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io_error(path, e)),
        }
    }
}

/// Cart persistence over a key-value backend
#[derive(Debug, Clone)]
pub struct CartStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl CartStore {
    /// Create store writing under [`CART_KEY`]
    #[must_use]
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    /// Create store over a shared backend
    #[must_use]
    pub fn with_backend(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            key: CART_KEY.to_string(),
        }
    }

    /// Storage key in use
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted cart
    ///
    /// Absent, unreadable, unparsable, or invalid data (non-array, zero
    /// quantities, duplicate names) yields an empty cart.
    #[must_use]
    pub fn load(&self) -> Cart {
        let raw = match self.backend.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                tracing::debug!("Cart storage unreadable, starting empty: {}", e);
                return Cart::new();
            }
        };

        serde_json::from_str::<Cart>(&raw).unwrap_or_else(|e| {
            tracing::debug!("Discarding malformed persisted cart: {}", e);
            Cart::new()
        })
    }

    /// Overwrite the persisted cart
    ///
    /// # Errors
    /// - `StoreError::Encode` if the cart cannot be encoded
    /// - Backend write failures
    pub fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let raw = serde_json::to_string(cart)?;
        self.backend.set_item(&self.key, &raw)
    }
}
