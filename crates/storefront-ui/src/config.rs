//! Storefront configuration
//!
//! Loaded from TOML; every field is optional and falls back to
//! [`StorefrontConfig::default`].
//!
//! ```toml
//! endpoint = "https://shop.example/send-query-email/"
//! storage_dir = "/var/lib/storefront"
//! request_timeout_secs = 10
//! currency_label = "Rs."
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use storefront_checkout::{Url, DEFAULT_CURRENCY_LABEL};

/// Default query endpoint
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/send-query-email/";

/// Default storage directory, relative to the working directory
pub const DEFAULT_STORAGE_DIR: &str = ".storefront";

/// Storefront configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorefrontConfig {
    /// Query endpoint for orders and contact messages
    pub endpoint: String,
    /// Directory of the durable cart storage
    pub storage_dir: PathBuf,
    /// Outbound request timeout in seconds
    pub request_timeout_secs: u64,
    /// Label printed after prices
    pub currency_label: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            request_timeout_secs: 30,
            currency_label: DEFAULT_CURRENCY_LABEL.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With query endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// With storage directory
    #[inline]
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// With currency label
    #[inline]
    #[must_use]
    pub fn with_currency_label(mut self, label: impl Into<String>) -> Self {
        self.currency_label = label.into();
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// - `ConfigError::Parse` on invalid TOML or unknown keys
    /// - `ConfigError::ZeroTimeout` if `request_timeout_secs` is 0
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.request_timeout()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - `ConfigError::Parse` on invalid contents
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Endpoint as a URL
    ///
    /// # Errors
    /// - `ConfigError::InvalidEndpoint` unless it is an absolute http(s) URL
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason,
        };
        let url = Url::parse(&self.endpoint).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }

    /// Request timeout
    ///
    /// # Errors
    /// - `ConfigError::ZeroTimeout` if it would fail every request at once
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        match self.request_timeout_secs {
            0 => Err(ConfigError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}
