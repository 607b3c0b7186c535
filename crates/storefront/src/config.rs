//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `AZ_CART_PATH` - Cart snapshot file (default: .az-clothes/cart.json)
//! - `AZ_CATALOG_PATH` - Local product catalog, YAML or JSON (default: catalog.yaml)
//! - `AZ_ORDERS_DIR` - Local order book directory (default: .az-clothes/orders)
//! - `AZ_API_BASE_URL` - Storefront API base URL; when set, stock checks and
//!   order placement go over HTTP instead of the local files
//! - `AZ_API_TOKEN` - Bearer token for the storefront API
//! - `AZ_API_TIMEOUT_SECS` - HTTP timeout in seconds (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_CART_PATH: &str = ".az-clothes/cart.json";
const DEFAULT_CATALOG_PATH: &str = "catalog.yaml";
const DEFAULT_ORDERS_DIR: &str = ".az-clothes/orders";
const DEFAULT_API_TIMEOUT_SECS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Where the cart snapshot is persisted between runs
    pub cart_path: PathBuf,
    /// Local catalog used when no API is configured
    pub catalog_path: PathBuf,
    /// Local order book used when no API is configured
    pub orders_dir: PathBuf,
    /// Remote storefront API, if any
    pub api: Option<ApiConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Storefront API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://shop.example.com`
    pub base_url: Url,
    /// Bearer token sent with every request
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let api = match lookup("AZ_API_BASE_URL") {
            Some(raw) => Some(ApiConfig::parse(&raw, &lookup)?),
            None => None,
        };

        Ok(Self {
            cart_path: PathBuf::from(get_or("AZ_CART_PATH", DEFAULT_CART_PATH)),
            catalog_path: PathBuf::from(get_or("AZ_CATALOG_PATH", DEFAULT_CATALOG_PATH)),
            orders_dir: PathBuf::from(get_or("AZ_ORDERS_DIR", DEFAULT_ORDERS_DIR)),
            api,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

impl ApiConfig {
    fn parse(raw: &str, lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidEnvVar("AZ_API_BASE_URL".to_owned(), e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "AZ_API_BASE_URL".to_owned(),
                format!("unsupported scheme {}", base_url.scheme()),
            ));
        }

        let timeout_secs = lookup("AZ_API_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_API_TIMEOUT_SECS.to_owned())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("AZ_API_TIMEOUT_SECS".to_owned(), e.to_string())
            })?;

        Ok(Self {
            base_url,
            token: lookup("AZ_API_TOKEN")
                .filter(|token| !token.is_empty())
                .map(SecretString::from),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
