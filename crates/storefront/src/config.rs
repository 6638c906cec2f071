//! State-layer configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_API_URL` - Base URL of the catalog API (e.g., `http://localhost:8080`)
//!
//! ## Optional
//! - `STOREFRONT_STATE_DIR` - Directory for durable client state (default: .storefront)
//! - `CART_STORAGE_KEY` - Storage key for the cart payload (default: cartItems)
//! - `CATALOG_PAGE_SIZE` - Listing page size (default: 12)
//! - `CATALOG_CACHE_TTL_SECS` - Cache TTL for featured products and facets, 0 disables (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::cart::DEFAULT_CART_KEY;
use crate::storage::is_valid_key;

const DEFAULT_STATE_DIR: &str = ".storefront";
const DEFAULT_PAGE_SIZE: u32 = 12;
const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client state configuration.
#[derive(Debug, Clone)]
pub struct StateConfig {
    /// Catalog API configuration
    pub catalog_api: CatalogApiConfig,
    /// Directory holding durable client state
    pub state_dir: PathBuf,
    /// Storage key for the cart payload
    pub cart_storage_key: String,
    /// Products per listing page
    pub page_size: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogApiConfig {
    /// Base URL the `/api/products` routes hang off
    pub base_url: Url,
    /// How long featured products and facet lists stay cached
    pub cache_ttl: Duration,
}

impl StateConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog_api = CatalogApiConfig::from_env()?;
        let state_dir = PathBuf::from(get_env_or_default("STOREFRONT_STATE_DIR", DEFAULT_STATE_DIR));

        let cart_storage_key = get_env_or_default("CART_STORAGE_KEY", DEFAULT_CART_KEY);
        if !is_valid_key(&cart_storage_key) {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must be 1-128 characters of [A-Za-z0-9._-] and not start with '.'".to_string(),
            ));
        }

        let page_size = parse_page_size(&get_env_or_default(
            "CATALOG_PAGE_SIZE",
            &DEFAULT_PAGE_SIZE.to_string(),
        ))?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            catalog_api,
            state_dir,
            cart_storage_key,
            page_size,
            sentry_dsn,
        })
    }
}

impl CatalogApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&get_required_env("CATALOG_API_URL")?)?;
        let cache_ttl_secs = get_env_or_default(
            "CATALOG_CACHE_TTL_SECS",
            &DEFAULT_CACHE_TTL_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("CATALOG_CACHE_TTL_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            base_url,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and check the catalog base URL.
fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), msg);

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not contain a query or fragment".to_string()));
    }
    Ok(url)
}

/// Parse a page size in `1..=MAX_PAGE_SIZE`.
fn parse_page_size(value: &str) -> Result<u32, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("CATALOG_PAGE_SIZE".to_string(), msg);

    let size = value.parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(invalid(format!("must be between 1 and {MAX_PAGE_SIZE}")));
    }
    Ok(size)
}
