//! Catalog fetch contract and its HTTP implementation.
//!
//! # Architecture
//!
//! - [`FetchClient`] is the only thing the catalog store knows about the
//!   network: one async method per catalog query
//! - [`ProductApiClient`] implements it against the REST product API using
//!   `reqwest`, caching featured products and facet lists with `moka`
//!
//! Tests and embedders can supply any other implementation.

mod cache;
mod http;

use std::future::Future;

pub use http::ProductApiClient;

use storefront_state_core::{PageParams, PriceRange, Product, ProductId, ProductPage, SearchParams};
use thiserror::Error;

/// Errors that can occur when fetching catalog data.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        /// HTTP status code.
        status: u16,
        /// Human-readable message from the response body, if any.
        message: Option<String>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failure reported by a non-HTTP client, with a display message.
    #[error("{0}")]
    Rejected(String),
}

impl FetchError {
    /// The human-readable failure detail suitable for showing to a shopper.
    ///
    /// Transport and parse failures have none; callers substitute a generic
    /// message for the operation.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Rejected(message) => Some(message),
            Self::Http(_) | Self::Parse(_) | Self::NotFound(_) => None,
        }
    }
}

/// Capability to query the catalog.
///
/// Every method resolves to either the decoded success value or a
/// [`FetchError`]. Implementations own request construction, headers and
/// transport; callers only reconcile outcomes.
pub trait FetchClient {
    /// One page of active products.
    fn list_products(
        &self,
        params: &PageParams,
    ) -> impl Future<Output = Result<ProductPage, FetchError>> + Send;

    /// The featured product set.
    fn get_featured(&self) -> impl Future<Output = Result<Vec<Product>, FetchError>> + Send;

    /// A single product.
    fn get_by_id(&self, id: &ProductId)
    -> impl Future<Output = Result<Product, FetchError>> + Send;

    /// One page of products whose name matches the query.
    fn search(
        &self,
        params: &SearchParams,
    ) -> impl Future<Output = Result<ProductPage, FetchError>> + Send;

    /// One page of products in `category`.
    fn list_by_category(
        &self,
        category: &str,
        params: &PageParams,
    ) -> impl Future<Output = Result<ProductPage, FetchError>> + Send;

    /// One page of products priced within `range`.
    fn list_by_price_range(
        &self,
        range: &PriceRange,
        params: &PageParams,
    ) -> impl Future<Output = Result<ProductPage, FetchError>> + Send;

    /// All category names.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<String>, FetchError>> + Send;

    /// All brand names.
    fn list_brands(&self) -> impl Future<Output = Result<Vec<String>, FetchError>> + Send;
}
