//! REST client for the catalog product API.
//!
//! Endpoints (relative to the configured base URL):
//!
//! | Query | Route |
//! |---|---|
//! | listing | `GET /api/products?page&size&sortBy&sortDir` |
//! | featured | `GET /api/products/featured` |
//! | by id | `GET /api/products/{id}` |
//! | search | `GET /api/products/search?name&page&size` |
//! | category | `GET /api/products/category/{category}?page&size` |
//! | price range | `GET /api/products/price-range?minPrice&maxPrice&page&size` |
//! | categories | `GET /api/products/categories` |
//! | brands | `GET /api/products/brands` |

use std::sync::Arc;

use moka::future::Cache;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use storefront_state_core::{PageParams, PriceRange, Product, ProductId, ProductPage, SearchParams};
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheValue};
use super::{FetchClient, FetchError};
use crate::config::CatalogApiConfig;

const PRODUCTS_PATH: &str = "api/products";

/// Error body shape returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the catalog product API.
///
/// Cheap to clone. Featured products, categories and brands are cached for
/// the configured TTL; listings and single products always hit the API.
#[derive(Clone)]
pub struct ProductApiClient {
    inner: Arc<ProductApiClientInner>,
}

struct ProductApiClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl std::fmt::Debug for ProductApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductApiClient")
            .field("base_url", &self.inner.base_url)
            .field("cached", &self.inner.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl ProductApiClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogApiConfig) -> Self {
        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(16)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Self {
            inner: Arc::new(ProductApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/{PRODUCTS_PATH}", self.inner.base_url)
        } else {
            format!("{}/{PRODUCTS_PATH}/{path}", self.inner.base_url)
        }
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(path);
        let response = self.inner.client.get(&url).query(query).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty());
            if status == reqwest::StatusCode::NOT_FOUND && message.is_none() {
                return Err(FetchError::NotFound(url));
            }
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog API response"
            );
            FetchError::Parse(e)
        })
    }

    async fn cached_products(&self, key: CacheKey, path: &str) -> Result<Vec<Product>, FetchError> {
        if let Some(cache) = &self.inner.cache
            && let Some(CacheValue::Products(products)) = cache.get(&key).await
        {
            debug!(?key, "Cache hit");
            return Ok(products);
        }

        let products: Vec<Product> = self.get_json(path, &[]).await?;
        if let Some(cache) = &self.inner.cache {
            cache
                .insert(key, CacheValue::Products(products.clone()))
                .await;
        }
        Ok(products)
    }

    async fn cached_names(&self, key: CacheKey, path: &str) -> Result<Vec<String>, FetchError> {
        if let Some(cache) = &self.inner.cache
            && let Some(CacheValue::Names(names)) = cache.get(&key).await
        {
            debug!(?key, "Cache hit");
            return Ok(names);
        }

        let names: Vec<String> = self.get_json(path, &[]).await?;
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, CacheValue::Names(names.clone())).await;
        }
        Ok(names)
    }

    /// Drop all cached featured products and facet lists.
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
        }
    }
}

/// Query pairs for paging and ordering.
fn page_query(params: &PageParams) -> Vec<(&'static str, String)> {
    let mut query = Vec::with_capacity(4);
    if let Some(page) = params.page {
        query.push(("page", page.to_string()));
    }
    if let Some(size) = params.size {
        query.push(("size", size.to_string()));
    }
    if let Some(sort_by) = &params.sort_by {
        query.push(("sortBy", sort_by.clone()));
    }
    if let Some(dir) = params.sort_dir {
        query.push(("sortDir", dir.as_str().to_string()));
    }
    query
}

impl FetchClient for ProductApiClient {
    #[instrument(skip(self))]
    async fn list_products(&self, params: &PageParams) -> Result<ProductPage, FetchError> {
        self.get_json("", &page_query(params)).await
    }

    #[instrument(skip(self))]
    async fn get_featured(&self) -> Result<Vec<Product>, FetchError> {
        self.cached_products(CacheKey::Featured, "featured").await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: &ProductId) -> Result<Product, FetchError> {
        let path = urlencoding::encode(id.as_str()).into_owned();
        self.get_json(&path, &[]).await
    }

    #[instrument(skip(self))]
    async fn search(&self, params: &SearchParams) -> Result<ProductPage, FetchError> {
        let mut query = vec![("name", params.name.clone())];
        if let Some(page) = params.page {
            query.push(("page", page.to_string()));
        }
        if let Some(size) = params.size {
            query.push(("size", size.to_string()));
        }
        self.get_json("search", &query).await
    }

    #[instrument(skip(self))]
    async fn list_by_category(
        &self,
        category: &str,
        params: &PageParams,
    ) -> Result<ProductPage, FetchError> {
        let path = format!("category/{}", urlencoding::encode(category));
        self.get_json(&path, &page_query(params)).await
    }

    #[instrument(skip(self))]
    async fn list_by_price_range(
        &self,
        range: &PriceRange,
        params: &PageParams,
    ) -> Result<ProductPage, FetchError> {
        let mut query = vec![
            ("minPrice", range.min_price().to_string()),
            ("maxPrice", range.max_price().to_string()),
        ];
        query.extend(page_query(params));
        self.get_json("price-range", &query).await
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<String>, FetchError> {
        self.cached_names(CacheKey::Categories, "categories").await
    }

    #[instrument(skip(self))]
    async fn list_brands(&self) -> Result<Vec<String>, FetchError> {
        self.cached_names(CacheKey::Brands, "brands").await
    }
}
