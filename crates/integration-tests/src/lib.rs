//! Integration tests for the storefront state crates.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storefront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_http` - catalog store driven through the REST client against
//!   an in-process mock product API
//! - `cart_persistence` - cart store backed by file storage
//!
//! [`MockCatalogApi`] serves the product API routes from a fixed product
//! list on an ephemeral port.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{BTreeSet, HashMap};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use storefront_state::CatalogApiConfig;

const DEFAULT_PAGE_SIZE: usize = 12;

/// A forced failure applied to every route.
#[derive(Debug, Clone)]
pub struct Failure {
    pub status: StatusCode,
    /// Sent as `{"message": ...}` when present; otherwise the body is empty.
    pub message: Option<String>,
}

#[derive(Default)]
struct MockState {
    products: Vec<Value>,
    failure: Mutex<Option<Failure>>,
    featured_hits: AtomicUsize,
}

/// In-process mock of the catalog product API.
pub struct MockCatalogApi {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockCatalogApi {
    /// Serve `products` (API-shaped JSON objects) on `127.0.0.1`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port could be bound.
    pub async fn start(products: Vec<Value>) -> std::io::Result<Self> {
        let state = Arc::new(MockState {
            products,
            ..MockState::default()
        });

        let app = Router::new()
            .route("/api/products", get(list))
            .route("/api/products/featured", get(featured))
            .route("/api/products/search", get(search))
            .route("/api/products/category/{category}", get(by_category))
            .route("/api/products/price-range", get(by_price_range))
            .route("/api/products/categories", get(categories))
            .route("/api/products/brands", get(brands))
            .route("/api/products/{id}", get(by_id))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(Self { addr, state })
    }

    /// Base URL clients should be configured with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this server.
    ///
    /// # Panics
    ///
    /// Never in practice; the base URL is always well formed.
    #[must_use]
    pub fn config(&self, cache_ttl: Duration) -> CatalogApiConfig {
        CatalogApiConfig {
            base_url: self.base_url().parse().expect("mock base URL"),
            cache_ttl,
        }
    }

    /// Make every route fail until [`Self::recover`] is called.
    pub fn fail_with(&self, status: StatusCode, message: Option<&str>) {
        *self.failure() = Some(Failure {
            status,
            message: message.map(str::to_string),
        });
    }

    /// Stop failing.
    pub fn recover(&self) {
        *self.failure() = None;
    }

    /// How many times the featured route was served.
    #[must_use]
    pub fn featured_hits(&self) -> usize {
        self.state.featured_hits.load(Ordering::SeqCst)
    }

    fn failure(&self) -> std::sync::MutexGuard<'_, Option<Failure>> {
        self.state
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// A product object shaped like the API's.
#[must_use]
pub fn product_json(id: &str, name: &str, price: f64, category: &str, brand: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "price": price,
        "category": category,
        "brand": brand,
        "sku": id.to_uppercase(),
        "stockQuantity": 5,
        "imageUrls": [format!("https://cdn.example.com/{id}.jpg")],
        "tags": [],
        "rating": 4.5,
        "reviewCount": 3,
        "active": true,
        "featured": false
    })
}

// =============================================================================
// Handlers
// =============================================================================

type Params = Query<HashMap<String, String>>;

fn forced_failure(state: &MockState) -> Option<Response> {
    let failure = state
        .failure
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()?;
    Some(match failure.message {
        Some(message) => (failure.status, Json(json!({ "message": message }))).into_response(),
        None => failure.status.into_response(),
    })
}

fn param<T: std::str::FromStr>(params: &HashMap<String, String>, key: &str) -> Option<T> {
    params.get(key).and_then(|v| v.parse().ok())
}

fn field<'a>(product: &'a Value, key: &str) -> Option<&'a str> {
    product.get(key).and_then(Value::as_str)
}

/// Slice `matches` into the requested page, Spring-style.
fn page_of(matches: Vec<&Value>, params: &HashMap<String, String>) -> Response {
    let page = param::<usize>(params, "page").unwrap_or(0);
    let size = param::<usize>(params, "size")
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let total = matches.len();
    let content: Vec<&Value> = matches.into_iter().skip(page * size).take(size).collect();

    Json(json!({
        "content": content,
        "totalPages": total.div_ceil(size),
        "totalElements": total,
        "number": page,
        "size": size,
        "first": page == 0,
        "last": (page + 1) * size >= total
    }))
    .into_response()
}

fn distinct(state: &MockState, key: &str) -> Response {
    let names: BTreeSet<&str> = state.products.iter().filter_map(|p| field(p, key)).collect();
    Json(names).into_response()
}

async fn list(State(state): State<Arc<MockState>>, Query(params): Params) -> Response {
    if let Some(response) = forced_failure(&state) {
        return response;
    }
    page_of(state.products.iter().collect(), &params)
}

async fn featured(State(state): State<Arc<MockState>>) -> Response {
    state.featured_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = forced_failure(&state) {
        return response;
    }
    let products: Vec<&Value> = state
        .products
        .iter()
        .filter(|p| p.get("featured").and_then(Value::as_bool) == Some(true))
        .collect();
    Json(products).into_response()
}

async fn search(State(state): State<Arc<MockState>>, Query(params): Params) -> Response {
    if let Some(response) = forced_failure(&state) {
        return response;
    }
    let needle = params.get("name").map(|n| n.to_lowercase()).unwrap_or_default();
    let matches = state
        .products
        .iter()
        .filter(|p| field(p, "name").is_some_and(|n| n.to_lowercase().contains(&needle)))
        .collect();
    page_of(matches, &params)
}

async fn by_category(
    State(state): State<Arc<MockState>>,
    Path(category): Path<String>,
    Query(params): Params,
) -> Response {
    if let Some(response) = forced_failure(&state) {
        return response;
    }
    let matches = state
        .products
        .iter()
        .filter(|p| field(p, "category") == Some(category.as_str()))
        .collect();
    page_of(matches, &params)
}

async fn by_price_range(State(state): State<Arc<MockState>>, Query(params): Params) -> Response {
    if let Some(response) = forced_failure(&state) {
        return response;
    }
    let min = param::<f64>(&params, "minPrice").unwrap_or(0.0);
    let max = param::<f64>(&params, "maxPrice").unwrap_or(f64::MAX);
    let matches = state
        .products
        .iter()
        .filter(|p| {
            p.get("price")
                .and_then(Value::as_f64)
                .is_some_and(|price| price >= min && price <= max)
        })
        .collect();
    page_of(matches, &params)
}

async fn categories(State(state): State<Arc<MockState>>) -> Response {
    forced_failure(&state).unwrap_or_else(|| distinct(&state, "category"))
}

async fn brands(State(state): State<Arc<MockState>>) -> Response {
    forced_failure(&state).unwrap_or_else(|| distinct(&state, "brand"))
}

async fn by_id(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    if let Some(response) = forced_failure(&state) {
        return response;
    }
    match state.products.iter().find(|p| field(p, "id") == Some(id.as_str())) {
        Some(product) => Json(product).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("Product not found with id: {id}") })),
        )
            .into_response(),
    }
}
