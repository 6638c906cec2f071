//! Catalog store driven through the REST client against a mock product API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;
use storefront_state::{CartCandidate, CartStore, CatalogStore, MemoryStorage, ProductApiClient};
use storefront_state_core::{PageParams, PriceRange, RequestStatus, SearchParams};
use storefront_integration_tests::{MockCatalogApi, product_json};

fn catalog() -> Vec<Value> {
    let mut products = vec![
        product_json("p1", "Lavender Soap", 8.5, "bath", "Meadow"),
        product_json("p2", "Cedar Soap", 9.0, "bath", "Meadow"),
        product_json("p3", "Linen Towel", 24.0, "bath", "Loom"),
        product_json("p4", "Tea Candle", 12.0, "home", "Wick & Co"),
        product_json("p5", "Soap Dish", 15.25, "home", "Loom"),
    ];
    products[2]["featured"] = Value::Bool(true);
    products[3]["featured"] = Value::Bool(true);
    products
}

async fn setup(cache_ttl: Duration) -> (MockCatalogApi, CatalogStore<ProductApiClient>) {
    let api = MockCatalogApi::start(catalog()).await.unwrap();
    let store = CatalogStore::new(ProductApiClient::new(&api.config(cache_ttl)));
    (api, store)
}

// =============================================================================
// Listings
// =============================================================================

#[tokio::test]
async fn test_listing_page_and_pagination() {
    let (_api, store) = setup(Duration::ZERO).await;

    store.fetch_products(PageParams::page(1).with_size(2)).await;

    let state = store.snapshot();
    assert_eq!(state.status(), RequestStatus::Idle);
    assert_eq!(state.products().len(), 2);
    assert_eq!(state.products()[0].id.as_str(), "p3");
    assert_eq!(state.pagination().current_page, 1);
    assert_eq!(state.pagination().total_pages, 3);
    assert_eq!(state.pagination().total_elements, 5);
}

#[tokio::test]
async fn test_search_replaces_listing() {
    let (_api, store) = setup(Duration::ZERO).await;

    store.fetch_products(PageParams::page(0)).await;
    assert_eq!(store.snapshot().products().len(), 5);

    store.search_products(SearchParams::new("soap")).await;

    let state = store.snapshot();
    let ids: Vec<&str> = state.products().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p1", "p2", "p5"]);
    assert_eq!(state.pagination().total_elements, 3);
}

#[tokio::test]
async fn test_category_and_price_range_listings() {
    let (_api, store) = setup(Duration::ZERO).await;

    store
        .fetch_products_by_category("home", PageParams::page(0))
        .await;
    assert_eq!(store.snapshot().products().len(), 2);

    let range = PriceRange::new(Decimal::new(9, 0), Decimal::new(15, 0)).unwrap();
    store
        .fetch_products_by_price_range(range, PageParams::page(0))
        .await;
    let state = store.snapshot();
    let ids: Vec<&str> = state.products().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p2", "p4"]);
}

#[tokio::test]
async fn test_listing_failure_uses_body_message_and_keeps_products() {
    let (api, store) = setup(Duration::ZERO).await;
    store.fetch_products(PageParams::page(0)).await;

    api.fail_with(StatusCode::INTERNAL_SERVER_ERROR, Some("Database unavailable"));
    store.fetch_products(PageParams::page(1)).await;

    let state = store.snapshot();
    assert_eq!(state.status(), RequestStatus::Error);
    assert_eq!(state.error(), Some("Database unavailable"));
    assert_eq!(state.products().len(), 5);
    assert_eq!(state.pagination().current_page, 0);
}

#[tokio::test]
async fn test_listing_failure_without_message_uses_fallback() {
    let (api, store) = setup(Duration::ZERO).await;

    api.fail_with(StatusCode::SERVICE_UNAVAILABLE, None);
    store.fetch_products(PageParams::page(0)).await;
    assert_eq!(store.snapshot().error(), Some("Failed to fetch products"));

    api.recover();
    store.fetch_products(PageParams::page(0)).await;
    let state = store.snapshot();
    assert_eq!(state.status(), RequestStatus::Idle);
    assert!(state.error().is_none());
}

#[tokio::test]
async fn test_unreachable_api_uses_fallback() {
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let store = CatalogStore::new(ProductApiClient::new(&storefront_state::CatalogApiConfig {
        base_url: format!("http://{closed}").parse().unwrap(),
        cache_ttl: Duration::ZERO,
    }));

    store.search_products(SearchParams::new("soap")).await;

    let state = store.snapshot();
    assert_eq!(state.status(), RequestStatus::Error);
    assert_eq!(state.error(), Some("Failed to search products"));
}

// =============================================================================
// Product Detail
// =============================================================================

#[tokio::test]
async fn test_product_detail_and_missing_product() {
    let (_api, store) = setup(Duration::ZERO).await;

    store.fetch_product_by_id("p4").await;
    let product = store.snapshot().current_product().cloned().unwrap();
    assert_eq!(product.name, "Tea Candle");
    assert_eq!(product.price, Decimal::new(12, 0));

    store.fetch_product_by_id("nope").await;
    let state = store.snapshot();
    assert_eq!(state.status(), RequestStatus::Error);
    assert_eq!(state.error(), Some("Product not found with id: nope"));
    assert_eq!(state.current_product().unwrap().id.as_str(), "p4");

    store.clear_current_product();
    store.clear_error();
    let state = store.snapshot();
    assert!(state.current_product().is_none());
    assert!(state.error().is_none());
}

#[tokio::test]
async fn test_product_detail_feeds_cart() {
    let (_api, store) = setup(Duration::ZERO).await;
    let mut cart = CartStore::load(MemoryStorage::new(), "cartItems");

    store.fetch_product_by_id("p5").await;
    let snapshot = store.snapshot();
    let product = snapshot.current_product().unwrap();
    cart.add_item(CartCandidate::from(product));
    cart.add_item(CartCandidate::from(product));

    let item = cart.state().item("p5").unwrap();
    assert_eq!(item.quantity, 2);
    assert_eq!(item.image_url, "https://cdn.example.com/p5.jpg");
    assert_eq!(cart.state().total_amount(), Decimal::new(3050, 2));
}

// =============================================================================
// Featured And Facets
// =============================================================================

#[tokio::test]
async fn test_featured_is_cached_until_invalidated() {
    let (api, store) = setup(Duration::from_secs(60)).await;

    store.fetch_featured_products().await;
    store.fetch_featured_products().await;
    assert_eq!(store.snapshot().featured().len(), 2);
    assert_eq!(api.featured_hits(), 1);

    store.client().invalidate_cache();
    store.fetch_featured_products().await;
    assert_eq!(api.featured_hits(), 2);
}

#[tokio::test]
async fn test_featured_failure_is_silent() {
    let (api, store) = setup(Duration::ZERO).await;
    store.fetch_featured_products().await;

    api.fail_with(StatusCode::INTERNAL_SERVER_ERROR, Some("Featured broke"));
    store.fetch_featured_products().await;

    let state = store.snapshot();
    assert_eq!(state.featured().len(), 2);
    assert_eq!(state.status(), RequestStatus::Idle);
    assert!(state.error().is_none());
}

#[tokio::test]
async fn test_categories_and_brands() {
    let (_api, store) = setup(Duration::from_secs(60)).await;

    store.fetch_categories().await;
    store.fetch_brands().await;

    let state = store.snapshot();
    assert_eq!(state.categories(), ["bath", "home"]);
    assert_eq!(state.brands(), ["Loom", "Meadow", "Wick & Co"]);
}
