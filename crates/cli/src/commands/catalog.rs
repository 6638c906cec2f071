//! Catalog commands.

#![allow(clippy::print_stdout)]

use rust_decimal::Decimal;
use storefront_state::{CatalogState, CatalogStore, FetchClient};
use storefront_state_core::{PageParams, PriceRange, Product, SearchParams, format_price};

use crate::CliError;

/// Turn a settled request into a command result.
fn settled(state: &CatalogState) -> Result<(), CliError> {
    match state.error() {
        Some(message) => Err(CliError::Catalog(message.to_string())),
        None => Ok(()),
    }
}

fn print_product_row(product: &Product) {
    let stock = if product.stock_quantity == 0 {
        "out of stock".to_string()
    } else {
        format!("{} in stock", product.stock_quantity)
    };
    println!(
        "{:<16} {:<32} {:>10}  {}",
        product.id.as_str(),
        product.name,
        format_price(product.price),
        stock
    );
}

fn print_listing(state: &CatalogState) {
    if state.products().is_empty() {
        println!("No products found");
        return;
    }
    for product in state.products() {
        print_product_row(product);
    }

    let pagination = state.pagination();
    println!(
        "Page {} of {} ({} products)",
        pagination.current_page + 1,
        pagination.total_pages.max(1),
        pagination.total_elements
    );
}

fn print_names(names: &[String], empty: &str) {
    if names.is_empty() {
        println!("{empty}");
    }
    for name in names {
        println!("{name}");
    }
}

/// List one page of products.
///
/// # Errors
///
/// Returns `CliError::Catalog` with the catalog's error message.
pub async fn list<C: FetchClient>(
    catalog: &CatalogStore<C>,
    params: PageParams,
) -> Result<(), CliError> {
    catalog.fetch_products(params).await;
    let state = catalog.snapshot();
    settled(&state)?;
    print_listing(&state);
    Ok(())
}

/// Search products by name.
///
/// # Errors
///
/// Returns `CliError::Catalog` with the catalog's error message.
pub async fn search<C: FetchClient>(
    catalog: &CatalogStore<C>,
    params: SearchParams,
) -> Result<(), CliError> {
    catalog.search_products(params).await;
    let state = catalog.snapshot();
    settled(&state)?;
    print_listing(&state);
    Ok(())
}

/// List products in one category.
///
/// # Errors
///
/// Returns `CliError::Catalog` with the catalog's error message.
pub async fn category<C: FetchClient>(
    catalog: &CatalogStore<C>,
    name: String,
    params: PageParams,
) -> Result<(), CliError> {
    catalog.fetch_products_by_category(name, params).await;
    let state = catalog.snapshot();
    settled(&state)?;
    print_listing(&state);
    Ok(())
}

/// List products priced within `[min, max]`.
///
/// # Errors
///
/// Returns `CliError::PriceRange` for bad bounds, or `CliError::Catalog`
/// with the catalog's error message.
pub async fn price<C: FetchClient>(
    catalog: &CatalogStore<C>,
    min: Decimal,
    max: Decimal,
    params: PageParams,
) -> Result<(), CliError> {
    let range = PriceRange::new(min, max)?;
    catalog.fetch_products_by_price_range(range, params).await;
    let state = catalog.snapshot();
    settled(&state)?;
    print_listing(&state);
    Ok(())
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns `CliError::Catalog` with the catalog's error message.
pub async fn show<C: FetchClient>(catalog: &CatalogStore<C>, id: String) -> Result<(), CliError> {
    catalog.fetch_product_by_id(id).await;
    let state = catalog.snapshot();
    settled(&state)?;

    let Some(product) = state.current_product() else {
        return Err(CliError::Catalog("Failed to fetch product".to_string()));
    };

    println!("{} ({})", product.name, product.id);
    println!("Price:    {}", format_price(product.price));
    println!("Stock:    {}", product.stock_quantity);
    if let Some(category) = &product.category {
        println!("Category: {category}");
    }
    if let Some(brand) = &product.brand {
        println!("Brand:    {brand}");
    }
    if let Some(rating) = product.rating {
        println!("Rating:   {rating:.1} ({} reviews)", product.review_count);
    }
    if let Some(description) = &product.description {
        println!();
        println!("{description}");
    }
    Ok(())
}

/// List featured products. Failures print an empty list.
pub async fn featured<C: FetchClient>(catalog: &CatalogStore<C>) {
    catalog.fetch_featured_products().await;
    let state = catalog.snapshot();
    if state.featured().is_empty() {
        println!("No featured products");
    }
    for product in state.featured() {
        print_product_row(product);
    }
}

/// List product categories. Failures print an empty list.
pub async fn categories<C: FetchClient>(catalog: &CatalogStore<C>) {
    catalog.fetch_categories().await;
    print_names(catalog.snapshot().categories(), "No categories");
}

/// List product brands. Failures print an empty list.
pub async fn brands<C: FetchClient>(catalog: &CatalogStore<C>) {
    catalog.fetch_brands().await;
    print_names(catalog.snapshot().brands(), "No brands");
}
