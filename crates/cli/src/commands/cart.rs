//! Cart commands.

#![allow(clippy::print_stdout)]

use storefront_state::{CartCandidate, CartState, CartStore, CatalogStore, DurableStorage, FetchClient};
use storefront_state_core::format_price;

use crate::CliError;

/// Print every line and the cart totals.
pub fn show(cart: &CartState) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for item in cart.items() {
        println!(
            "{:<16} {:<32} {:>4} x {:>10} = {:>10}",
            item.id.as_str(),
            item.name,
            item.quantity,
            format_price(item.price),
            format_price(item.line_total()),
        );
    }
    println!(
        "{} item(s), total {}",
        cart.total_items(),
        format_price(cart.total_amount())
    );
}

/// Look up `id` in the catalog and add it to the cart.
///
/// # Errors
///
/// Returns `CliError::Catalog` if the product could not be loaded.
pub async fn add<S, C>(
    cart: &mut CartStore<S>,
    catalog: &CatalogStore<C>,
    id: String,
) -> Result<(), CliError>
where
    S: DurableStorage,
    C: FetchClient,
{
    catalog.fetch_product_by_id(id).await;

    let snapshot = catalog.snapshot();
    if let Some(message) = snapshot.error() {
        return Err(CliError::Catalog(message.to_string()));
    }
    let Some(product) = snapshot.current_product() else {
        return Err(CliError::Catalog("Failed to fetch product".to_string()));
    };

    tracing::info!(id = %product.id, "Adding product to cart");
    show(cart.add_item(CartCandidate::from(product)));
    Ok(())
}
