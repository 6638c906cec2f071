//! Cart store backed by file storage.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal::Decimal;
use serde_json::Value;
use storefront_state::cart::DEFAULT_CART_KEY;
use storefront_state::{CartCandidate, CartStore, FileStorage};

fn candidate(id: &str, price: Decimal, stock: u32) -> CartCandidate {
    CartCandidate {
        id: id.into(),
        name: format!("Product {id}"),
        price,
        image_url: format!("https://cdn.example.com/{id}.jpg"),
        stock_quantity: stock,
    }
}

fn stored_json(dir: &std::path::Path) -> Value {
    let raw = std::fs::read_to_string(dir.join("cartItems.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_cart_survives_reload() {
    let dir = tempfile::tempdir().unwrap();

    let mut cart = CartStore::load(FileStorage::new(dir.path()), DEFAULT_CART_KEY);
    cart.add_item(candidate("p1", Decimal::new(1250, 2), 5));
    cart.add_item(candidate("p2", Decimal::new(500, 2), 1));
    cart.set_quantity("p1", 3);
    let before = cart.state().clone();

    let reloaded = CartStore::load(FileStorage::new(dir.path()), DEFAULT_CART_KEY);
    assert_eq!(reloaded.state(), &before);
    assert_eq!(reloaded.state().total_items(), 4);
    assert_eq!(reloaded.state().total_amount(), Decimal::new(4250, 2));
}

#[test]
fn test_stored_payload_shape() {
    let dir = tempfile::tempdir().unwrap();

    let mut cart = CartStore::load(FileStorage::new(dir.path()), DEFAULT_CART_KEY);
    cart.add_item(candidate("p1", Decimal::new(1250, 2), 5));

    let stored = stored_json(dir.path());
    let line = &stored.as_array().unwrap()[0];
    assert_eq!(line["id"], "p1");
    assert_eq!(line["quantity"], 1);
    assert_eq!(line["price"].as_f64(), Some(12.5));
    assert_eq!(line["imageUrl"], "https://cdn.example.com/p1.jpg");
    assert_eq!(line["stockQuantity"], 5);
}

#[test]
fn test_clear_removes_stored_payload() {
    let dir = tempfile::tempdir().unwrap();

    let mut cart = CartStore::load(FileStorage::new(dir.path()), DEFAULT_CART_KEY);
    cart.add_item(candidate("p1", Decimal::ONE, 5));
    assert!(dir.path().join("cartItems.json").exists());

    cart.clear();
    assert!(!dir.path().join("cartItems.json").exists());

    let reloaded = CartStore::load(FileStorage::new(dir.path()), DEFAULT_CART_KEY);
    assert!(reloaded.state().is_empty());
}

#[test]
fn test_removing_last_line_writes_empty_list() {
    let dir = tempfile::tempdir().unwrap();

    let mut cart = CartStore::load(FileStorage::new(dir.path()), DEFAULT_CART_KEY);
    cart.add_item(candidate("p1", Decimal::ONE, 5));
    cart.remove_item("p1");

    assert_eq!(stored_json(dir.path()), serde_json::json!([]));
}

#[test]
fn test_corrupt_payload_loads_empty_and_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cartItems.json"), "{not json").unwrap();

    let mut cart = CartStore::load(FileStorage::new(dir.path()), DEFAULT_CART_KEY);
    assert!(cart.state().is_empty());
    assert_eq!(cart.state().total_amount(), Decimal::ZERO);

    cart.add_item(candidate("p9", Decimal::new(300, 2), 2));
    assert_eq!(stored_json(dir.path()).as_array().unwrap().len(), 1);
}

#[test]
fn test_web_client_payload_loads() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("cartItems.json"),
        r#"[{"id":"a","name":"A","price":19.99,"quantity":2,"imageUrl":"/a.png","stockQuantity":4}]"#,
    )
    .unwrap();

    let mut cart = CartStore::load(FileStorage::new(dir.path()), DEFAULT_CART_KEY);
    assert_eq!(cart.state().total_items(), 2);
    assert_eq!(cart.state().total_amount(), Decimal::new(3998, 2));

    cart.increment_quantity("a");
    cart.increment_quantity("a");
    cart.increment_quantity("a");
    assert_eq!(cart.state().item("a").unwrap().quantity, 4);
}

#[test]
fn test_custom_storage_key() {
    let dir = tempfile::tempdir().unwrap();

    let mut cart = CartStore::load(FileStorage::new(dir.path()), "guestCart");
    cart.add_item(candidate("p1", Decimal::ONE, 1));

    assert!(dir.path().join("guestCart.json").exists());
    assert!(!dir.path().join("cartItems.json").exists());
}
