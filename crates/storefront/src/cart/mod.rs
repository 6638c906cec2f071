//! Cart store: line items, derived totals, and durable persistence.
//!
//! # Architecture
//!
//! - [`state`] holds the pure reducer; it computes `(next state, effect)`
//! - [`CartStore`] owns the current snapshot and a storage backend, and
//!   carries out the persistence effect after every transition
//! - [`persist`] defines the stored JSON payload
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use storefront_state::cart::{CartCandidate, CartStore};
//! use storefront_state::storage::MemoryStorage;
//! use storefront_state_core::ProductId;
//!
//! let mut cart = CartStore::load(MemoryStorage::new(), "cartItems");
//! cart.add_item(CartCandidate {
//!     id: ProductId::new("p1"),
//!     name: "Lavender Soap".to_string(),
//!     price: Decimal::new(10, 0),
//!     image_url: String::new(),
//!     stock_quantity: 2,
//! });
//! assert_eq!(cart.state().total_items(), 1);
//! ```

pub mod persist;
pub mod state;

pub use state::{
    CartAction, CartCandidate, CartLineItem, CartState, CartTransition, PersistEffect, reduce,
};

use storefront_state_core::ProductId;
use tracing::{debug, instrument, warn};

use crate::storage::DurableStorage;

/// Storage key the web client has always used for the cart payload.
pub const DEFAULT_CART_KEY: &str = "cartItems";

/// Owns the cart snapshot for one client session.
///
/// Built once by the application's composition root and handed to views by
/// reference.
#[derive(Debug)]
pub struct CartStore<S> {
    state: CartState,
    storage: S,
    key: String,
}

impl<S: DurableStorage> CartStore<S> {
    /// Initialize from whatever is stored under `key`.
    ///
    /// A missing, unreadable, or unparsable payload yields an empty cart.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = storage
            .read(&key)
            .ok()
            .flatten()
            .map(|raw| persist::decode(&raw))
            .unwrap_or_default();
        let state = CartState::restore(items);
        debug!(
            key = %key,
            lines = state.items().len(),
            total_items = state.total_items(),
            "Cart loaded"
        );

        Self {
            state,
            storage,
            key,
        }
    }

    /// Current snapshot.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Key the cart payload is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Apply `action` and persist the result before returning.
    ///
    /// Storage failures are logged and do not roll back the in-memory
    /// transition; the next successful write brings storage back in step.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn dispatch(&mut self, action: CartAction) -> &CartState {
        let CartTransition { state, effect } = reduce(&self.state, action);
        self.state = state;

        let result = match effect {
            PersistEffect::None => Ok(()),
            PersistEffect::Write => match persist::encode(self.state.items()) {
                Ok(payload) => self.storage.write(&self.key, &payload),
                Err(e) => {
                    warn!(error = %e, "Failed to serialize cart");
                    Ok(())
                }
            },
            PersistEffect::Remove => self.storage.remove(&self.key),
        };
        if let Err(e) = result {
            warn!(error = %e, ?effect, "Failed to persist cart");
        }

        &self.state
    }

    /// Add one unit of `candidate`.
    pub fn add_item(&mut self, candidate: CartCandidate) -> &CartState {
        self.dispatch(CartAction::AddItem(candidate))
    }

    /// Remove the line for `id`, if any.
    pub fn remove_item(&mut self, id: impl Into<ProductId>) -> &CartState {
        self.dispatch(CartAction::RemoveItem(id.into()))
    }

    /// Set the quantity for `id`, clamped to `[0, stock]`.
    pub fn set_quantity(&mut self, id: impl Into<ProductId>, quantity: i64) -> &CartState {
        self.dispatch(CartAction::SetQuantity {
            id: id.into(),
            quantity,
        })
    }

    pub fn increment_quantity(&mut self, id: impl Into<ProductId>) -> &CartState {
        self.dispatch(CartAction::IncrementQuantity(id.into()))
    }

    pub fn decrement_quantity(&mut self, id: impl Into<ProductId>) -> &CartState {
        self.dispatch(CartAction::DecrementQuantity(id.into()))
    }

    /// Empty the cart and erase its stored payload.
    pub fn clear(&mut self) -> &CartState {
        self.dispatch(CartAction::Clear)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn candidate(id: &str, price: i64, stock: u32) -> CartCandidate {
        CartCandidate {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(price, 0),
            image_url: String::new(),
            stock_quantity: stock,
        }
    }

    fn stored(storage: &MemoryStorage) -> Option<String> {
        storage.read(DEFAULT_CART_KEY).unwrap()
    }

    #[test]
    fn test_load_missing_payload_is_empty() {
        let cart = CartStore::load(MemoryStorage::new(), DEFAULT_CART_KEY);
        assert!(cart.state().is_empty());
        assert_eq!(cart.state().total_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_load_corrupt_payload_is_empty() {
        let storage = MemoryStorage::with_entry(DEFAULT_CART_KEY, "}{");
        let cart = CartStore::load(storage, DEFAULT_CART_KEY);
        assert!(cart.state().is_empty());
        // The corrupt value is left alone until the next mutation
        assert_eq!(stored(cart.storage()).as_deref(), Some("}{"));
    }

    #[test]
    fn test_load_computes_totals_from_stored_items() {
        let storage = MemoryStorage::with_entry(
            DEFAULT_CART_KEY,
            r#"[{"id":"a","name":"A","price":2.5,"quantity":2,"imageUrl":"","stockQuantity":5},
                {"id":"b","name":"B","price":10,"quantity":1,"imageUrl":"","stockQuantity":1}]"#,
        );
        let cart = CartStore::load(storage, DEFAULT_CART_KEY);
        assert_eq!(cart.state().total_items(), 3);
        assert_eq!(cart.state().total_amount(), Decimal::new(15, 0));
    }

    #[test]
    fn test_load_amount_beyond_decimal_range_does_not_panic() {
        let storage = MemoryStorage::with_entry(
            DEFAULT_CART_KEY,
            r#"[{"id":"a","name":"A","price":50000000000000000000000000000,"quantity":2,"imageUrl":"","stockQuantity":5},
                {"id":"b","name":"B","price":3,"quantity":1,"imageUrl":"","stockQuantity":1}]"#,
        );
        let cart = CartStore::load(storage, DEFAULT_CART_KEY);
        assert!(cart.state().item("a").is_none());
        assert_eq!(cart.state().total_items(), 1);
        assert_eq!(cart.state().total_amount(), Decimal::new(3, 0));
    }

    #[test]
    fn test_every_change_is_written_through() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CartStore::load(Arc::clone(&storage), DEFAULT_CART_KEY);

        cart.add_item(candidate("p1", 10, 2));
        let reloaded = CartStore::load(Arc::clone(&storage), DEFAULT_CART_KEY);
        assert_eq!(reloaded.state(), cart.state());

        cart.set_quantity("p1", 2);
        let reloaded = CartStore::load(Arc::clone(&storage), DEFAULT_CART_KEY);
        assert_eq!(reloaded.state().items()[0].quantity, 2);
        assert_eq!(reloaded.state().total_amount(), Decimal::new(20, 0));
    }

    #[test]
    fn test_noop_does_not_write() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CartStore::load(Arc::clone(&storage), DEFAULT_CART_KEY);

        cart.remove_item("ghost");
        cart.increment_quantity("ghost");
        cart.decrement_quantity("ghost");
        assert!(!storage.contains(DEFAULT_CART_KEY));
    }

    #[test]
    fn test_removing_last_item_persists_empty_list() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CartStore::load(Arc::clone(&storage), DEFAULT_CART_KEY);

        cart.add_item(candidate("p1", 10, 2));
        cart.remove_item("p1");
        assert_eq!(stored(&storage).as_deref(), Some("[]"));
    }

    #[test]
    fn test_clear_removes_stored_payload() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = CartStore::load(Arc::clone(&storage), DEFAULT_CART_KEY);

        cart.add_item(candidate("p1", 10, 2));
        cart.add_item(candidate("p2", 5, 2));
        let state = cart.clear();
        assert!(state.is_empty());
        assert_eq!(state.total_items(), 0);

        assert!(!storage.contains(DEFAULT_CART_KEY));
        let reloaded = CartStore::load(Arc::clone(&storage), DEFAULT_CART_KEY);
        assert!(reloaded.state().is_empty());
    }

    struct ReadOnlyStorage;

    impl DurableStorage for ReadOnlyStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("unreadable")))
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }
    }

    #[test]
    fn test_storage_failures_degrade_without_losing_state() {
        let mut cart = CartStore::load(ReadOnlyStorage, DEFAULT_CART_KEY);
        assert!(cart.state().is_empty());

        cart.add_item(candidate("p1", 10, 2));
        cart.add_item(candidate("p1", 10, 2));
        assert_eq!(cart.state().total_items(), 2);

        assert!(cart.clear().is_empty());
    }
}
