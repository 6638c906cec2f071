//! Cache types for catalog API responses.

use storefront_state_core::Product;

/// Cache key for slow-changing catalog queries.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Featured,
    Categories,
    Brands,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Names(Vec<String>),
}
