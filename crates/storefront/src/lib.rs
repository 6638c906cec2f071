//! Storefront client state.
//!
//! Two independent state containers back the storefront views:
//!
//! - [`cart::CartStore`] - the shopping cart, mirrored to durable storage
//!   after every change to its line items
//! - [`catalog::CatalogStore`] - product listing, featured products, the
//!   selected product, and facet lists, loaded through a [`fetch::FetchClient`]
//!
//! Both are driven by pure reducers (`cart::reduce`, `catalog::reduce`) so
//! the transition rules can be tested without storage or a network.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod fetch;
pub mod storage;

pub use cart::{CartAction, CartCandidate, CartLineItem, CartState, CartStore};
pub use catalog::{CatalogState, CatalogStore};
pub use config::{CatalogApiConfig, ConfigError, StateConfig};
pub use fetch::{FetchClient, FetchError, ProductApiClient};
pub use storage::{DurableStorage, FileStorage, MemoryStorage, StorageError};
