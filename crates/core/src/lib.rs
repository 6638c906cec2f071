//! Storefront State Core - Shared catalog types.
//!
//! This crate provides the types shared between the state layer
//! (`storefront-state`), its fetch adapters, and the CLI:
//! - products and listing pages as returned by the catalog API
//! - pagination, search, and price-range query parameters
//! - request status for asynchronous catalog fetches
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. Products are passed through as the catalog API
//! produced them; validation is the producer's responsibility.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, products, pages, query parameters, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
