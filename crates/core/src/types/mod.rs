//! Core types for the storefront state layer.
//!
//! This module provides type-safe wrappers for catalog concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use id::*;
pub use price::{PriceRange, PriceRangeError, format_price};
pub use product::{PageParams, Product, ProductPage, SearchParams};
pub use status::*;
