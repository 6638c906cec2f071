//! Command implementations.
//!
//! Each command prints to stdout; diagnostics go through `tracing`.

pub mod cart;
pub mod catalog;
