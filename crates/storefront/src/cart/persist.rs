//! Wire format of the persisted cart.
//!
//! The payload is a JSON array of line items. Anything that does not parse
//! as one is treated as an empty cart.

use super::state::CartLineItem;

/// Serialize line items for storage.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(items: &[CartLineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Parse a stored payload, yielding no items when it is unparsable.
#[must_use]
pub fn decode(raw: &str) -> Vec<CartLineItem> {
    serde_json::from_str(raw).unwrap_or_default()
}
