//! Decimal price helpers.
//!
//! Prices are carried as [`Decimal`] end to end so that cart totals are
//! exact sums of `price * quantity`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`PriceRange`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceRangeError {
    /// A bound is below zero.
    #[error("price bound cannot be negative: {0}")]
    Negative(Decimal),
    /// The minimum is above the maximum.
    #[error("minimum price {min} is greater than maximum price {max}")]
    Inverted {
        /// Requested lower bound.
        min: Decimal,
        /// Requested upper bound.
        max: Decimal,
    },
}

/// An inclusive price filter for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    min_price: Decimal,
    max_price: Decimal,
}

impl PriceRange {
    /// Create a price range.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is negative or `min > max`.
    pub fn new(min_price: Decimal, max_price: Decimal) -> Result<Self, PriceRangeError> {
        for bound in [min_price, max_price] {
            if bound.is_sign_negative() && !bound.is_zero() {
                return Err(PriceRangeError::Negative(bound));
            }
        }
        if min_price > max_price {
            return Err(PriceRangeError::Inverted {
                min: min_price,
                max: max_price,
            });
        }
        Ok(Self {
            min_price,
            max_price,
        })
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub const fn min_price(&self) -> Decimal {
        self.min_price
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub const fn max_price(&self) -> Decimal {
        self.max_price
    }
}

/// Format an amount for display (e.g., "$19.99").
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_range_valid() {
        let range = PriceRange::new(Decimal::new(10, 0), Decimal::new(2500, 2)).unwrap();
        assert_eq!(range.min_price(), Decimal::new(10, 0));
        assert_eq!(range.max_price(), Decimal::new(25, 0));
    }

    #[test]
    fn test_price_range_inverted() {
        let err = PriceRange::new(Decimal::new(30, 0), Decimal::new(10, 0)).unwrap_err();
        assert!(matches!(err, PriceRangeError::Inverted { .. }));
    }

    #[test]
    fn test_price_range_negative() {
        let err = PriceRange::new(Decimal::new(-1, 0), Decimal::new(10, 0)).unwrap_err();
        assert_eq!(err, PriceRangeError::Negative(Decimal::new(-1, 0)));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Decimal::new(1999, 2)), "$19.99");
        assert_eq!(format_price(Decimal::new(20, 0)), "$20.00");
        assert_eq!(format_price(Decimal::ZERO), "$0.00");
    }
}
