//! Catalog products and listing pages.
//!
//! These mirror the JSON shapes served by the catalog API (`camelCase`
//! fields, Spring-style pages). Nullable collections and counters
//! deserialize to their empty values.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::status::SortDirection;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend-generated identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price.
    pub price: Decimal,
    /// Category name, used for category listings and facets.
    #[serde(default)]
    pub category: Option<String>,
    /// Brand name.
    #[serde(default)]
    pub brand: Option<String>,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// Units in stock; the cart never lets a line exceed this.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock_quantity: u32,
    /// Image URLs, primary image first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
    /// Free-form tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Average review rating.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Number of reviews.
    #[serde(default, deserialize_with = "null_as_default")]
    pub review_count: u32,
    /// Whether the product is listed.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Whether the product appears in the featured set.
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Primary image URL, if the product has any images.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

const fn default_true() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// =============================================================================
// Pages
// =============================================================================

/// One page of a product listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// Products on this page.
    pub content: Vec<Product>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Zero-based index of this page.
    pub number: u32,
    /// Total number of products across all pages.
    pub total_elements: u64,
}

/// Paging and ordering for product listings.
///
/// Unset fields are left to the catalog API's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDirection>,
}

impl PageParams {
    /// Params for a zero-based page index.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the sort field and direction.
    #[must_use]
    pub fn sorted_by(mut self, field: impl Into<String>, dir: SortDirection) -> Self {
        self.sort_by = Some(field.into());
        self.sort_dir = Some(dir);
        self
    }
}

/// Name search over the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub name: String,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl SearchParams {
    /// Search for products whose name matches `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
