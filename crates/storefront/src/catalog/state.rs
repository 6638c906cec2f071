//! Catalog state and outcome reconciliation.
//!
//! Every fetch is identified by a [`RequestTicket`]: its kind plus a
//! token that increases with each dispatch. The state remembers the latest
//! token per kind, and [`reduce`] ignores outcomes carrying any other token,
//! so a slow response can never overwrite a newer one.

use std::collections::HashMap;

use storefront_state_core::{Product, ProductPage, RequestStatus};

// =============================================================================
// Requests
// =============================================================================

/// Groups of fetches that share a slot in the state.
///
/// All listing queries (plain, search, category, price range) replace the
/// same listing, so they supersede one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Listing,
    Featured,
    Product,
    Categories,
    Brands,
}

impl FetchKind {
    /// Whether this kind drives `status` and `error`.
    #[must_use]
    pub const fn tracks_status(self) -> bool {
        matches!(self, Self::Listing | Self::Product)
    }
}

/// Identity of one dispatched fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub kind: FetchKind,
    pub token: u64,
}

// =============================================================================
// Catalog State
// =============================================================================

/// Pagination of the current listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Zero-based index of the loaded page.
    pub current_page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

/// Immutable snapshot of the catalog view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    products: Vec<Product>,
    pagination: Pagination,
    featured: Vec<Product>,
    current_product: Option<Product>,
    categories: Vec<String>,
    brands: Vec<String>,
    status: RequestStatus,
    error: Option<String>,
    latest: HashMap<FetchKind, u64>,
}

impl CatalogState {
    /// The loaded listing page.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    #[must_use]
    pub fn featured(&self) -> &[Product] {
        &self.featured
    }

    /// The product selected for a detail view, independent of the listing.
    #[must_use]
    pub const fn current_product(&self) -> Option<&Product> {
        self.current_product.as_ref()
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn brands(&self) -> &[String] {
        &self.brands
    }

    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    /// Message of the last failed listing or product fetch.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether `ticket` is the most recent dispatch of its kind.
    #[must_use]
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.get(&ticket.kind) == Some(&ticket.token)
    }
}

// =============================================================================
// Events
// =============================================================================

/// Everything that can happen to the catalog state.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    /// A fetch was dispatched and is now the latest of its kind.
    Dispatched(RequestTicket),
    ListingLoaded(RequestTicket, ProductPage),
    FeaturedLoaded(RequestTicket, Vec<Product>),
    ProductLoaded(RequestTicket, Product),
    CategoriesLoaded(RequestTicket, Vec<String>),
    BrandsLoaded(RequestTicket, Vec<String>),
    /// A fetch failed; the message is already resolved for display.
    Failed(RequestTicket, String),
    CurrentProductCleared,
    ErrorCleared,
}

impl CatalogEvent {
    /// The fetch this event settles, if it is an outcome.
    #[must_use]
    pub const fn outcome_of(&self) -> Option<RequestTicket> {
        match self {
            Self::ListingLoaded(t, _)
            | Self::FeaturedLoaded(t, _)
            | Self::ProductLoaded(t, _)
            | Self::CategoriesLoaded(t, _)
            | Self::BrandsLoaded(t, _)
            | Self::Failed(t, _) => Some(*t),
            Self::Dispatched(_) | Self::CurrentProductCleared | Self::ErrorCleared => None,
        }
    }
}

/// Compute the next catalog state for `event`.
///
/// Outcomes whose ticket is not current return `state` untouched.
#[must_use]
pub fn reduce(mut state: CatalogState, event: CatalogEvent) -> CatalogState {
    if let Some(ticket) = event.outcome_of()
        && !state.is_current(ticket)
    {
        return state;
    }

    match event {
        CatalogEvent::Dispatched(ticket) => {
            state.latest.insert(ticket.kind, ticket.token);
            if ticket.kind.tracks_status() {
                state.status = RequestStatus::Loading;
                state.error = None;
            }
        }
        CatalogEvent::ListingLoaded(_, page) => {
            state.status = RequestStatus::Idle;
            state.products = page.content;
            state.pagination = Pagination {
                current_page: page.number,
                total_pages: page.total_pages,
                total_elements: page.total_elements,
            };
        }
        CatalogEvent::FeaturedLoaded(_, products) => state.featured = products,
        CatalogEvent::ProductLoaded(_, product) => {
            state.status = RequestStatus::Idle;
            state.current_product = Some(product);
        }
        CatalogEvent::CategoriesLoaded(_, categories) => state.categories = categories,
        CatalogEvent::BrandsLoaded(_, brands) => state.brands = brands,
        CatalogEvent::Failed(ticket, message) => {
            // Background loads keep whatever they had
            if ticket.kind.tracks_status() {
                state.status = RequestStatus::Error;
                state.error = Some(message);
            }
        }
        CatalogEvent::CurrentProductCleared => state.current_product = None,
        CatalogEvent::ErrorCleared => state.error = None,
    }
    state
}
