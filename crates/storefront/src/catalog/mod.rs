//! Catalog store: listing, featured products, product detail, and facets.
//!
//! Each fetch intent runs in three phases:
//!
//! 1. **pending** - applied synchronously when the intent is called; the
//!    request gets a fresh [`RequestTicket`] and becomes the latest of its kind
//! 2. the fetch client is awaited; other intents may run meanwhile
//! 3. **fulfilled** / **rejected** - the outcome is reduced into the state,
//!    unless a newer request of the same kind was dispatched in between
//!
//! Snapshots are published on a `watch` channel so views can re-render on
//! change. No lock is held across an await.

pub mod state;

pub use state::{CatalogEvent, CatalogState, FetchKind, Pagination, RequestTicket, reduce};

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use storefront_state_core::{PageParams, PriceRange, ProductId, SearchParams};
use tokio::sync::watch;
use tracing::{Instrument, debug, debug_span, warn};

use crate::fetch::{FetchClient, FetchError};

/// Owns the catalog snapshot for one client session.
///
/// Cheap to clone; clones share the same state and client.
pub struct CatalogStore<C> {
    inner: Arc<CatalogStoreInner<C>>,
}

struct CatalogStoreInner<C> {
    client: C,
    state: watch::Sender<CatalogState>,
    next_token: AtomicU64,
}

impl<C> Clone for CatalogStore<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> std::fmt::Debug for CatalogStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<C: FetchClient> CatalogStore<C> {
    /// Create an empty, idle catalog backed by `client`.
    pub fn new(client: C) -> Self {
        let (state, _) = watch::channel(CatalogState::default());
        Self {
            inner: Arc::new(CatalogStoreInner {
                client,
                state,
                next_token: AtomicU64::new(0),
            }),
        }
    }

    /// The fetch client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.inner.client
    }

    /// A copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CatalogState {
        self.inner.state.borrow().clone()
    }

    /// Receive every new snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.inner.state.subscribe()
    }

    /// Reduce `event` into the state. Returns whether the state changed.
    fn apply(&self, event: CatalogEvent) -> bool {
        self.inner.state.send_if_modified(|state| {
            if let Some(ticket) = event.outcome_of()
                && !state.is_current(ticket)
            {
                debug!(kind = ?ticket.kind, token = ticket.token, "Discarding superseded outcome");
                return false;
            }
            *state = reduce(std::mem::take(state), event);
            true
        })
    }

    /// Pending phase: issue a ticket and record it as the latest of its kind.
    fn begin(&self, kind: FetchKind) -> RequestTicket {
        let token = self.inner.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        let ticket = RequestTicket { kind, token };
        self.apply(CatalogEvent::Dispatched(ticket));
        ticket
    }

    /// Fulfilled or rejected phase.
    fn settle<T>(
        &self,
        ticket: RequestTicket,
        outcome: Result<T, FetchError>,
        fallback: &str,
        loaded: fn(RequestTicket, T) -> CatalogEvent,
    ) {
        let event = match outcome {
            Ok(value) => loaded(ticket, value),
            Err(e) => {
                warn!(error = %e, kind = ?ticket.kind, token = ticket.token, "Catalog fetch failed");
                let message = e.detail().map_or_else(|| fallback.to_string(), str::to_string);
                CatalogEvent::Failed(ticket, message)
            }
        };
        self.apply(event);
    }

    // =========================================================================
    // Fetch Intents
    // =========================================================================

    /// Load one page of the product listing.
    ///
    /// The pending phase is applied before this returns; await the future to
    /// reconcile the outcome.
    pub fn fetch_products(&self, params: PageParams) -> impl Future<Output = ()> {
        let ticket = self.begin(FetchKind::Listing);
        async move {
            let outcome = self.inner.client.list_products(&params).await;
            self.settle(ticket, outcome, "Failed to fetch products", CatalogEvent::ListingLoaded);
        }
        .instrument(debug_span!("fetch_products", token = ticket.token))
    }

    /// Search products by name; replaces the listing.
    pub fn search_products(&self, params: SearchParams) -> impl Future<Output = ()> {
        let ticket = self.begin(FetchKind::Listing);
        async move {
            let outcome = self.inner.client.search(&params).await;
            self.settle(ticket, outcome, "Failed to search products", CatalogEvent::ListingLoaded);
        }
        .instrument(debug_span!("search_products", token = ticket.token))
    }

    /// List one category; replaces the listing.
    pub fn fetch_products_by_category(
        &self,
        category: impl Into<String>,
        params: PageParams,
    ) -> impl Future<Output = ()> {
        let category = category.into();
        let ticket = self.begin(FetchKind::Listing);
        async move {
            let outcome = self.inner.client.list_by_category(&category, &params).await;
            self.settle(ticket, outcome, "Failed to fetch products", CatalogEvent::ListingLoaded);
        }
        .instrument(debug_span!("fetch_products_by_category", token = ticket.token))
    }

    /// List products within a price range; replaces the listing.
    pub fn fetch_products_by_price_range(
        &self,
        range: PriceRange,
        params: PageParams,
    ) -> impl Future<Output = ()> {
        let ticket = self.begin(FetchKind::Listing);
        async move {
            let outcome = self.inner.client.list_by_price_range(&range, &params).await;
            self.settle(ticket, outcome, "Failed to fetch products", CatalogEvent::ListingLoaded);
        }
        .instrument(debug_span!("fetch_products_by_price_range", token = ticket.token))
    }

    /// Load the featured set. Failures leave the previous set in place.
    pub fn fetch_featured_products(&self) -> impl Future<Output = ()> {
        let ticket = self.begin(FetchKind::Featured);
        async move {
            let outcome = self.inner.client.get_featured().await;
            self.settle(
                ticket,
                outcome,
                "Failed to fetch featured products",
                CatalogEvent::FeaturedLoaded,
            );
        }
        .instrument(debug_span!("fetch_featured_products", token = ticket.token))
    }

    /// Load a single product into `current_product`.
    ///
    /// On failure the previously selected product stays selected.
    pub fn fetch_product_by_id(&self, id: impl Into<ProductId>) -> impl Future<Output = ()> {
        let id = id.into();
        let ticket = self.begin(FetchKind::Product);
        let span = debug_span!("fetch_product_by_id", token = ticket.token, id = %id);
        async move {
            let outcome = self.inner.client.get_by_id(&id).await;
            self.settle(ticket, outcome, "Failed to fetch product", CatalogEvent::ProductLoaded);
        }
        .instrument(span)
    }

    /// Load the category facet list.
    pub fn fetch_categories(&self) -> impl Future<Output = ()> {
        let ticket = self.begin(FetchKind::Categories);
        async move {
            let outcome = self.inner.client.list_categories().await;
            self.settle(
                ticket,
                outcome,
                "Failed to fetch categories",
                CatalogEvent::CategoriesLoaded,
            );
        }
        .instrument(debug_span!("fetch_categories", token = ticket.token))
    }

    /// Load the brand facet list.
    pub fn fetch_brands(&self) -> impl Future<Output = ()> {
        let ticket = self.begin(FetchKind::Brands);
        async move {
            let outcome = self.inner.client.list_brands().await;
            self.settle(ticket, outcome, "Failed to fetch brands", CatalogEvent::BrandsLoaded);
        }
        .instrument(debug_span!("fetch_brands", token = ticket.token))
    }

    // =========================================================================
    // Local Mutations
    // =========================================================================

    /// Deselect the current product.
    pub fn clear_current_product(&self) {
        self.apply(CatalogEvent::CurrentProductCleared);
    }

    /// Dismiss the last error message.
    pub fn clear_error(&self) {
        self.apply(CatalogEvent::ErrorCleared);
    }
}
