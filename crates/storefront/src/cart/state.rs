//! Cart state and its pure transition function.
//!
//! [`reduce`] is a total function of `(state, action)`: it never touches
//! storage. It returns the next state together with the [`PersistEffect`]
//! the caller must carry out to keep durable storage in step.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_state_core::{Product, ProductId};

// =============================================================================
// Line Items
// =============================================================================

/// One product entry in the cart.
///
/// This is also the persisted shape: a JSON object with
/// `{id, name, price, quantity, imageUrl, stockQuantity}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    /// Unit price. Stored as a JSON number, so only about 15 significant
    /// digits survive a save and reload.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub quantity: u32,
    pub image_url: String,
    /// Stock ceiling captured when the product was added.
    pub stock_quantity: u32,
}

impl CartLineItem {
    /// `price * quantity` for this line, saturating at the decimal range.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// `price * quantity`, or `None` if it does not fit in a `Decimal`.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Sum of line totals, or `None` on overflow.
fn checked_total(items: &[CartLineItem]) -> Option<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.checked_line_total()?)
    })
}

/// A product as offered to the cart: a line item without a quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartCandidate {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
    pub stock_quantity: u32,
}

impl From<&Product> for CartCandidate {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image_url: product.primary_image().unwrap_or_default().to_string(),
            stock_quantity: product.stock_quantity,
        }
    }
}

// =============================================================================
// Cart State
// =============================================================================

/// Immutable snapshot of the cart.
///
/// Totals are always the fold over `items`; there is no way to set them
/// independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    items: Vec<CartLineItem>,
    total_items: u64,
    total_amount: Decimal,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored line items.
    ///
    /// Lines at quantity 0 are dropped, only the first line for each id is
    /// kept, and quantities above the stock ceiling are lowered to it (or to
    /// 1 for a zero-stock line). Lines whose amount would overflow the cart
    /// total are dropped.
    #[must_use]
    pub fn restore(items: Vec<CartLineItem>) -> Self {
        let mut kept: Vec<CartLineItem> = Vec::with_capacity(items.len());
        let mut total_amount = Decimal::ZERO;
        for mut item in items {
            if item.quantity == 0 || kept.iter().any(|k| k.id == item.id) {
                continue;
            }
            item.quantity = item.quantity.min(item.stock_quantity.max(1));
            let Some(total) = item
                .checked_line_total()
                .and_then(|line| total_amount.checked_add(line))
            else {
                continue;
            };
            total_amount = total;
            kept.push(item);
        }
        Self {
            total_items: kept.iter().map(|i| u64::from(i.quantity)).sum(),
            items: kept,
            total_amount,
        }
    }

    /// Fold totals over `items`, or `None` if the amount overflows.
    fn from_items(items: Vec<CartLineItem>) -> Option<Self> {
        let total_amount = checked_total(&items)?;
        let total_items = items.iter().map(|i| u64::from(i.quantity)).sum();
        Some(Self {
            items,
            total_items,
            total_amount,
        })
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Sum of quantities.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Sum of `price * quantity`.
    #[must_use]
    pub const fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.id.as_str() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Actions & Effects
// =============================================================================

/// Every way the cart can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit, appending a new line if needed.
    AddItem(CartCandidate),
    /// Drop a line entirely.
    RemoveItem(ProductId),
    /// Set a line's quantity, clamped to `[0, stock]`; 0 removes it.
    SetQuantity { id: ProductId, quantity: i64 },
    /// One more unit, unless at the stock ceiling.
    IncrementQuantity(ProductId),
    /// One fewer unit; the line goes away at 0.
    DecrementQuantity(ProductId),
    /// Empty the cart and erase its durable copy.
    Clear,
}

/// Storage work implied by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistEffect {
    /// Items unchanged; storage already matches.
    None,
    /// Serialize the full item list under the cart key.
    Write,
    /// Delete the cart key.
    Remove,
}

/// Result of applying a [`CartAction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTransition {
    pub state: CartState,
    pub effect: PersistEffect,
}

impl CartTransition {
    fn unchanged(state: &CartState) -> Self {
        Self {
            state: state.clone(),
            effect: PersistEffect::None,
        }
    }

    /// Replace the items, or keep `previous` if the new total would overflow.
    fn written(previous: &CartState, items: Vec<CartLineItem>) -> Self {
        CartState::from_items(items).map_or_else(
            || Self::unchanged(previous),
            |state| Self {
                state,
                effect: PersistEffect::Write,
            },
        )
    }
}

/// Compute the next cart state for `action`.
///
/// Stock limits are never reported as errors: requests beyond the ceiling
/// clamp or do nothing. A brand-new line is always added at quantity 1,
/// even when its stock ceiling is 0; the ceiling only bounds increments.
/// A change that would push the total amount past the `Decimal` range does
/// nothing.
#[must_use]
pub fn reduce(state: &CartState, action: CartAction) -> CartTransition {
    let find = |id: &ProductId| state.items.iter().enumerate().find(|(_, i)| &i.id == id);

    match action {
        CartAction::AddItem(candidate) => {
            let mut items = state.items.clone();
            match find(&candidate.id) {
                Some((_, item)) if item.quantity >= item.stock_quantity => {
                    return CartTransition::unchanged(state);
                }
                Some((idx, _)) => {
                    if let Some(line) = items.get_mut(idx) {
                        line.quantity += 1;
                    }
                }
                None => items.push(CartLineItem {
                    id: candidate.id,
                    name: candidate.name,
                    price: candidate.price,
                    quantity: 1,
                    image_url: candidate.image_url,
                    stock_quantity: candidate.stock_quantity,
                }),
            }
            CartTransition::written(state, items)
        }

        CartAction::RemoveItem(id) => {
            let Some((idx, _)) = find(&id) else {
                return CartTransition::unchanged(state);
            };
            let mut items = state.items.clone();
            items.remove(idx);
            CartTransition::written(state, items)
        }

        CartAction::SetQuantity { id, quantity } => {
            let Some((idx, item)) = find(&id) else {
                return CartTransition::unchanged(state);
            };
            let effective = quantity.clamp(0, i64::from(item.stock_quantity));
            let mut items = state.items.clone();
            match u32::try_from(effective) {
                Ok(q) if q == item.quantity => return CartTransition::unchanged(state),
                Ok(q) if q > 0 => {
                    if let Some(line) = items.get_mut(idx) {
                        line.quantity = q;
                    }
                }
                _ => {
                    items.remove(idx);
                }
            }
            CartTransition::written(state, items)
        }

        CartAction::IncrementQuantity(id) => {
            let Some((idx, item)) = find(&id) else {
                return CartTransition::unchanged(state);
            };
            if item.quantity >= item.stock_quantity {
                return CartTransition::unchanged(state);
            }
            let mut items = state.items.clone();
            if let Some(line) = items.get_mut(idx) {
                line.quantity += 1;
            }
            CartTransition::written(state, items)
        }

        CartAction::DecrementQuantity(id) => {
            let Some((idx, item)) = find(&id) else {
                return CartTransition::unchanged(state);
            };
            let mut items = state.items.clone();
            if item.quantity <= 1 {
                items.remove(idx);
            } else if let Some(line) = items.get_mut(idx) {
                line.quantity -= 1;
            }
            CartTransition::written(state, items)
        }

        CartAction::Clear => CartTransition {
            state: CartState::empty(),
            effect: PersistEffect::Remove,
        },
    }
}
