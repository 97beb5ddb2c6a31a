//! Cart state machine.
//!
//! The cart is a pure reducer: [`reduce`] takes the current [`CartState`]
//! and a [`CartAction`] and returns the next state. There is no I/O here
//! and no way to fail; unknown IDs are no-ops.
//!
//! Two invariants hold for every state the reducer can produce:
//!
//! - every item has `quantity >= 1` (a line reduced to zero is removed)
//! - `total` equals the sum of `price * quantity` over `items`
//!
//! Pricing figures shown at checkout (delivery fee, tax, grand total) are
//! derived on demand through [`CartSummary`] and never stored.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MenuItemId, Price, RestaurantId};

/// Subtotal above which delivery is free.
pub const FREE_DELIVERY_THRESHOLD: Price = Price::from_cents(3000);

/// Delivery fee charged at or below [`FREE_DELIVERY_THRESHOLD`].
pub const DELIVERY_FEE: Price = Price::from_cents(299);

/// Sales tax rate applied to the subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Price,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub image: String,
    pub quantity: u32,
}

impl CartItem {
    /// Price of this line (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Payload for [`CartAction::AddItem`]: a menu item without a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Price,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub image: String,
}

impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            restaurant_id: item.restaurant_id,
            restaurant_name: item.restaurant_name,
            image: item.image,
            quantity: 1,
        }
    }
}

/// A discrete request to change the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartAction {
    /// Add one unit; increments the quantity if the item is already present.
    AddItem(NewCartItem),
    /// Set an absolute quantity; zero or below removes the item.
    UpdateQuantity { id: MenuItemId, quantity: i64 },
    /// Remove the item entirely.
    RemoveItem { id: MenuItemId },
}

impl CartAction {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddItem(_) => "ADD_ITEM",
            Self::UpdateQuantity { .. } => "UPDATE_QUANTITY",
            Self::RemoveItem { .. } => "REMOVE_ITEM",
        }
    }

    /// The menu item this action targets.
    #[must_use]
    pub const fn item_id(&self) -> &MenuItemId {
        match self {
            Self::AddItem(item) => &item.id,
            Self::UpdateQuantity { id, .. } | Self::RemoveItem { id } => id,
        }
    }
}

/// The in-progress order.
///
/// Construct with [`CartState::default`] and evolve with [`reduce`]; the
/// total cannot be set independently of the items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CartState {
    items: Vec<CartItem>,
    total: Price,
}

impl CartState {
    fn from_items(items: Vec<CartItem>) -> Self {
        let total = items.iter().map(CartItem::line_total).sum();
        Self { items, total }
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of `price * quantity` over all items.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by ID.
    #[must_use]
    pub fn get(&self, id: &MenuItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Total number of units across all items (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Distinct restaurants represented in the cart.
    ///
    /// Items from several restaurants may share one cart.
    #[must_use]
    pub fn restaurant_ids(&self) -> BTreeSet<&RestaurantId> {
        self.items.iter().map(|item| &item.restaurant_id).collect()
    }
}

/// Apply `action` to `state`, producing the next state.
#[must_use]
pub fn reduce(state: &CartState, action: CartAction) -> CartState {
    let mut items = state.items.clone();

    match action {
        CartAction::AddItem(new_item) => {
            if let Some(existing) = items.iter_mut().find(|item| item.id == new_item.id) {
                existing.quantity = existing.quantity.saturating_add(1);
            } else {
                items.push(new_item.into());
            }
        }
        CartAction::UpdateQuantity { id, quantity } => {
            if quantity <= 0 {
                items.retain(|item| item.id != id);
            } else if let Some(existing) = items.iter_mut().find(|item| item.id == id) {
                existing.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            }
        }
        CartAction::RemoveItem { id } => {
            items.retain(|item| item.id != id);
        }
    }

    CartState::from_items(items)
}

/// Checkout figures derived from a cart.
///
/// Recompute from the current [`CartState`] whenever it changes; nothing
/// here is cached or persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub item_count: u32,
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub tax: Price,
    pub grand_total: Price,
}

impl CartSummary {
    /// How much more must be added before delivery becomes free.
    ///
    /// `None` once delivery is already free.
    #[must_use]
    pub fn free_delivery_remaining(&self) -> Option<Price> {
        (self.delivery_fee > Price::ZERO)
            .then(|| FREE_DELIVERY_THRESHOLD.saturating_sub(self.subtotal))
    }
}

impl From<&CartState> for CartSummary {
    fn from(state: &CartState) -> Self {
        let subtotal = state.total();
        let delivery_fee = if subtotal > FREE_DELIVERY_THRESHOLD {
            Price::ZERO
        } else {
            DELIVERY_FEE
        };
        // Subtotal is non-negative and the rate is positive, so this is too.
        let tax = subtotal
            .amount()
            .checked_mul(TAX_RATE)
            .and_then(|amount| Price::new(amount).ok())
            .map_or(Price::MAX, Price::round_to_cents);

        Self {
            item_count: state.item_count(),
            subtotal,
            delivery_fee,
            tax,
            grand_total: subtotal + delivery_fee + tax,
        }
    }
}
