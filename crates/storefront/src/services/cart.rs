//! Cart store.
//!
//! Holds the current [`CartState`] behind a `watch` channel. Each
//! [`dispatch`](CartStore::dispatch) runs the pure reducer and publishes
//! the result in one step, so subscribers never observe a partial update.
//! The cart lives in memory only.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use tastebud_core::{CartAction, CartState, CartSummary, reduce};

use crate::error::add_breadcrumb;

/// Shared cart store. Clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
    state: Arc<watch::Sender<CartState>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create a store holding an empty cart.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(CartState::default());
        Self {
            state: Arc::new(state),
        }
    }

    /// Apply an action.
    ///
    /// Subscribers are notified only when the cart actually changes.
    pub fn dispatch(&self, action: CartAction) {
        let name = action.name();
        let item_id = action.item_id().to_string();

        let changed = self.state.send_if_modified(|state| {
            let next = reduce(state, action);
            if next == *state {
                false
            } else {
                *state = next;
                true
            }
        });

        debug!(action = name, item_id = %item_id, changed, "Cart action");
        add_breadcrumb("cart", name, Some(&[("item_id", item_id.as_str())]));
    }

    /// Snapshot of the current cart.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Checkout figures for the current cart.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(&*self.state.borrow())
    }

    /// Subscribe to cart changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.state.send_if_modified(|state| {
            if state.is_empty() {
                false
            } else {
                *state = CartState::default();
                true
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tastebud_core::{MenuItemId, NewCartItem, Price, RestaurantId};

    use super::*;

    fn pizza() -> NewCartItem {
        NewCartItem {
            id: MenuItemId::from("1"),
            name: "Margherita".to_string(),
            price: Price::from_cents(1899),
            restaurant_id: RestaurantId::from("r1"),
            restaurant_name: "Bella Italia".to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn test_dispatch_updates_state_and_summary() {
        let store = CartStore::new();
        store.dispatch(CartAction::AddItem(pizza()));
        store.dispatch(CartAction::AddItem(pizza()));

        let state = store.state();
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.total(), Price::from_cents(3798));

        let summary = store.summary();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.delivery_fee, Price::ZERO);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let store = CartStore::new();
        let mut rx = store.subscribe();

        store.dispatch(CartAction::AddItem(pizza()));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().item_count(), 1);
    }

    #[test]
    fn test_noop_action_does_not_notify() {
        let store = CartStore::new();
        let rx = store.subscribe();

        store.dispatch(CartAction::RemoveItem {
            id: MenuItemId::from("missing"),
        });
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_clear_empties_cart() {
        let store = CartStore::new();
        store.dispatch(CartAction::AddItem(pizza()));
        store.clear();
        assert!(store.state().is_empty());
        assert_eq!(store.state().total(), Price::ZERO);
    }

    #[test]
    fn test_clones_share_state() {
        let store = CartStore::new();
        let other = store.clone();
        other.dispatch(CartAction::AddItem(pizza()));
        assert_eq!(store.state().item_count(), 1);
    }
}
