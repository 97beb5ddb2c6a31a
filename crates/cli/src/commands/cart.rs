//! Cart quoting.
//!
//! Builds a cart from one restaurant's menu and prints what checkout would
//! charge. No order is placed.

use tastebud_core::{CartAction, MenuItemId, RestaurantId};
use tastebud_storefront::error::{AppError, Result};
use tastebud_storefront::state::AppState;

use crate::output;

pub async fn quote(state: &AppState, restaurant_id: &RestaurantId, ids: &[MenuItemId]) -> Result<()> {
    let restaurant = state.api().get_restaurant(restaurant_id).await?;
    let menu = state.api().list_menu_items(restaurant_id).await?;

    for id in ids {
        let item = menu
            .iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| {
                AppError::BadRequest(format!("{} has no menu item {id}", restaurant.name))
            })?;

        if !item.is_available {
            tracing::warn!(menu_item_id = %id, "Menu item is currently unavailable");
        }
        state
            .cart()
            .dispatch(CartAction::AddItem(item.to_cart_item(&restaurant)));
    }

    output::cart(&state.cart().state(), &state.checkout());
    Ok(())
}
