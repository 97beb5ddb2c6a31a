//! Restaurant and menu browsing.

use tastebud_core::RestaurantId;
use tastebud_storefront::error::Result;
use tastebud_storefront::state::AppState;

use crate::output;

pub async fn list(state: &AppState) -> Result<()> {
    let restaurants = state.api().list_restaurants().await?;
    output::restaurants(&restaurants);
    Ok(())
}

pub async fn get(state: &AppState, id: &RestaurantId) -> Result<()> {
    let restaurant = state.api().get_restaurant(id).await?;
    output::restaurant_detail(&restaurant);
    Ok(())
}

pub async fn search(state: &AppState, term: &str) -> Result<()> {
    let restaurants = state.api().search_restaurants(term).await?;
    tracing::info!(term, results = restaurants.len(), "Search complete");
    output::restaurants(&restaurants);
    Ok(())
}

pub async fn cuisine(state: &AppState, name: &str) -> Result<()> {
    let restaurants = state.api().list_restaurants_by_cuisine(name).await?;
    output::restaurants(&restaurants);
    Ok(())
}

/// Show a restaurant header followed by its menu.
pub async fn menu(state: &AppState, id: &RestaurantId) -> Result<()> {
    let restaurant = state.api().get_restaurant(id).await?;
    let items = state.api().list_menu_items(id).await?;
    output::restaurant_detail(&restaurant);
    output::menu(&items);
    Ok(())
}
