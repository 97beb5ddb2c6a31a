//! Menu management for restaurant owners.
//!
//! # Usage
//!
//! ```bash
//! tastebud menu-items create --name "Pad Thai" --price 12.99 --category Mains --restaurant 2
//! tastebud menu-items update 17 --name "Pad Thai" --price 13.49 --unavailable
//! tastebud menu-items delete 17
//! ```

use clap::Args;

use tastebud_core::{MenuItemId, Price, RestaurantId};
use tastebud_storefront::error::Result;
use tastebud_storefront::gateway::MenuItemInput;
use tastebud_storefront::state::AppState;

use super::authorized;
use crate::output;

/// Dish details shared by `create` and `update`.
#[derive(Debug, Args)]
pub struct MenuItemArgs {
    #[arg(long)]
    name: String,

    /// Price in dollars, e.g. 12.99
    #[arg(long, value_parser = crate::parse_price)]
    price: Price,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    category: Option<String>,

    /// Image URL
    #[arg(long)]
    image: Option<String>,

    /// Restaurant the dish belongs to
    #[arg(long)]
    restaurant: Option<RestaurantId>,

    /// Hide the dish from customers
    #[arg(long)]
    unavailable: bool,
}

impl From<MenuItemArgs> for MenuItemInput {
    fn from(args: MenuItemArgs) -> Self {
        Self {
            name: args.name,
            price: args.price,
            description: args.description,
            image: args.image,
            category: args.category,
            restaurant_id: args.restaurant,
            is_available: args.unavailable.then_some(false),
        }
    }
}

pub async fn create(state: &AppState, args: MenuItemArgs) -> Result<()> {
    let input = MenuItemInput::from(args);
    let item = authorized(state, |token| async move {
        state.api().create_menu_item(&input, &token).await
    })
    .await?;
    output::line(format!("Created menu item {} ({})", item.id, item.name));
    Ok(())
}

pub async fn update(state: &AppState, id: &MenuItemId, args: MenuItemArgs) -> Result<()> {
    let input = MenuItemInput::from(args);
    let item = authorized(state, |token| async move {
        state.api().update_menu_item(id, &input, &token).await
    })
    .await?;
    output::line(format!("Updated menu item {} ({})", item.id, item.name));
    Ok(())
}

pub async fn delete(state: &AppState, id: &MenuItemId) -> Result<()> {
    authorized(state, |token| async move {
        state.api().delete_menu_item(id, &token).await
    })
    .await?;
    output::line(format!("Deleted menu item {id}"));
    Ok(())
}
