//! Wire types for the Tastebud REST API.
//!
//! Field names follow the backend's JSON (a mix of `snake_case` and a few
//! `camelCase` restaurant fields). Anything the backend may omit carries a
//! serde default so a sparse record still deserializes.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tastebud_core::{
    MenuItemId, NewCartItem, OrderId, OrderItemId, OrderStatus, Price, RestaurantId, UserId,
};

// =============================================================================
// Auth Types
// =============================================================================

/// Body of `POST /auth/signin`.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful sign-in payload.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for authorized calls.
    pub token: String,
    /// Numeric or string user ID (normalized to a string).
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    /// Raw role string as returned by the backend.
    #[serde(default)]
    pub role: String,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .finish()
    }
}

/// Body of `POST /auth/signup`.
#[derive(Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    /// Always lower-case on the wire.
    pub role: String,
}

/// Acknowledgement returned by `POST /auth/signup`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Restaurant Types
// =============================================================================

/// A restaurant listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    /// Average rating (0.0-5.0).
    #[serde(default)]
    pub rating: f64,
    /// Estimated delivery window, e.g. "25-35 min".
    #[serde(default, rename = "deliveryTime")]
    pub delivery_time: String,
    #[serde(default, rename = "deliveryFee")]
    pub delivery_fee: Price,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Restaurant {
    /// Whether this restaurant delivers for free.
    #[must_use]
    pub fn has_free_delivery(&self) -> bool {
        self.delivery_fee == Price::ZERO
    }
}

// =============================================================================
// Menu Types
// =============================================================================

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl MenuItem {
    /// Build the cart payload for adding this dish.
    ///
    /// The restaurant is taken from the listing the menu was loaded from,
    /// since menu records may omit their own `restaurant_id`.
    #[must_use]
    pub fn to_cart_item(&self, restaurant: &Restaurant) -> NewCartItem {
        NewCartItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            restaurant_id: self
                .restaurant_id
                .clone()
                .unwrap_or_else(|| restaurant.id.clone()),
            restaurant_name: restaurant.name.clone(),
            image: self.image.clone(),
        }
    }
}

/// Body of `POST /menu-items` and `PUT /menu-items/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MenuItemInput {
    pub name: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<RestaurantId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

// =============================================================================
// Order Types
// =============================================================================

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub customer_id: Option<UserId>,
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub delivery_address: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<OrderItemId>,
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub price: Price,
    #[serde(default)]
    pub name: String,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub restaurant_id: RestaurantId,
    pub items: Vec<NewOrderItem>,
    pub total: Price,
    pub delivery_address: String,
}

/// A line of [`NewOrder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderItem {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub price: Price,
    pub name: String,
}

/// Body of `PUT /orders/{id}/status`.
#[derive(Serialize)]
pub(crate) struct StatusUpdate {
    pub status: OrderStatus,
}

const fn default_true() -> bool {
    true
}
