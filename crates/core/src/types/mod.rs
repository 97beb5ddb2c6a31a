//! Core types for Tastebud.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;

pub use id::{MenuItemId, OrderId, OrderItemId, RestaurantId, UserId};
pub use price::{Price, PriceError};
pub use status::{OrderStatus, UnknownVariant, UserRole};
