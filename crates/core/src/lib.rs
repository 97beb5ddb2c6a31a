//! Tastebud Core - Shared types library.
//!
//! This crate provides the types shared by every Tastebud component:
//! - `storefront` - Backend gateway, session manager and cart store
//! - `cli` - Terminal client built on the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage, no HTTP clients. The cart reducer lives here because it is a
//! pure `(state, action) -> state` function.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, roles and statuses
//! - [`cart`] - Cart state, actions, reducer and derived checkout summary

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{CartAction, CartItem, CartState, CartSummary, NewCartItem, reduce};
pub use types::*;
