//! Backend gateway: typed client for the Tastebud REST API.
//!
//! # Architecture
//!
//! - One `reqwest::Client` shared behind an `Arc`; the gateway is cheap to clone
//! - Pure request/response: no retries, no caching, no local state
//! - Authorized endpoints take the bearer token per call; the gateway never
//!   stores credentials
//!
//! # Endpoints
//!
//! ## Public
//! - `POST /auth/signin`, `POST /auth/signup`
//! - `GET /restaurants`, `/restaurants/{id}`, `/restaurants/search?q=`,
//!   `/restaurants/cuisine/{cuisine}`, `/restaurants/{id}/menu`
//!
//! ## Authorized (`Authorization: Bearer <token>`)
//! - `POST /orders`, `GET /orders/user`, `GET /orders/restaurant`,
//!   `PUT /orders/{id}/status`
//! - `POST /menu-items`, `PUT /menu-items/{id}`, `DELETE /menu-items/{id}`
//!
//! # Example
//!
//! ```rust,ignore
//! use tastebud_storefront::gateway::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let restaurants = client.search_restaurants("thai & noodles").await?;
//! let menu = client.list_menu_items(&restaurants[0].id).await?;
//! ```

mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Sign-in or sign-up was rejected. Carries the server's message when
    /// it sent one.
    #[error("{0}")]
    Auth(String),

    /// A non-auth endpoint returned a non-success status.
    #[error("{0}")]
    Fetch(String),

    /// An authorized call was answered with `401 Unauthorized`.
    #[error("session token expired or was rejected")]
    TokenExpired,

    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GatewayError {
    /// Whether this error means the bearer token is no longer accepted.
    #[must_use]
    pub const fn is_token_expired(&self) -> bool {
        matches!(self, Self::TokenExpired)
    }

    /// Whether this error came from an authentication endpoint.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
