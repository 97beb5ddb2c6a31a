//! Command implementations.

pub mod auth;
pub mod cart;
pub mod menu_items;
pub mod orders;
pub mod restaurants;

use std::future::Future;

use secrecy::SecretString;

use tastebud_storefront::error::{AppError, Result};
use tastebud_storefront::gateway::GatewayError;
use tastebud_storefront::state::AppState;

/// Run an authorized gateway call with the stored session token.
///
/// A rejected token signs the user out before the error is returned.
pub async fn authorized<T, F, Fut>(state: &AppState, call: F) -> Result<T>
where
    F: FnOnce(SecretString) -> Fut,
    Fut: Future<Output = std::result::Result<T, GatewayError>>,
{
    let token = state.session().token().ok_or(AppError::Unauthorized)?;

    match call(token).await {
        Ok(value) => Ok(value),
        Err(err) => {
            if state.session().expire_on_token_error(&err).await {
                tracing::warn!("Stored session was rejected; sign in again");
            }
            Err(err.into())
        }
    }
}
