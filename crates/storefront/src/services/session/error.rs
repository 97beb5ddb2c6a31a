//! Session error types.

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::storage::StorageError;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend rejected or failed the request.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Durable storage could not be written.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),

    /// The user record could not be encoded for storage.
    #[error("session encoding error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Stored session data is malformed or half-present.
    #[error("stored session is invalid: {0}")]
    LocalState(String),
}

impl SessionError {
    /// Whether the backend rejected the session token.
    #[must_use]
    pub const fn is_token_expired(&self) -> bool {
        matches!(self, Self::Gateway(GatewayError::TokenExpired))
    }
}
