//! Errors surfaced to storefront consumers, and the Sentry scope they are
//! reported under.
//!
//! The session manager reports its own failures through [`report_error`]
//! before returning them; everything else is reported once by the consumer
//! at its boundary (see [`AppError::is_reported`]). The session manager
//! also keeps the Sentry user in step with sign-in and sign-out, and the
//! cart store records each action as a breadcrumb.

use thiserror::Error;

use crate::config::ConfigError;
use crate::gateway::GatewayError;
use crate::services::session::SessionError;

/// Application-level error type for storefront consumers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend call failed.
    #[error("{0}")]
    Gateway(#[from] GatewayError),

    /// Session operation failed.
    #[error("{0}")]
    Session(#[from] SessionError),

    /// The caller must sign in first.
    #[error("Not signed in")]
    Unauthorized,

    /// Bad input from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the backend rejected the session token.
    #[must_use]
    pub const fn is_token_expired(&self) -> bool {
        matches!(
            self,
            Self::Gateway(GatewayError::TokenExpired)
                | Self::Session(SessionError::Gateway(GatewayError::TokenExpired))
        )
    }

    /// Whether the failure was already reported where it happened.
    ///
    /// Session errors are; consumers should not report them again.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::Session(_))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Capture `err` to Sentry and log it with the event id.
///
/// `context` names the failed operation, e.g. `"sign_in"`.
pub fn report_error<E>(context: &str, err: &E)
where
    E: std::error::Error + ?Sized,
{
    let event_id = sentry::capture_error(err);
    tracing::error!(
        error = %err,
        operation = context,
        sentry_event_id = %event_id,
        "Operation failed"
    );
}

/// Tag later Sentry events with the signed-in customer or owner.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Drop the user tag after sign-out.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Record a step, e.g. a cart action, on the trail attached to the next
/// Sentry event.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
