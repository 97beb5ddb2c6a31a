//! Session-related types.
//!
//! A session pairs the signed-in user with the bearer token the backend
//! issued. The two are only ever held together.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

use super::user::User;

/// An authenticated session.
#[derive(Clone)]
pub struct Session {
    pub user: User,
    pub token: SecretString,
}

impl Session {
    #[must_use]
    pub const fn new(user: User, token: SecretString) -> Self {
        Self { user, token }
    }

    /// Raw token for an `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> &str {
        self.token.expose_secret()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Observable session lifecycle.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// No one is signed in.
    #[default]
    Anonymous,
    /// A sign-in is in flight. Readers keep seeing the session that was
    /// current when the attempt began.
    Authenticating { current: Option<Session> },
    /// Signed in.
    Authenticated(Session),
}

impl SessionState {
    /// The session visible to readers, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Anonymous => None,
            Self::Authenticating { current } => current.as_ref(),
            Self::Authenticated(session) => Some(session),
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session().map(|s| &s.user)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    #[must_use]
    pub const fn is_authenticating(&self) -> bool {
        matches!(self, Self::Authenticating { .. })
    }
}

/// Durable storage keys for session data.
pub mod keys {
    /// Key for the raw bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the JSON user record.
    pub const USER: &str = "user";
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tastebud_core::{UserId, UserRole};

    use super::*;

    fn session() -> Session {
        Session::new(
            User {
                id: UserId::from("7"),
                email: "ann@example.com".to_string(),
                full_name: "Ann".to_string(),
                role: UserRole::Customer,
                created_at: Utc::now(),
            },
            SecretString::from("secret-token"),
        )
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let output = format!("{:?}", session());
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("secret-token"));
    }

    #[test]
    fn test_authenticating_exposes_prior_session() {
        let state = SessionState::Authenticating {
            current: Some(session()),
        };
        assert!(state.is_authenticated());
        assert!(state.is_authenticating());
        assert_eq!(state.user().map(|u| u.id.as_str()), Some("7"));

        let state = SessionState::Authenticating { current: None };
        assert!(!state.is_authenticated());
        assert!(state.user().is_none());
    }

    #[test]
    fn test_default_is_anonymous() {
        let state = SessionState::default();
        assert!(state.session().is_none());
        assert!(!state.is_authenticating());
    }
}
