//! The signed-in user's profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tastebud_core::{UserId, UserRole};

use crate::gateway::LoginResponse;

/// A signed-in user.
///
/// Built locally from a sign-in response; the backend does not return a
/// creation timestamp, so `created_at` records when the session began.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Normalize a sign-in response into a user record.
    ///
    /// An unrecognized role falls back to [`UserRole::Customer`].
    #[must_use]
    pub fn from_login(response: &LoginResponse, now: DateTime<Utc>) -> Self {
        let role = response.role.parse().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Unrecognized role in sign-in response, using customer");
            UserRole::Customer
        });

        Self {
            id: response.id.clone(),
            email: response.email.clone(),
            full_name: response.full_name.clone(),
            role,
            created_at: now,
        }
    }

    /// Whether this user manages a restaurant.
    #[must_use]
    pub const fn is_restaurant_owner(&self) -> bool {
        matches!(self.role, UserRole::RestaurantOwner)
    }
}
