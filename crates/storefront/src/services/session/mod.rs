//! Session manager.
//!
//! Owns the sign-in lifecycle and custody of the bearer token:
//!
//! ```text
//! Anonymous --sign_in--> Authenticating --ok--> Authenticated
//!     ^                       |                      |
//!     +-------- error --------+                      |
//!     +------------------- sign_out -----------------+
//! ```
//!
//! The token and user record are persisted together under
//! [`keys::TOKEN`] and [`keys::USER`]; storage never holds one without the
//! other. Every transition that touches storage publishes the new state
//! while still holding the storage lock, so the published session and the
//! stored one always agree. On startup, [`SessionManager::restore`]
//! rehydrates from storage without contacting the backend.

mod error;

pub use error::SessionError;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{Mutex, watch};
use tracing::{info, instrument, warn};

use tastebud_core::UserRole;

use crate::error::{clear_sentry_user, report_error, set_sentry_user};
use crate::gateway::{ApiClient, GatewayError, RegisterResponse};
use crate::models::session::{Session, SessionState, keys};
use crate::models::user::User;
use crate::storage::KeyValueStore;

/// Session manager.
///
/// Cheap to clone; clones share state, storage and subscribers.
pub struct SessionManager<S> {
    inner: Arc<SessionManagerInner<S>>,
}

struct SessionManagerInner<S> {
    api: ApiClient,
    storage: Mutex<S>,
    state: watch::Sender<SessionState>,
    ready: AtomicBool,
}

impl<S> Clone for SessionManager<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Create a manager in the `Anonymous` state.
    ///
    /// Call [`restore`](Self::restore) before relying on the state.
    #[must_use]
    pub fn new(api: ApiClient, storage: S) -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        Self {
            inner: Arc::new(SessionManagerInner {
                api,
                storage: Mutex::new(storage),
                state,
                ready: AtomicBool::new(false),
            }),
        }
    }

    // =========================================================================
    // Read Accessors
    // =========================================================================

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Current session, if signed in.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.inner.state.borrow().session().cloned()
    }

    /// Current bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.inner.state.borrow().session().map(|s| s.token.clone())
    }

    /// Current user, if signed in.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Whether [`restore`](Self::restore) has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::Acquire)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Rehydrate the session from durable storage.
    ///
    /// Both keys present and a well-formed user record yields
    /// `Authenticated`. Anything else yields `Anonymous`; malformed or
    /// half-present data is logged and both keys are cleared.
    pub async fn restore(&self) -> SessionState {
        let mut storage = self.inner.storage.lock().await;

        let state = match load_session(&*storage) {
            Ok(Some(session)) => {
                info!(user_id = %session.user.id, "Restored stored session");
                set_sentry_user(&session.user.id, Some(&session.user.email));
                SessionState::Authenticated(session)
            }
            Ok(None) => SessionState::Anonymous,
            Err(err) => {
                warn!(error = %err, "Discarding stored session");
                clear_keys(&mut *storage);
                SessionState::Anonymous
            }
        };
        self.inner.state.send_replace(state.clone());
        self.inner.ready.store(true, Ordering::Release);
        drop(storage);
        state
    }

    /// Sign in with email and password.
    ///
    /// The session is persisted before it becomes visible. If the backend
    /// rejects the attempt, the previous session stays in place. If the
    /// session cannot be persisted, storage is cleared and the manager
    /// becomes `Anonymous`. Failures are reported before they are returned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Gateway` if the backend rejects the
    /// credentials or cannot be reached, or `SessionError::Storage` if the
    /// session cannot be persisted.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<User, SessionError> {
        self.begin_authenticating();

        let session = match self.inner.api.login(email, password).await {
            Ok(response) => {
                let user = User::from_login(&response, Utc::now());
                Session::new(user, SecretString::from(response.token))
            }
            Err(err) => {
                self.abort_authenticating().await;
                let err = SessionError::from(err);
                report_error("sign_in", &err);
                return Err(err);
            }
        };

        let mut storage = self.inner.storage.lock().await;
        if let Err(err) = persist(&mut *storage, &session) {
            // Storage now holds neither key.
            self.inner.state.send_replace(SessionState::Anonymous);
            drop(storage);
            clear_sentry_user();
            report_error("sign_in", &err);
            return Err(err);
        }

        let user = session.user.clone();
        set_sentry_user(&user.id, Some(&user.email));
        self.inner
            .state
            .send_replace(SessionState::Authenticated(session));
        drop(storage);

        info!(user_id = %user.id, role = %user.role, "Signed in");
        Ok(user)
    }

    /// Register a new account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Gateway` if the backend rejects the
    /// registration or cannot be reached.
    #[instrument(skip(self, password, full_name), fields(email = %email, role = %role))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        full_name: &str,
        role: UserRole,
    ) -> Result<RegisterResponse, SessionError> {
        match self
            .inner
            .api
            .register(full_name, email, password, role.as_str())
            .await
        {
            Ok(response) => {
                info!("Registered account");
                Ok(response)
            }
            Err(err) => {
                let err = SessionError::from(err);
                report_error("sign_up", &err);
                Err(err)
            }
        }
    }

    /// Sign out. Never fails; storage errors are logged.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) {
        let mut storage = self.inner.storage.lock().await;
        clear_keys(&mut *storage);
        self.inner.state.send_replace(SessionState::Anonymous);
        drop(storage);

        clear_sentry_user();
        info!("Signed out");
    }

    /// Force sign-out if `err` means the token was rejected.
    ///
    /// Returns `true` when a sign-out happened.
    pub async fn expire_on_token_error(&self, err: &GatewayError) -> bool {
        if !err.is_token_expired() {
            return false;
        }
        warn!("Session token rejected by backend, signing out");
        self.sign_out().await;
        true
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Enter `Authenticating`, keeping the current session visible.
    fn begin_authenticating(&self) {
        self.inner.state.send_modify(|state| {
            let current = state.session().cloned();
            *state = SessionState::Authenticating { current };
        });
    }

    /// Settle a failed attempt back to the session it started from, unless
    /// another transition already replaced the `Authenticating` state.
    ///
    /// Storage only changes together with a settled state, so while
    /// `Authenticating` it still holds exactly `current`.
    async fn abort_authenticating(&self) {
        let _storage = self.inner.storage.lock().await;
        self.inner.state.send_if_modified(|state| {
            if !state.is_authenticating() {
                return false;
            }
            *state = state
                .session()
                .cloned()
                .map_or(SessionState::Anonymous, SessionState::Authenticated);
            true
        });
    }
}

// =============================================================================
// Persistence
// =============================================================================

/// Clears both session keys on drop unless committed.
struct PersistGuard<'a, S: KeyValueStore> {
    storage: &'a mut S,
    committed: bool,
}

impl<'a, S: KeyValueStore> PersistGuard<'a, S> {
    const fn new(storage: &'a mut S) -> Self {
        Self {
            storage,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl<S: KeyValueStore> Drop for PersistGuard<'_, S> {
    fn drop(&mut self) {
        if !self.committed {
            clear_keys(self.storage);
        }
    }
}

/// Write the token and user record together.
fn persist<S: KeyValueStore>(storage: &mut S, session: &Session) -> Result<(), SessionError> {
    let user_json = serde_json::to_string(&session.user)?;

    let mut guard = PersistGuard::new(storage);
    guard.storage.set(keys::TOKEN, session.token.expose_secret())?;
    guard.storage.set(keys::USER, &user_json)?;
    guard.commit();
    Ok(())
}

/// Read a stored session.
fn load_session<S: KeyValueStore>(storage: &S) -> Result<Option<Session>, SessionError> {
    let token = storage.get(keys::TOKEN)?;
    let user = storage.get(keys::USER)?;

    match (token, user) {
        (None, None) => Ok(None),
        (Some(token), Some(user)) => {
            if token.is_empty() {
                return Err(SessionError::LocalState("stored token is empty".to_string()));
            }
            let user: User = serde_json::from_str(&user).map_err(|e| {
                SessionError::LocalState(format!("stored user record is malformed: {e}"))
            })?;
            Ok(Some(Session::new(user, SecretString::from(token))))
        }
        (Some(_), None) => Err(SessionError::LocalState(
            "token stored without a user record".to_string(),
        )),
        (None, Some(_)) => Err(SessionError::LocalState(
            "user record stored without a token".to_string(),
        )),
    }
}

/// Remove both session keys, logging failures.
fn clear_keys<S: KeyValueStore>(storage: &mut S) {
    for key in [keys::TOKEN, keys::USER] {
        if let Err(e) = storage.remove(key) {
            warn!(key, error = %e, "Failed to clear stored session key");
        }
    }
}
