//! Application state shared across consumers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::gateway::ApiClient;
use crate::models::session::SessionState;
use crate::services::{CartStore, CheckoutGate, SessionManager};
use crate::storage::FileStore;

/// Application state shared across all consumers.
///
/// This struct is cheaply cloneable via `Arc` and owns the gateway, the
/// session manager and the cart store. Session and cart are independent;
/// nothing here couples them beyond the read-only [`checkout`](Self::checkout)
/// gate.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    session: SessionManager<FileStore>,
    cart: CartStore,
}

impl AppState {
    /// Build the state and rehydrate any stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub async fn bootstrap(config: StorefrontConfig) -> Result<Self> {
        let api = ApiClient::new(&config.api)?;
        let storage = FileStore::new(&config.storage_path);
        let session = SessionManager::new(api.clone(), storage);

        let restored = session.restore().await;
        tracing::debug!(
            authenticated = restored.is_authenticated(),
            storage = %config.storage_path.display(),
            "Session restored"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                session,
                cart: CartStore::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend gateway.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the session manager.
    #[must_use]
    pub fn session(&self) -> &SessionManager<FileStore> {
        &self.inner.session
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Whether the current cart and session allow checkout.
    #[must_use]
    pub fn checkout(&self) -> CheckoutGate {
        let session: SessionState = self.inner.session.state();
        CheckoutGate::evaluate(&self.inner.cart.state(), &session)
    }
}
