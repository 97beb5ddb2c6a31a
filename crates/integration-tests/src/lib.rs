//! Integration tests for the Tastebud storefront client.
//!
//! Each test starts a `wiremock` server standing in for the REST backend
//! and drives the real gateway and session manager against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tastebud-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `gateway` - Request shapes and error mapping per endpoint
//! - `session` - Sign-in, sign-out and rehydration through durable storage

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::ExposeSecret;
use tastebud_storefront::config::ApiConfig;
use tastebud_storefront::gateway::ApiClient;
use tastebud_storefront::models::session::keys;
use tastebud_storefront::services::SessionManager;
use tastebud_storefront::storage::{FileStore, KeyValueStore, StorageError};
use tempfile::TempDir;
use wiremock::MockServer;

/// Build a gateway pointed at `server` under the `/api` base path.
///
/// # Panics
///
/// Panics if the mock server URI is not a usable base URL.
#[must_use]
pub fn client_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig::new(&format!("{}/api", server.uri()))
        .expect("mock server URI is a valid base URL");
    ApiClient::new(&config).expect("Failed to create HTTP client")
}

/// Stored user record as the session manager writes it.
#[must_use]
pub fn stored_user_json(id: &str) -> String {
    serde_json::json!({
        "id": id,
        "email": "ann@example.com",
        "full_name": "Ann Lee",
        "role": "customer",
        "created_at": "2026-01-01T00:00:00Z",
    })
    .to_string()
}

/// A scratch directory holding a session storage file.
///
/// The directory is removed when the returned [`TempDir`] is dropped.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
pub fn temp_storage() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("storage.json");
    (dir, path)
}

/// Write a complete stored session to the file at `path`.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn seed_session(path: &Path, token: &str, user_id: &str) {
    let mut store = FileStore::new(path);
    store.set(keys::TOKEN, token).expect("Failed to seed token");
    store
        .set(keys::USER, &stored_user_json(user_id))
        .expect("Failed to seed user");
}

/// Assert that the stored keys and the published session agree.
///
/// Storage holds both keys or neither, and holds them exactly when the
/// manager exposes a token, which must be the stored one.
///
/// # Panics
///
/// Panics if the storage file cannot be read or the pair disagrees.
pub fn assert_session_matches_storage<S: KeyValueStore>(
    manager: &SessionManager<S>,
    storage_path: &Path,
) {
    let storage = FileStore::new(storage_path);
    let token = storage.get(keys::TOKEN).expect("Failed to read token");
    let user = storage.get(keys::USER).expect("Failed to read user");

    assert_eq!(token.is_some(), user.is_some(), "token and user must be stored together");
    assert_eq!(
        manager.token().map(|t| t.expose_secret().to_string()),
        token,
        "published token must match the stored token"
    );
    assert_eq!(
        manager.current_user().map(|u| u.id.to_string()),
        user.and_then(|raw| {
            serde_json::from_str::<serde_json::Value>(&raw)
                .ok()
                .and_then(|v| v.get("id").and_then(serde_json::Value::as_str).map(String::from))
        }),
        "published user must match the stored user"
    );
}

/// File storage whose writes to the user key can be made to fail.
pub struct FlakyStore {
    inner: FileStore,
    fail_user_writes: Arc<AtomicBool>,
}

impl FlakyStore {
    /// Wrap the file at `path`. Returns the store and its failure switch.
    #[must_use]
    pub fn new(path: &Path) -> (Self, Arc<AtomicBool>) {
        let switch = Arc::new(AtomicBool::new(false));
        let store = Self {
            inner: FileStore::new(path),
            fail_user_writes: Arc::clone(&switch),
        };
        (store, switch)
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == keys::USER && self.fail_user_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io {
                path: self.inner.path().to_path_buf(),
                source: std::io::Error::other("disk full"),
            });
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}
