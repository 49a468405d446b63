use std::sync::Arc;

use crate::api::types::UserProfile;
use crate::errors::BankResult;
use crate::storage::KeyValueStore;

/// Key under which the auth token is persisted.
pub const TOKEN_KEY: &str = "auth_token";
/// Key under which the JSON-serialized profile snapshot is persisted.
pub const PROFILE_KEY: &str = "user_data";

/// Narrow facade over the device key/value store holding the current
/// credential and the last-known profile snapshot.
///
/// The two keys are written independently; a crash between them leaves the
/// profile stale, which is acceptable because it is only a display cache.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> BankResult<Option<String>> {
        self.store.get(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) -> BankResult<()> {
        self.store.set(TOKEN_KEY, token)
    }

    pub fn clear_token(&self) -> BankResult<()> {
        self.store.remove(TOKEN_KEY)
    }

    /// Last persisted profile snapshot. A snapshot that no longer decodes is
    /// treated as absent rather than failing the caller.
    pub fn profile(&self) -> BankResult<Option<UserProfile>> {
        let Some(raw) = self.store.get(PROFILE_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(err) => {
                log::warn!("Discarding unreadable profile snapshot: {}", err);
                Ok(None)
            }
        }
    }

    pub fn set_profile(&self, profile: &UserProfile) -> BankResult<()> {
        let raw = serde_json::to_string(profile)?;
        self.store.set(PROFILE_KEY, &raw)
    }

    pub fn clear_profile(&self) -> BankResult<()> {
        self.store.remove(PROFILE_KEY)
    }
}
