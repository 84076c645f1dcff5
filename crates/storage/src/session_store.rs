use portal_core::model::{PersistScope, User};
use tracing::debug;

use crate::repository::{KeyValueStore, Storage, StorageError};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_DATA_KEY: &str = "userData";

/// Session as read back from one storage scope.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: User,
    pub scope: PersistScope,
}

/// Reads and writes the three session keys.
///
/// Exactly one scope holds a session at a time: `save` clears the other scope,
/// and `load` takes every key from the same scope, preferring the persistent one.
#[derive(Clone)]
pub struct SessionStore {
    storage: Storage,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Load the authoritative session, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored user cannot be
    /// parsed, or other storage errors.
    pub async fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        for scope in [PersistScope::Persistent, PersistScope::SessionOnly] {
            let store = self.storage.scope(scope);
            let Some(access_token) = store.get(ACCESS_TOKEN_KEY).await? else {
                continue;
            };
            let Some(raw_user) = store.get(USER_DATA_KEY).await? else {
                debug!(?scope, "access token without user data; ignoring scope");
                continue;
            };
            let user: User = serde_json::from_str(&raw_user)
                .map_err(|err| StorageError::Serialization(err.to_string()))?;
            let refresh_token = store
                .get(REFRESH_TOKEN_KEY)
                .await?
                .filter(|token| !token.is_empty());
            return Ok(Some(StoredSession {
                access_token,
                refresh_token,
                user,
                scope,
            }));
        }
        Ok(None)
    }

    /// Write a session into `scope` and clear the other scope.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if either scope cannot be written.
    pub async fn save(
        &self,
        scope: PersistScope,
        access_token: &str,
        refresh_token: Option<&str>,
        user: &User,
    ) -> Result<(), StorageError> {
        let other = match scope {
            PersistScope::Persistent => PersistScope::SessionOnly,
            PersistScope::SessionOnly => PersistScope::Persistent,
        };
        clear_scope(self.storage.scope(other).as_ref()).await?;

        let user_json =
            serde_json::to_string(user).map_err(|err| StorageError::Serialization(err.to_string()))?;
        let store = self.storage.scope(scope);
        store.set(ACCESS_TOKEN_KEY, access_token).await?;
        match refresh_token {
            Some(token) => store.set(REFRESH_TOKEN_KEY, token).await?,
            None => store.remove(REFRESH_TOKEN_KEY).await?,
        }
        store.set(USER_DATA_KEY, &user_json).await?;
        Ok(())
    }

    /// Remove the session keys from both scopes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a scope cannot be written.
    pub async fn clear(&self) -> Result<(), StorageError> {
        clear_scope(self.storage.persistent.as_ref()).await?;
        clear_scope(self.storage.session.as_ref()).await
    }
}

async fn clear_scope(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_DATA_KEY] {
        store.remove(key).await?;
    }
    Ok(())
}
