//! Session Store
//!
//! Holds the current user identity and credential tokens, and mirrors them
//! into an injected [`SessionPersistence`] adapter.
//!
//! ## Lifecycle
//!
//! - Created empty with `hydrated = false`
//! - [`SessionStore::hydrate`] restores persisted entries once at startup
//! - [`SessionStore::set_credentials`] on login, [`SessionStore::logout`] on
//!   logout or a 401 from a protected endpoint
//!
//! Until hydration has run, the access token is not a reliable
//! authentication signal; [`SessionStore::auth_status`] reports
//! [`AuthStatus::Pending`] in that window.
//!
//! Persistence failures never surface from this module. They are logged and
//! the in-memory transition still happens.

use crate::client::storage::{SessionPersistence, StorageKey, StoredEntries};
use crate::shared::user::UserProfile;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory session state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub hydrated: bool,
}

impl Session {
    /// Hydration-aware authentication signal
    pub fn auth_status(&self) -> AuthStatus {
        if !self.hydrated {
            AuthStatus::Pending
        } else if self.access_token.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        }
    }

    fn clear_credentials(&mut self) {
        self.user = None;
        self.access_token = None;
        self.refresh_token = None;
    }
}

/// Whether the user should be treated as signed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// Storage has not been read yet
    Pending,
    Authenticated,
    Anonymous,
}

/// Payload for [`SessionStore::set_credentials`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Shared session state plus its persistence adapter
pub struct SessionStore {
    state: RwLock<Session>,
    persistence: Arc<dyn SessionPersistence>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(persistence: Arc<dyn SessionPersistence>) -> Self {
        Self {
            state: RwLock::new(Session::default()),
            persistence,
        }
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.state.read().await.user.clone()
    }

    pub async fn is_hydrated(&self) -> bool {
        self.state.read().await.hydrated
    }

    pub async fn auth_status(&self) -> AuthStatus {
        self.state.read().await.auth_status()
    }

    /// Replace (or, with `None`, clear) the credentials and mirror them to storage
    pub async fn set_credentials(&self, payload: Option<Credentials>) {
        let Some(credentials) = payload else {
            self.logout().await;
            return;
        };

        let user_json = match serde_json::to_string(&credentials.user) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::warn!("Failed to serialize user profile, not persisting it: {}", e);
                None
            }
        };

        let mut state = self.state.write().await;
        let entries = StoredEntries {
            user: user_json,
            access_token: Some(credentials.access_token.clone()),
            refresh_token: Some(credentials.refresh_token.clone()),
        };
        if let Err(e) = self.persistence.save(&entries) {
            tracing::warn!("Failed to persist credentials: {}", e);
        }

        tracing::info!(user_id = credentials.user.id, "Credentials set for {}", credentials.user.username);
        state.user = Some(credentials.user);
        state.access_token = Some(credentials.access_token);
        state.refresh_token = Some(credentials.refresh_token);
    }

    /// Replace only the profile, keeping the tokens
    pub async fn set_user(&self, user: UserProfile) {
        let mut state = self.state.write().await;
        match serde_json::to_string(&user) {
            Ok(json) => {
                if let Err(e) = self.persistence.write(StorageKey::User, &json) {
                    tracing::warn!("Failed to persist user profile: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize user profile: {}", e),
        }
        state.user = Some(user);
    }

    /// Clear user and tokens in memory and in storage. Safe to call repeatedly.
    pub async fn logout(&self) {
        let mut state = self.state.write().await;
        if let Err(e) = self.persistence.clear() {
            tracing::warn!("Failed to clear persisted session: {}", e);
        }
        if state.access_token.is_some() || state.user.is_some() {
            tracing::info!("Session cleared");
        }
        state.clear_credentials();
    }

    /// Restore state from storage. Runs once; later calls are no-ops.
    pub async fn hydrate(&self) {
        let mut state = self.state.write().await;
        if state.hydrated {
            tracing::debug!("Session already hydrated, skipping");
            return;
        }

        match self.persistence.load() {
            Ok(entries) => {
                state.user = entries.user.and_then(|raw| self.parse_stored_user(&raw));
                state.access_token = entries.access_token.filter(|t| !t.is_empty());
                state.refresh_token = entries.refresh_token.filter(|t| !t.is_empty());
            }
            Err(e) => {
                tracing::warn!("Session storage unreadable, starting signed out: {}", e);
                state.clear_credentials();
            }
        }

        state.hydrated = true;
        tracing::info!(
            authenticated = state.access_token.is_some(),
            has_profile = state.user.is_some(),
            "Session hydrated"
        );
    }

    /// Corrupted entries are dropped from storage so the next start is clean
    fn parse_stored_user(&self, raw: &str) -> Option<UserProfile> {
        match serde_json::from_str::<UserProfile>(raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Discarding malformed persisted user: {}", e);
                if let Err(e) = self.persistence.remove(StorageKey::User) {
                    tracing::warn!("Failed to remove malformed '{}' entry: {}", StorageKey::User.as_str(), e);
                }
                None
            }
        }
    }
}
