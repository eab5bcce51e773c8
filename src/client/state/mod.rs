use std::sync::Arc;

use crate::client::{
    ApiClient, AuthGateway, AuthStatus, ChatTransport, FeedCache, FileStorage, LoadOutcome,
    SessionPersistence, SessionStore,
};
use crate::shared::config::AppConfig;
use crate::shared::error::ClientResult;
use crate::shared::user::UserProfile;

/// Application state container owned by the composition root.
///
/// The session store is shared by the auth gateway and the feed cache; the
/// chat transport is independent of both.
#[derive(Debug)]
pub struct AppState {
    config: AppConfig,
    session: Arc<SessionStore>,
    auth: AuthGateway,
    feed: FeedCache,
    chat: ChatTransport,
}

impl AppState {
    pub fn new(config: AppConfig, persistence: Arc<dyn SessionPersistence>) -> ClientResult<Self> {
        let session = Arc::new(SessionStore::new(persistence));
        let api = ApiClient::new(&config, session.clone())?;

        Ok(Self {
            auth: AuthGateway::new(api.clone()),
            feed: FeedCache::new(api, config.page_limit),
            chat: ChatTransport::new(config.chat_url.clone()),
            session,
            config,
        })
    }

    /// State persisted under `config.storage_dir`
    pub fn with_file_storage(config: AppConfig) -> ClientResult<Self> {
        let storage = Arc::new(FileStorage::new(config.storage_dir.clone()));
        Self::new(config, storage)
    }

    /// Hydrate the session and, when a token survived without its profile,
    /// fetch the profile again. A failed profile fetch is logged, not fatal.
    pub async fn start(&mut self) -> AuthStatus {
        self.session.hydrate().await;
        if let Err(e) = self.auth.restore_profile().await {
            tracing::warn!("Could not restore user profile: {}", e);
        }
        self.session.auth_status().await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<UserProfile> {
        self.auth.login(username, password).await
    }

    /// Clear the session and drop the accumulated feed
    pub async fn logout(&mut self) {
        self.auth.logout().await;
        self.feed.reset();
    }

    pub async fn load_more(&mut self) -> ClientResult<LoadOutcome> {
        self.feed.load_more().await
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn auth(&self) -> &AuthGateway {
        &self.auth
    }

    pub fn feed(&self) -> &FeedCache {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut FeedCache {
        &mut self.feed
    }

    pub fn chat(&self) -> &ChatTransport {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatTransport {
        &mut self.chat
    }
}
