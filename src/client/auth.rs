/**
 * Authentication Module
 *
 * Login and "who am I" calls against the identity endpoint. A successful
 * login populates the session store; protected calls go through the request
 * pipeline, so a 401 logs the session out.
 */

use crate::client::http::ApiClient;
use crate::client::session::{Credentials, SessionStore};
use crate::client::types::{LoginRequest, LoginResponse};
use crate::shared::error::{ClientError, ClientResult};
use crate::shared::user::UserProfile;
use std::sync::Arc;

/// Identity endpoint client
#[derive(Debug, Clone)]
pub struct AuthGateway {
    api: ApiClient,
}

impl AuthGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.api.session()
    }

    /// Login user with username and password.
    ///
    /// The session is only touched on success.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserProfile> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response: LoginResponse = self
            .api
            .post_public("/auth/login", &request)
            .await
            .map_err(login_error)?;

        let credentials = Credentials::try_from(response)?;
        let user = credentials.user.clone();
        self.session().set_credentials(Some(credentials)).await;

        tracing::info!(user_id = user.id, "Login succeeded for {}", user.username);
        Ok(user)
    }

    pub async fn logout(&self) {
        self.session().logout().await;
    }

    /// Get current user info with the session token
    pub async fn current_user(&self) -> ClientResult<UserProfile> {
        if self.session().access_token().await.is_none() {
            return Err(ClientError::authentication("Not authenticated"));
        }
        self.api.get_protected("/auth/me", &[]).await
    }

    /// Re-fetch the profile when hydration restored a token but no user.
    ///
    /// Returns `None` when signed out or not yet hydrated.
    pub async fn restore_profile(&self) -> ClientResult<Option<UserProfile>> {
        let session = self.session().snapshot().await;
        if !session.hydrated || session.access_token.is_none() {
            return Ok(None);
        }
        if let Some(user) = session.user {
            return Ok(Some(user));
        }

        tracing::info!("Restoring user profile from /auth/me");
        let user = self.current_user().await?;
        self.session().set_user(user.clone()).await;
        Ok(Some(user))
    }
}

/// Credential rejections become authentication errors; everything else passes through
fn login_error(err: ClientError) -> ClientError {
    match err {
        ClientError::Http { status: 400 | 401 | 403, message } => {
            tracing::warn!("Login rejected: {}", message);
            ClientError::authentication(format!("Login failed: {}", message))
        }
        other => {
            tracing::warn!("Login failed: {}", other);
            other
        }
    }
}
