//! Request Pipeline
//!
//! Every call to a protected endpoint passes through the same stages:
//!
//! 1. [`BearerAuth`] attaches `Authorization: Bearer <token>` when the
//!    session holds an access token
//! 2. the request is sent
//! 3. [`UnauthorizedInterceptor`] turns a 401 into a session logout plus an
//!    authentication error
//! 4. any other non-success status becomes [`ClientError::Http`]
//!
//! Public calls (login) skip stages 1 and 3.

use crate::client::session::SessionStore;
use crate::shared::config::AppConfig;
use crate::shared::error::{ClientError, ClientResult};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Request stage: decorate with the session's bearer token
#[derive(Debug, Clone)]
pub struct BearerAuth {
    session: Arc<SessionStore>,
}

impl BearerAuth {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub async fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.access_token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Response stage: a 401 always clears the session. No refresh, no replay.
#[derive(Debug, Clone)]
pub struct UnauthorizedInterceptor {
    session: Arc<SessionStore>,
}

impl UnauthorizedInterceptor {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub async fn inspect(&self, response: Response) -> ClientResult<Response> {
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::warn!(url = %response.url(), "Received 401 Unauthorized, logging out");
        self.session.logout().await;
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::authentication(if body.is_empty() {
            "Unauthorized".to_string()
        } else {
            body
        }))
    }
}

/// HTTP client bound to the API base URL and the shared session
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionStore>,
    bearer: BearerAuth,
    unauthorized: UnauthorizedInterceptor,
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: Arc<SessionStore>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            bearer: BearerAuth::new(session.clone()),
            unauthorized: UnauthorizedInterceptor::new(session.clone()),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authorized GET decoded as JSON
    pub async fn get_protected<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let request = self.http.get(self.api_url(path)).query(query);
        let response = self.send_protected(request).await?;
        Ok(response.json::<T>().await?)
    }

    /// Unauthorized POST with a JSON body, decoded as JSON
    pub async fn post_public<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.http.post(self.api_url(path)).json(body).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_protected(&self, request: RequestBuilder) -> ClientResult<Response> {
        let request = self.bearer.apply(request).await;
        let response = request.send().await?;
        let response = self.unauthorized.inspect(response).await?;
        ensure_success(response).await
    }
}

async fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_else(|_| status.to_string());
    Err(ClientError::http(status.as_u16(), error_text))
}
