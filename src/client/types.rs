/**
 * Client Request/Response Types
 *
 * Bodies exchanged with the identity endpoint.
 */

use crate::client::session::Credentials;
use crate::shared::error::ClientError;
use crate::shared::user::UserProfile;
use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: the profile fields plus two tokens
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    /// Newer deployments send `accessToken`, older ones `token`; some send both
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

impl TryFrom<LoginResponse> for Credentials {
    type Error = ClientError;

    fn try_from(value: LoginResponse) -> Result<Self, Self::Error> {
        let LoginResponse {
            user,
            access_token,
            token,
            refresh_token,
        } = value;
        let access_token = access_token
            .or(token)
            .ok_or_else(|| ClientError::deserialization("login response carries no access token"))?;
        Ok(Self {
            user,
            access_token,
            refresh_token,
        })
    }
}
