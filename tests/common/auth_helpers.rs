//! Authentication test helpers
//!
//! Provides utilities for building signed-in sessions and persisted entries.

use wiremock::MockServer;

use feedchat::client::{AppState, StoredEntries};

use super::mock_server::{
    mount_login_success, profile_json, TEST_ACCESS_TOKEN, TEST_PASSWORD, TEST_REFRESH_TOKEN,
    TEST_USERNAME,
};

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Entries as a previous run would have left them
pub fn persisted_entries() -> StoredEntries {
    StoredEntries {
        user: Some(profile_json().to_string()),
        access_token: Some(TEST_ACCESS_TOKEN.to_string()),
        refresh_token: Some(TEST_REFRESH_TOKEN.to_string()),
    }
}

/// Hydrate, then log in through the mocked identity endpoint
pub async fn sign_in(app: &mut AppState, server: &MockServer) {
    mount_login_success(server).await;
    app.start().await;
    app.login(TEST_USERNAME, TEST_PASSWORD)
        .await
        .expect("mock login succeeds");
}
