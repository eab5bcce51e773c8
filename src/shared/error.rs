//! Client Error Types
//!
//! This module defines the error taxonomy surfaced by the session, feed and
//! chat layers.
//!
//! # Error Categories
//!
//! - `Authentication` - Bad credentials, missing token, or a 401 response
//! - `Network` - Transport or connectivity failure
//! - `Deserialization` - Malformed remote or persisted data
//! - `Http` - Any other non-success status from the API
//! - `Storage` - Durable storage read/write failure
//! - `ChatNotOpen` - Sending on a chat transport that is not open
//!
//! # Usage
//!
//! ```rust
//! use feedchat::shared::error::ClientError;
//!
//! let error = ClientError::authentication("Invalid credentials");
//! assert!(error.is_authentication());
//! ```
use thiserror::Error;

/// Result alias used across the client
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors produced by the client layers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Credentials rejected, token missing, or a 401 from a protected endpoint
    #[error("Authentication error: {message}")]
    Authentication {
        /// Human-readable error message
        message: String,
    },

    /// Connectivity or transport failure
    #[error("Network error: {message}")]
    Network {
        /// Human-readable error message
        message: String,
    },

    /// Malformed JSON from the server or from durable storage
    #[error("Deserialization error: {message}")]
    Deserialization {
        /// Human-readable error message
        message: String,
    },

    /// Non-success status that is not an authentication failure
    #[error("Request failed: {status} - {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// Durable storage failure
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable error message
        message: String,
    },

    /// The chat transport is not in the `Open` state
    #[error("Chat transport is not open")]
    ChatNotOpen,
}

impl ClientError {
    /// Create a new authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new deserialization error
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization {
            message: message.into(),
        }
    }

    /// Create a new HTTP status error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::deserialization(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::deserialization(format!("Failed to parse response: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}
