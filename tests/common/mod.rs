//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Mock HTTP server fixtures (identity and listing endpoints)
//! - A local websocket server for the chat transport
//! - Authentication helpers
//! - Feed assertions

#![allow(dead_code)]

pub mod assertions;
pub mod auth_helpers;

// Re-export commonly used utilities
pub use assertions::*;
pub use auth_helpers::*;
pub use mock_server::*;
pub use ws_server::*;
