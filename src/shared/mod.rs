//! Shared Module
//!
//! Types and data structures used by every client layer: wire models for the
//! identity and listing endpoints, chat log entries, configuration and the
//! error taxonomy.

/// User profile
pub mod user;

/// Feed items and pages
pub mod feed;

/// Chat log entries
pub mod chat;

/// Client error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use chat::{ChatMessage, Sender};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{ClientError, ClientResult};
pub use feed::{FeedPage, Item, ReactionCounts};
pub use user::UserProfile;
