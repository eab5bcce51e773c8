//! Client Module
//!
//! Session, feed and chat logic of the client, independent of any UI.
//!
//! # Architecture
//!
//! - **`storage`** - Persistence adapter for the three session entries
//! - **`session`** - Session store, hydration and logout
//! - **`http`** - Request pipeline (bearer decoration, 401 interceptor)
//! - **`auth`** - Login and "who am I" calls
//! - **`feed`** - Paginated feed cache with the incremental merge
//! - **`chat`** - Websocket chat transport and message log
//! - **`state`** - `AppState`, the composition root tying them together
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use feedchat::client::{AppState, MemoryStorage};
//! use feedchat::shared::AppConfig;
//!
//! # async fn example() -> feedchat::shared::ClientResult<()> {
//! let config = AppConfig::builder().build().expect("valid config");
//! let mut app = AppState::new(config, Arc::new(MemoryStorage::new()))?;
//! app.start().await;
//! app.login("emilys", "emilyspass").await?;
//! app.load_more().await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod chat;
pub mod feed;
pub mod http;
pub mod session;
pub mod state;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use auth::AuthGateway;
pub use chat::{ChatStatus, ChatTransport, TransportEvent};
pub use feed::{FeedCache, FeedCacheState, FeedView, LoadOutcome, PageRequest};
pub use http::ApiClient;
pub use session::{AuthStatus, Credentials, Session, SessionStore};
pub use state::AppState;
pub use storage::{FileStorage, MemoryStorage, SessionPersistence, StorageKey, StoredEntries};
