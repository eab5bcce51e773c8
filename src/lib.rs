//! feedchat - Main Library
//!
//! feedchat is a client for an authenticated, paginated feed with a live
//! echo-style chat channel.
//!
//! # Overview
//!
//! This library provides:
//! - Session lifecycle: login, token persistence, hydration at startup,
//!   logout on any 401 from a protected endpoint
//! - A feed cache that merges pages into one growing, deduplicated list
//! - A websocket chat transport with an append-only message log
//!
//! # Module Structure
//!
//! - **`shared`** - Wire models, configuration and error types
//! - **`client`** - Session store, request pipeline, feed cache, chat
//!   transport and the `AppState` composition root
//!
//! # Thread Safety
//!
//! The session store is shared behind `Arc` with a `tokio::sync::RwLock`.
//! The feed cache and chat transport are owned by `AppState` and mutated
//! through `&mut self`, so page merges and chat events are applied one at a
//! time.
//!
//! # Error Handling
//!
//! Fallible operations return `shared::error::ClientResult<T>`. Storage
//! failures during session transitions are logged instead of returned.

/// Shared types and data structures
pub mod shared;

/// Session, feed and chat client
pub mod client;
