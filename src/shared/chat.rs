//! Chat Message Data Structure
//!
//! Entries of the append-only chat log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the channel produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Typed by this client
    Local,
    /// Received from the socket
    Remote,
}

/// Represents a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: Uuid,
    /// Raw text payload
    pub text: String,
    pub sender: Sender,
    /// Creation time for local messages, arrival time for remote ones
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Message typed by this client, stamped now
    pub fn local(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Local)
    }

    /// Message received from the socket, stamped on arrival
    pub fn remote(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Remote)
    }

    fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}
