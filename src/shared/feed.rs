//! Feed Items and Pages
//!
//! Wire types for the `/posts` listing endpoint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Reaction counters attached to an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
}

/// A single feed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub title: String,
    pub body: String,
    #[serde(rename = "userId")]
    pub owner_id: u64,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, rename = "reactions")]
    pub reaction_counts: ReactionCounts,
}

/// One page as reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPage {
    #[serde(rename = "posts")]
    pub items: Vec<Item>,
    pub total: u32,
    pub skip: u32,
    pub limit: u32,
}
