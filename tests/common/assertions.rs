//! Custom assertions
//!
//! Feed-specific checks with descriptive failure messages.

use std::collections::HashSet;

use feedchat::shared::Item;

/// Assert that no item id appears twice
pub fn assert_unique_ids(items: &[Item]) {
    let mut seen = HashSet::new();
    for item in items {
        assert!(seen.insert(item.id), "duplicate item id {} in feed", item.id);
    }
}

/// Assert the exact id sequence of the feed
pub fn assert_ids(items: &[Item], expected: &[u64]) {
    let actual: Vec<u64> = items.iter().map(|item| item.id).collect();
    pretty_assertions::assert_eq!(actual, expected);
}
