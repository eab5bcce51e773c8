//! Property-based tests for the feed merge

use proptest::prelude::*;
use std::collections::HashSet;

use feedchat::client::FeedCacheState;
use feedchat::shared::{FeedPage, Item};

fn item(id: u64) -> Item {
    Item {
        id,
        title: format!("Post {}", id),
        body: String::new(),
        owner_id: 1,
        tags: Default::default(),
        reaction_counts: Default::default(),
    }
}

fn page(ids: &[u64], skip: u32, total: u32) -> FeedPage {
    FeedPage {
        items: ids.iter().copied().map(item).collect(),
        total,
        skip,
        limit: 10,
    }
}

fn first_seen_order(pages: &[Vec<u64>]) -> Vec<u64> {
    let mut seen = HashSet::new();
    pages
        .iter()
        .flatten()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

proptest! {
    #[test]
    fn test_forward_pagination_keeps_first_seen_order(
        pages in prop::collection::vec(prop::collection::vec(0u64..60, 0..10), 1..8)
    ) {
        let mut state = FeedCacheState::default();
        for (i, ids) in pages.iter().enumerate() {
            let skip = (i as u32) * 10;
            state.merge(skip, page(ids, skip, 100));
        }

        let accumulated: Vec<u64> = state.items.iter().map(|item| item.id).collect();
        prop_assert_eq!(accumulated, first_seen_order(&pages));
    }

    #[test]
    fn test_refetching_same_skip_never_duplicates(
        first in prop::collection::vec(0u64..40, 1..10),
        second in prop::collection::vec(0u64..40, 0..10),
        repeats in 1usize..4
    ) {
        let mut state = FeedCacheState::default();
        state.merge(0, page(&first, 0, 100));
        for _ in 0..repeats {
            state.merge(10, page(&second, 10, 100));
        }

        let ids: Vec<u64> = state.items.iter().map(|item| item.id).collect();
        let unique: HashSet<u64> = ids.iter().copied().collect();
        prop_assert_eq!(ids.len(), unique.len());
        prop_assert_eq!(ids, first_seen_order(&[first, second]));
    }

    #[test]
    fn test_metadata_always_follows_latest_response(
        skips in prop::collection::vec(0u32..100, 1..10),
        total in 0u32..500
    ) {
        let mut state = FeedCacheState::default();
        let mut longest = 0;
        for skip in &skips {
            state.merge(*skip, page(&[u64::from(*skip)], *skip, total));
            prop_assert!(state.items.len() >= longest);
            longest = state.items.len();
        }
        prop_assert_eq!(state.skip, *skips.last().unwrap());
        prop_assert_eq!(state.total, total);
    }
}
