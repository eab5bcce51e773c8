//! Feed Cache
//!
//! Accumulates pages from `GET /posts` into one ordered, deduplicated item
//! list. Every page request, whatever its `skip`/`limit`, merges into the
//! same [`FeedCacheState`].
//!
//! ## Merge gate
//!
//! A page is appended when its requested `skip` is beyond the cached `skip`
//! (forward pagination) or when the cache is empty and the page is not
//! (first load). Only ids not already cached are appended, in server order.
//! `skip`, `limit` and `total` are overwritten by every response.
//!
//! Because the gate compares against the cached `skip`, a late response for
//! a smaller offset is reduced to a metadata refresh instead of corrupting
//! the order.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn example(mut feed: feedchat::client::FeedCache) -> feedchat::shared::ClientResult<()> {
//! feed.load(0, 10).await?;
//! while feed.has_more() {
//!     feed.load_more().await?;
//! }
//! println!("{} of {}", feed.items().len(), feed.total());
//! # Ok(())
//! # }
//! ```

use crate::client::http::ApiClient;
use crate::shared::error::{ClientError, ClientResult};
use crate::shared::feed::{FeedPage, Item};
use std::collections::HashSet;

/// Accumulated feed plus the latest pagination bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedCacheState {
    pub items: Vec<Item>,
    pub skip: u32,
    pub limit: u32,
    pub total: u32,
}

impl FeedCacheState {
    /// Apply one response for a request made with `requested_skip`.
    ///
    /// Returns the number of items appended.
    pub fn merge(&mut self, requested_skip: u32, page: FeedPage) -> usize {
        let forward = requested_skip > self.skip;
        let first_load = self.items.is_empty() && !page.items.is_empty();

        let mut appended = 0;
        if forward || first_load {
            let mut seen: HashSet<u64> = self.items.iter().map(|item| item.id).collect();
            for item in page.items {
                if seen.insert(item.id) {
                    self.items.push(item);
                    appended += 1;
                }
            }
        } else {
            tracing::debug!(
                requested_skip,
                cached_skip = self.skip,
                "Merge gate closed, refreshing pagination only"
            );
        }

        self.skip = page.skip;
        self.limit = page.limit;
        self.total = page.total;
        appended
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What the consumer renders: accumulated items and the latest total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedView<'a> {
    pub items: &'a [Item],
    pub total: u32,
}

/// A page request that has been issued but not applied yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u32,
    pub limit: u32,
}

impl PageRequest {
    pub async fn send(self, api: &ApiClient) -> ClientResult<FeedPage> {
        fetch_page(api, self.skip, self.limit).await
    }
}

/// Result of [`FeedCache::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Network fetch applied; this many new items were appended
    Appended(usize),
    /// Same `skip` as the previous request, served from cache
    Cached,
    /// `load_more` with nothing left or a fetch already in flight
    NothingToLoad,
}

/// Request one page from the listing endpoint
pub async fn fetch_page(api: &ApiClient, skip: u32, limit: u32) -> ClientResult<FeedPage> {
    tracing::debug!(skip, limit, "Fetching feed page");
    api.get_protected(
        "/posts",
        &[("limit", limit.to_string()), ("skip", skip.to_string())],
    )
    .await
}

/// Paginated feed cache
#[derive(Debug)]
pub struct FeedCache {
    api: ApiClient,
    page_limit: u32,
    state: FeedCacheState,
    last_requested_skip: Option<u32>,
    in_flight: usize,
    last_error: Option<ClientError>,
}

impl FeedCache {
    pub fn new(api: ApiClient, page_limit: u32) -> Self {
        Self {
            api,
            page_limit,
            state: FeedCacheState::default(),
            last_requested_skip: None,
            in_flight: 0,
            last_error: None,
        }
    }

    /// Fetch a page without touching the cache
    pub async fn fetch_page(&self, skip: u32, limit: u32) -> ClientResult<FeedPage> {
        fetch_page(&self.api, skip, limit).await
    }

    pub fn state(&self) -> &FeedCacheState {
        &self.state
    }

    pub fn view(&self) -> FeedView<'_> {
        FeedView {
            items: &self.state.items,
            total: self.state.total,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.state.items
    }

    pub fn total(&self) -> u32 {
        self.state.total
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight > 0
    }

    /// Error of the most recent fetch, cleared by the next success
    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    /// More pages exist and nothing is in flight.
    ///
    /// Dedup can leave the list short of `total` for good, so the next offset
    /// must also lie before `total` and not repeat the previous request.
    pub fn has_more(&self) -> bool {
        let next = self.next_skip();
        self.in_flight == 0
            && self.state.items.len() < self.state.total as usize
            && next < self.state.total
            && !self.already_requested(next)
    }

    /// Offset of the page after the latest response
    pub fn next_skip(&self) -> u32 {
        self.state.skip.saturating_add(self.state.limit)
    }

    /// Issue a request for `skip`, or `None` when it repeats the previous one.
    ///
    /// A different `skip` always goes to the network. After a failed fetch the
    /// same `skip` may be retried.
    pub fn begin(&mut self, skip: u32, limit: u32) -> Option<PageRequest> {
        if self.already_requested(skip) {
            tracing::debug!(skip, "Feed page already requested, serving cache");
            return None;
        }
        self.last_requested_skip = Some(skip);
        self.in_flight += 1;
        Some(PageRequest { skip, limit })
    }

    /// Apply the outcome of a request returned by [`FeedCache::begin`]
    pub fn complete(
        &mut self,
        request: PageRequest,
        result: ClientResult<FeedPage>,
    ) -> ClientResult<usize> {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(page) => {
                self.last_error = None;
                let appended = self.state.merge(request.skip, page);
                tracing::debug!(
                    skip = request.skip,
                    appended,
                    accumulated = self.state.items.len(),
                    total = self.state.total,
                    "Feed page merged"
                );
                Ok(appended)
            }
            Err(e) => {
                tracing::warn!(skip = request.skip, "Feed fetch failed: {}", e);
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Fetch and merge the page at `skip`
    pub async fn load(&mut self, skip: u32, limit: u32) -> ClientResult<LoadOutcome> {
        let Some(request) = self.begin(skip, limit) else {
            return Ok(LoadOutcome::Cached);
        };
        let result = request.send(&self.api).await;
        self.complete(request, result).map(LoadOutcome::Appended)
    }

    /// Load the first page, or the page at [`FeedCache::next_skip`] when
    /// [`FeedCache::has_more`]. A failed first page is retried.
    pub async fn load_more(&mut self) -> ClientResult<LoadOutcome> {
        if self.in_flight > 0 {
            return Ok(LoadOutcome::NothingToLoad);
        }
        let skip = match self.last_requested_skip {
            None => 0,
            Some(_) if self.state.items.is_empty() && self.last_error.is_some() => 0,
            Some(_) if self.has_more() => self.next_skip(),
            Some(_) => return Ok(LoadOutcome::NothingToLoad),
        };
        self.load(skip, self.page_limit).await
    }

    fn already_requested(&self, skip: u32) -> bool {
        self.last_requested_skip == Some(skip) && self.last_error.is_none()
    }

    /// Drop everything; the only way the item list shrinks
    pub fn reset(&mut self) {
        self.state.clear();
        self.last_requested_skip = None;
        self.last_error = None;
        tracing::debug!("Feed cache reset");
    }
}
