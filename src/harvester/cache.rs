// ABOUTME: Opt-in TTL cache of harvested content keyed by site base URL
// ABOUTME: LRU eviction bounds memory; placeholder-only harvests are never cached
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Harvest Cache
//!
//! Without this decorator every chat request re-scrapes the site. Wrapping a
//! harvester in [`CachedHarvester`] serves a stored copy until its TTL runs
//! out. It is only installed when `CONTENT_CACHE_TTL_SECS` is positive.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use super::ContentHarvester;
use crate::constants::cache::MAX_ENTRIES;
use crate::content::PortfolioContent;

#[derive(Debug, Clone)]
struct CacheEntry {
    content: PortfolioContent,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(content: PortfolioContent, ttl: Duration) -> Self {
        Self {
            content,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Harvester decorator serving recent results from memory
pub struct CachedHarvester {
    inner: Arc<dyn ContentHarvester>,
    ttl: Duration,
    store: RwLock<LruCache<String, CacheEntry>>,
}

impl CachedHarvester {
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(MAX_ENTRIES) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Cache results of `inner` for `ttl`
    #[must_use]
    pub fn new(inner: Arc<dyn ContentHarvester>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            store: RwLock::new(LruCache::new(Self::DEFAULT_CAPACITY)),
        }
    }

    async fn cached(&self, key: &str) -> Option<PortfolioContent> {
        let mut store = self.store.write().await;
        let fresh = store
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.content.clone());
        if fresh.is_none() {
            store.pop(key);
        }
        fresh
    }
}

#[async_trait]
impl ContentHarvester for CachedHarvester {
    async fn harvest(&self, base_url: &Url) -> PortfolioContent {
        let key = base_url.as_str();
        if let Some(content) = self.cached(key).await {
            debug!(base_url = %key, "Serving cached portfolio content");
            return content;
        }

        let content = self.inner.harvest(base_url).await;
        if !content.is_placeholder() {
            self.store
                .write()
                .await
                .put(key.to_owned(), CacheEntry::new(content.clone(), self.ttl));
        }
        content
    }
}
