//! Injected result-cache capability and a bundled in-memory backend.
//!
//! The pipeline consults the cache before running and stores the full
//! [`PipelineResult`] afterwards. Keys combine provider name, cost mode,
//! and the normalised query, so economy and standard runs of the same
//! query cache independently. TTL and eviction are the backend's
//! concern; the pipeline only gets and inserts.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::types::{CostMode, PipelineResult};

/// Composite cache key: provider + cost mode + normalised query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    provider: String,
    cost_mode: CostMode,
    query: String,
}

impl CacheKey {
    /// Build a deterministic key.
    ///
    /// Query normalisation lowercases and collapses runs of whitespace
    /// so trivially-reworded queries share an entry.
    pub fn new(provider: &str, cost_mode: CostMode, query: &str) -> Self {
        let normalised: String = query
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            provider: provider.to_string(),
            cost_mode,
            query: normalised,
        }
    }
}

/// A pluggable result cache.
///
/// The pipeline stays a pure function of (query, provider, options,
/// cache) — implementations own all shared state.
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Look up a cached pipeline result.
    async fn get(&self, key: &CacheKey) -> Option<PipelineResult>;

    /// Store a pipeline result.
    async fn insert(&self, key: CacheKey, value: PipelineResult);
}

/// In-memory [`ResultCache`] backend with TTL and bounded capacity.
#[derive(Debug)]
pub struct MemoryCache {
    inner: Cache<CacheKey, PipelineResult>,
}

impl MemoryCache {
    /// Create a cache holding up to `max_entries` results for `ttl`.
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }
}

impl Default for MemoryCache {
    /// 100 entries, 10 minute TTL.
    fn default() -> Self {
        Self::new(100, Duration::from_secs(600))
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Option<PipelineResult> {
        self.inner.get(key).await
    }

    async fn insert(&self, key: CacheKey, value: PipelineResult) {
        self.inner.insert(key, value).await;
    }
}
