//! Instrumented Cache Module
//!
//! Wraps a resource fetcher with access counting, a TTL-bounded result
//! cache and a call-history log, all kept in a [`KeyValueStore`].
//!
//! Keys used per call to `fetch(identity)`:
//! - `{operation}`: total calls to the wrapped operation
//! - `count:{identity}`: calls for this resource
//! - `cache:{identity}`: cached result, expiring after the configured TTL
//! - `{operation}:history`: one record per call, failed calls included

use std::fmt;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{CacheError, Result};
use crate::fetch::ResourceFetcher;
use crate::instrument::{CacheStats, CallRecord};
use crate::store::KeyValueStore;

/// TTL applied to cached results unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

// == Instrumented Cache ==
/// A fetcher wrapped with counting, caching and history recording.
pub struct InstrumentedCache<F> {
    /// Where results, counters and history live
    store: KeyValueStore,
    /// The wrapped operation
    fetcher: F,
    /// Lifetime of cached results
    ttl: Duration,
    /// Outcomes seen by this instance
    stats: Mutex<CacheStats>,
}

impl<F: ResourceFetcher> InstrumentedCache<F> {
    // == Constructor ==
    /// Wraps `fetcher`, caching its results in `store` for [`DEFAULT_TTL`].
    pub fn new(store: KeyValueStore, fetcher: F) -> Self {
        Self {
            store,
            fetcher,
            ttl: DEFAULT_TTL,
            stats: Mutex::new(CacheStats::new()),
        }
    }

    /// Sets the lifetime of cached results.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Name of the wrapped operation.
    pub fn operation(&self) -> &str {
        self.fetcher.name()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn store(&self) -> &KeyValueStore {
        &self.store
    }

    fn cache_key(identity: &str) -> String {
        format!("cache:{}", identity)
    }

    fn count_key(identity: &str) -> String {
        format!("count:{}", identity)
    }

    // == Fetch ==
    /// Returns the content for `identity`, from cache when a live entry
    /// exists and from the wrapped fetcher otherwise.
    ///
    /// Both counters are incremented before the lookup, so every call is
    /// counted whether it hits, misses or fails. A failed fetch writes no
    /// cache entry but is still recorded in the history, with the error
    /// text as its output.
    pub async fn fetch(&self, identity: &str) -> Result<String> {
        self.fetch_counted(identity).await.map(|(content, _)| content)
    }

    /// Like [`fetch`](Self::fetch), also returning the access count of
    /// `identity` as set by this call's own increment.
    pub async fn fetch_counted(&self, identity: &str) -> Result<(String, i64)> {
        let operation = self.fetcher.name();
        let calls = self.store.calls();

        calls.count_call(operation).await?;
        let count = calls.increment(&Self::count_key(identity)).await?;
        debug!("Count for {}: {}", identity, count);

        let cache_key = Self::cache_key(identity);
        if let Some(cached) = self.store.get_as_string(&cache_key).await? {
            debug!("Returning cached result for {}", identity);
            self.stats.lock().await.record_hit();
            calls
                .append(operation, vec![identity.to_string()], cached.clone(), false)
                .await?;
            return Ok((cached, count));
        }

        info!("Cache miss for {}, invoking {}", identity, operation);
        self.stats.lock().await.record_miss();

        match self.fetcher.fetch(identity).await {
            Ok(content) => {
                self.store
                    .set_ex(&cache_key, content.as_str(), self.ttl)
                    .await?;
                calls
                    .append(operation, vec![identity.to_string()], content.clone(), false)
                    .await?;
                Ok((content, count))
            }
            Err(source) => {
                warn!("{} failed for {}: {:#}", operation, identity, source);
                self.stats.lock().await.record_failure();
                calls
                    .append(
                        operation,
                        vec![identity.to_string()],
                        format!("<failed: {:#}>", source),
                        true,
                    )
                    .await?;
                Err(CacheError::OperationFailed {
                    operation: operation.to_string(),
                    identity: identity.to_string(),
                    source,
                })
            }
        }
    }

    // == Counters ==
    /// Number of fetches requested for `identity`, hits and failures included.
    pub async fn access_count(&self, identity: &str) -> Result<i64> {
        self.store.calls().counter(&Self::count_key(identity)).await
    }

    /// Number of fetches requested across all identities.
    pub async fn call_count(&self) -> Result<i64> {
        self.store.call_count(self.operation()).await
    }

    // == History ==
    /// Every recorded call to the wrapped operation, oldest first.
    pub async fn history(&self) -> Result<Vec<CallRecord>> {
        self.store.history_of(self.operation()).await
    }

    /// Replay lines for the wrapped operation.
    pub async fn replay(&self) -> Result<Vec<String>> {
        self.store.replay(self.operation()).await
    }

    // == Stats ==
    /// Snapshot of hit/miss/failure counters for this instance.
    pub async fn stats(&self) -> CacheStats {
        self.stats.lock().await.clone()
    }
}

impl<F: ResourceFetcher> fmt::Debug for InstrumentedCache<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentedCache")
            .field("operation", &self.fetcher.name())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
