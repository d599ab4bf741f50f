//! Memory Backend Module
//!
//! In-process [`Backend`] implementation: a HashMap of entries behind a
//! single async RwLock, with lazy expiry on access and eager expiry through
//! [`Backend::purge_expired`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{CacheError, Result};
use crate::store::backend::Backend;
use crate::store::clock::{Clock, SystemClock};
use crate::store::entry::{Entry, EntryData};
use crate::store::pattern::GlobPattern;
use crate::store::value::decode_integer;

// == Memory Backend ==
/// In-memory backend. All mutation happens under one write lock, so every
/// primitive is linearizable.
#[derive(Debug)]
pub struct MemoryBackend {
    /// Key-value storage
    entries: RwLock<HashMap<String, Entry>>,
    /// Time source for TTL checks
    clock: Arc<dyn Clock>,
    /// Set once the backend has been shut down
    closed: AtomicBool,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates an empty backend driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty backend driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            closed: AtomicBool::new(false),
        }
    }

    // == Shutdown ==
    /// Stops serving requests. Every later call fails with
    /// [`CacheError::StorageUnavailable`].
    pub fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            warn!("Memory backend shut down");
        }
    }

    /// Returns true once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    // == Length ==
    /// Number of live (non-expired) entries.
    pub async fn len(&self) -> usize {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired(now)).count()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub async fn stored_len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn ensure_available(&self) -> Result<()> {
        if self.is_shut_down() {
            return Err(CacheError::StorageUnavailable(
                "memory backend has been shut down".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops `key` if its entry has expired at `now`.
fn evict_if_expired(entries: &mut HashMap<String, Entry>, key: &str, now: Instant) {
    if entries.get(key).is_some_and(|e| e.is_expired(now)) {
        entries.remove(key);
        debug!("Lazily expired key {}", key);
    }
}

fn wrong_type(key: &str, found: &str, expected: &str) -> CacheError {
    CacheError::Decode(format!(
        "key {:?} holds a {}, expected a {}",
        key, found, expected
    ))
}

/// Resolves an inclusive `[start, stop]` range with negative indices into
/// a half-open slice range, or None if it selects nothing.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<std::ops::Range<usize>> {
    let len = isize::try_from(len).ok()?;
    let start = if start < 0 { (start + len).max(0) } else { start };
    let stop = if stop < 0 { stop + len } else { stop.min(len - 1) };

    if start >= len || stop < 0 || start > stop {
        return None;
    }
    Some(start as usize..stop as usize + 1)
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.ensure_available()?;
        let entry = Entry::new(EntryData::Bytes(value), self.clock.now(), ttl);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<bool> {
        self.ensure_available()?;
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key, now);

        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), Entry::new(EntryData::Bytes(value), now, ttl));
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_available()?;
        let now = self.clock.now();
        // Write lock: an expired entry is removed on the way out
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key, now);

        match entries.get(key) {
            Some(Entry {
                data: EntryData::Bytes(raw),
                ..
            }) => Ok(Some(raw.clone())),
            Some(entry) => Err(wrong_type(key, entry.data.kind(), "string")),
            None => Ok(None),
        }
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.ensure_available()?;
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key, now);

        match entries.get_mut(key) {
            Some(entry) => match &mut entry.data {
                EntryData::Bytes(raw) => {
                    let next = decode_integer(raw)?.checked_add(1).ok_or_else(|| {
                        CacheError::Decode(format!("increment of {:?} would overflow", key))
                    })?;
                    *raw = next.to_string().into_bytes();
                    Ok(next)
                }
                EntryData::List(_) => Err(wrong_type(key, "list", "string")),
            },
            None => {
                let entry = Entry::new(EntryData::Bytes(b"1".to_vec()), now, None);
                entries.insert(key.to_string(), entry);
                Ok(1)
            }
        }
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        self.ensure_available()?;
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key, now);

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(EntryData::List(Vec::new()), now, None));

        match &mut entry.data {
            EntryData::List(items) => {
                items.push(value);
                Ok(items.len())
            }
            EntryData::Bytes(_) => Err(wrong_type(key, "string", "list")),
        }
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        self.ensure_available()?;
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key, now);

        match entries.get(key) {
            Some(Entry {
                data: EntryData::List(items),
                ..
            }) => Ok(resolve_range(items.len(), start, stop)
                .map(|range| items[range].to_vec())
                .unwrap_or_default()),
            Some(entry) => Err(wrong_type(key, entry.data.kind(), "list")),
            None => Ok(Vec::new()),
        }
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        self.ensure_available()?;
        let glob = GlobPattern::new(pattern)?;
        let now = self.clock.now();
        let entries = self.entries.read().await;

        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired(now) && glob.is_match(key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn flush(&self) -> Result<()> {
        self.ensure_available()?;
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        debug!("Flushed {} entries", count);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        self.ensure_available()?;
        let now = self.clock.now();
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before - entries.len())
    }
}
