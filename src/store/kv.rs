//! Key-Value Store Module
//!
//! Typed facade over a [`Backend`]: values go in as [`Value`]s under fresh
//! UUID keys and come back out through a decoder.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::instrument::{CallLog, CallRecord};
use crate::store::backend::Backend;
use crate::store::value::{decode_bytes, decode_float, decode_integer, decode_string, Value};

/// Operation name under which [`KeyValueStore::put`] calls are counted
/// and recorded.
pub const PUT_OPERATION: &str = "KeyValueStore.put";

// == Key-Value Store ==
/// Store handle. Cloning is cheap and clones share the same backend.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    /// Byte-level storage
    backend: Arc<dyn Backend>,
    /// Counters and call histories, kept in the same backend
    calls: CallLog,
}

impl KeyValueStore {
    // == Constructor ==
    /// Creates a store on top of `backend`.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let calls = CallLog::new(backend.clone());
        Self { backend, calls }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Counters and histories of instrumented operations.
    pub fn calls(&self) -> &CallLog {
        &self.calls
    }

    // == Put ==
    /// Stores `value` under a freshly generated key and returns the key.
    ///
    /// Keys are random v4 UUIDs; on the off chance one is already live the
    /// store draws another. Every call is counted and recorded under
    /// [`PUT_OPERATION`].
    pub async fn put(&self, value: impl Into<Value>) -> Result<String> {
        let value = value.into();
        self.calls.count_call(PUT_OPERATION).await?;

        let raw = value.to_bytes();
        let key = loop {
            let candidate = Uuid::new_v4().to_string();
            if self.backend.set_nx(&candidate, raw.clone(), None).await? {
                break candidate;
            }
            warn!("Generated key {} already in use, retrying", candidate);
        };

        self.calls
            .append(PUT_OPERATION, vec![value.to_string()], key.clone(), false)
            .await?;
        debug!("Stored {} bytes under {}", raw.len(), key);
        Ok(key)
    }

    // == Set With Expiry ==
    /// Stores `value` under a caller-chosen key, expiring after `ttl`.
    pub async fn set_ex(&self, key: &str, value: impl Into<Value>, ttl: Duration) -> Result<()> {
        let value: Value = value.into();
        self.backend.set(key, value.to_bytes(), Some(ttl)).await
    }

    // == Get ==
    /// Retrieves a value and converts it with `decode`.
    ///
    /// Returns `Ok(None)` if the key is missing or expired. A decode failure
    /// is returned as an error and leaves the entry in place.
    pub async fn get<T, F>(&self, key: &str, decode: F) -> Result<Option<T>>
    where
        F: FnOnce(&[u8]) -> Result<T>,
    {
        match self.backend.get(key).await? {
            Some(raw) => decode(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Retrieves the raw stored bytes.
    pub async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.get(key, decode_bytes).await
    }

    /// Retrieves a value as UTF-8 text.
    pub async fn get_as_string(&self, key: &str) -> Result<Option<String>> {
        self.get(key, decode_string).await
    }

    /// Retrieves a value as a base-10 integer.
    pub async fn get_as_integer(&self, key: &str) -> Result<Option<i64>> {
        self.get(key, decode_integer).await
    }

    /// Retrieves a value as a float.
    pub async fn get_as_float(&self, key: &str) -> Result<Option<f64>> {
        self.get(key, decode_float).await
    }

    // == Keys ==
    /// Live keys matching a glob pattern, sorted.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        self.backend.keys(pattern).await
    }

    // == Clear All ==
    /// Removes every entry, including counters and call histories.
    pub async fn clear_all(&self) -> Result<()> {
        self.backend.flush().await?;
        info!("Store cleared");
        Ok(())
    }

    // == Instrumentation ==
    /// Number of calls counted for `operation`.
    pub async fn call_count(&self, operation: &str) -> Result<i64> {
        self.calls.call_count(operation).await
    }

    /// Recorded calls to `operation`, oldest first.
    pub async fn history_of(&self, operation: &str) -> Result<Vec<CallRecord>> {
        self.calls.history_of(operation).await
    }

    /// Replay lines for `operation`.
    pub async fn replay(&self, operation: &str) -> Result<Vec<String>> {
        self.calls.replay(operation).await
    }
}
