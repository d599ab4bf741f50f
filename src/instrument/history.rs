//! Call History Module
//!
//! Call counters and append-only call logs kept in a [`Backend`].
//!
//! Layout in the backend:
//! - `{operation}`: integer call counter
//! - `{operation}:history`: list of JSON-encoded calls, one per invocation

use std::sync::Arc;

use tracing::debug;

use crate::error::{CacheError, Result};
use crate::instrument::record::{CallRecord, StoredCall};
use crate::store::{decode_integer, Backend};

// == Call Log ==
/// Counters and call histories for named operations.
#[derive(Debug, Clone)]
pub struct CallLog {
    backend: Arc<dyn Backend>,
}

impl CallLog {
    // == Constructor ==
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    fn history_key(operation: &str) -> String {
        format!("{}:history", operation)
    }

    // == Counters ==
    /// Atomically increments the counter stored under `key`.
    pub async fn increment(&self, key: &str) -> Result<i64> {
        self.backend.incr(key).await
    }

    /// Reads the counter stored under `key`, 0 if it was never incremented.
    pub async fn counter(&self, key: &str) -> Result<i64> {
        match self.backend.get(key).await? {
            Some(raw) => decode_integer(&raw),
            None => Ok(0),
        }
    }

    /// Counts one call to `operation`.
    pub async fn count_call(&self, operation: &str) -> Result<i64> {
        self.increment(operation).await
    }

    /// Number of calls counted for `operation`.
    pub async fn call_count(&self, operation: &str) -> Result<i64> {
        self.counter(operation).await
    }

    // == Append ==
    /// Appends one call to the history of `operation`.
    ///
    /// The sequence number is the record's position after the append, so
    /// concurrent callers are ordered by the time they reach this point.
    pub async fn append(
        &self,
        operation: &str,
        inputs: Vec<String>,
        output: String,
        failed: bool,
    ) -> Result<CallRecord> {
        let stored = StoredCall {
            inputs,
            output,
            failed,
        };
        let payload = serde_json::to_vec(&stored)
            .map_err(|e| CacheError::Decode(format!("cannot encode call record: {}", e)))?;

        let len = self
            .backend
            .rpush(&Self::history_key(operation), payload)
            .await?;
        debug!("Recorded call #{} to {}", len, operation);

        Ok(stored.into_record(operation, len as u64))
    }

    // == History ==
    /// All recorded calls to `operation`, oldest first.
    pub async fn history_of(&self, operation: &str) -> Result<Vec<CallRecord>> {
        let raw = self
            .backend
            .lrange(&Self::history_key(operation), 0, -1)
            .await?;

        raw.iter()
            .enumerate()
            .map(|(index, payload)| -> Result<CallRecord> {
                let stored: StoredCall = serde_json::from_slice(payload).map_err(|e| {
                    CacheError::Decode(format!("corrupt call record for {}: {}", operation, e))
                })?;
                Ok(stored.into_record(operation, index as u64 + 1))
            })
            .collect()
    }

    // == Replay ==
    /// Human-readable history: a count line followed by one line per call.
    ///
    /// The count is the number of history records, so it always agrees with
    /// the lines that follow it.
    pub async fn replay(&self, operation: &str) -> Result<Vec<String>> {
        let history = self.history_of(operation).await?;

        let mut lines = Vec::with_capacity(history.len() + 1);
        lines.push(format!("{} was called {} times", operation, history.len()));
        lines.extend(history.iter().map(CallRecord::replay_line));
        Ok(lines)
    }
}
