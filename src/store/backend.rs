//! Backend Module
//!
//! The byte-oriented primitives every store substrate must provide. The
//! store, the access counters and the call-history log are all built on
//! these operations and nothing else.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// == Backend Trait ==
/// Key/value substrate with string, counter and list primitives.
///
/// Every method is atomic with respect to the key it touches. Expired
/// entries behave exactly like missing ones.
#[async_trait]
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// `SET key value [EX ttl]`: stores bytes, replacing any previous entry.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// `SET key value NX [EX ttl]`: stores only if no live entry exists.
    ///
    /// Returns true if the value was written.
    async fn set_nx(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<bool>;

    /// `GET key`: returns the bytes of a live string entry.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// `INCR key`: increments an integer entry, starting from 0 if absent.
    ///
    /// Returns the value after the increment.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// `RPUSH key value`: appends to a list, creating it if absent.
    ///
    /// Returns the list length after the push.
    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// `LRANGE key start stop`: inclusive range, negative indices count
    /// from the end. A missing key is an empty list.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// `KEYS pattern`: live keys matching a glob pattern, sorted.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// `FLUSHDB`: removes every entry.
    async fn flush(&self) -> Result<()>;

    /// Physically removes expired entries, returning how many were dropped.
    async fn purge_expired(&self) -> Result<usize>;
}
