//! kvcache - An in-process key-value cache
//!
//! Provides a typed key-value store with TTL expiration, plus an instrumented
//! cache that counts accesses, caches fetched resources for a limited time and
//! records a replayable call history.

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod instrument;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{CacheError, Result};
pub use fetch::{FnFetcher, HttpFetcher, ResourceFetcher};
pub use instrument::{CallRecord, InstrumentedCache};
pub use store::{Backend, KeyValueStore, MemoryBackend, Value};
pub use tasks::spawn_cleanup_task;
