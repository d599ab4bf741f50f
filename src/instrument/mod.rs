//! Instrument Module
//!
//! Call counting, call history and the TTL-bounded result cache that wraps
//! a [`ResourceFetcher`](crate::fetch::ResourceFetcher).

mod cache;
mod history;
mod record;
mod stats;

pub use cache::{InstrumentedCache, DEFAULT_TTL};
pub use history::CallLog;
pub use record::CallRecord;
pub use stats::CacheStats;
