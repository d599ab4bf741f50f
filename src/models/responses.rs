//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::instrument::{CacheStats, CallRecord};
use crate::store::Value;

/// Response body for POST /store
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// The generated key
    pub key: String,
}

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The decoded value
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for GET /page
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub url: String,
    pub content: String,
    /// Number of times this URL has been requested, this call included
    pub access_count: i64,
}

/// Response body for GET /count
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub url: String,
    pub access_count: i64,
}

/// Response body for GET /history/:op
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub operation: String,
    pub records: Vec<CallRecord>,
}

/// Response body for GET /replay/:op
#[derive(Debug, Clone, Serialize)]
pub struct ReplayResponse {
    pub lines: Vec<String>,
}

/// Response body for GET /keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub keys: Vec<String>,
}

/// Response body for DELETE /flush
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    /// Success message
    pub message: String,
}

impl FlushResponse {
    pub fn new() -> Self {
        Self {
            message: "All entries removed".to_string(),
        }
    }
}

impl Default for FlushResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Page requests answered from cache
    pub hits: u64,
    /// Page requests that went to the network
    pub misses: u64,
    /// Network fetches that failed
    pub failures: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            failures: stats.failures,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a healthy response with the current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
