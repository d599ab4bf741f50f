//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the store, the instrumented cache and the API.
///
/// A missing key is not an error: lookups return `Option::None` for it.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backing store is unreachable or has been shut down
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Stored bytes could not be converted to the requested type
    #[error("Decode error: {0}")]
    Decode(String),

    /// The wrapped resource operation failed
    #[error("Operation {operation} failed for {identity}: {source}")]
    OperationFailed {
        /// Name of the wrapped operation
        operation: String,
        /// Resource identity the operation was called with
        identity: String,
        /// Underlying failure
        #[source]
        source: anyhow::Error,
    },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::OperationFailed { .. } => StatusCode::BAD_GATEWAY,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
