//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::error::Result;
use crate::store::Value;

/// Request body for the store operation (POST /store)
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    /// The value to store: a string, an integer or a float, kept as raw
    /// JSON until [`StoreRequest::into_value`] checks it
    pub value: serde_json::Value,
}

impl StoreRequest {
    /// Converts the body into a storable value.
    ///
    /// Integers outside the `i64` range are rejected with
    /// `CacheError::InvalidRequest` instead of being rounded to a float.
    pub fn into_value(self) -> Result<Value> {
        Value::try_from(self.value)
    }
}

/// Decoder selected by the `as` query parameter of GET /get/:key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeAs {
    #[default]
    String,
    Integer,
    Float,
}

/// Query string for GET /get/:key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetQuery {
    #[serde(default, rename = "as")]
    pub decode_as: DecodeAs,
}

/// Query string for GET /page and GET /count
#[derive(Debug, Clone, Deserialize)]
pub struct UrlQuery {
    pub url: String,
}

impl UrlQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("url cannot be empty".to_string());
        }
        None
    }
}

/// Query string for GET /keys
#[derive(Debug, Clone, Deserialize)]
pub struct KeysQuery {
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_pattern() -> String {
    "*".to_string()
}
