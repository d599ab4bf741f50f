//! Value Module
//!
//! The closed set of value types accepted at the store boundary, and the
//! fixed decoders used to read them back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Value ==
/// A value accepted by [`KeyValueStore::put`](super::KeyValueStore::put).
///
/// Every variant is stored as bytes: strings as UTF-8, bytes unchanged,
/// numbers as their decimal text.
///
/// Deserialization goes through [`serde_json::Value`] so that a JSON number
/// becomes `Int` when it fits in an `i64`, `Float` only when it was written
/// as a float, and an error otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, try_from = "serde_json::Value")]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Encodes the value into the bytes written to the backend.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Int(n) => n.to_string().into_bytes(),
            Value::Float(f) => f.to_string().into_bytes(),
            Value::Str(s) => s.as_bytes().to_vec(),
            Value::Bytes(b) => b.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = CacheError;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::String(s) => Ok(Value::Str(s)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if n.is_f64() {
                    n.as_f64().map(Value::Float).ok_or_else(|| {
                        CacheError::InvalidRequest(format!("number {} is not representable", n))
                    })
                } else {
                    Err(CacheError::InvalidRequest(format!(
                        "integer {} is out of range for a signed 64-bit value",
                        n
                    )))
                }
            }
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|b| u8::try_from(b).ok())
                        .ok_or_else(|| {
                            CacheError::InvalidRequest(format!("{} is not a byte", item))
                        })
                })
                .collect::<Result<Vec<u8>>>()
                .map(Value::Bytes),
            other => Err(CacheError::InvalidRequest(format!(
                "expected a string, a number or a byte array, got {}",
                other
            ))),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

// == Decoders ==
/// Returns the raw bytes unchanged.
pub fn decode_bytes(raw: &[u8]) -> Result<Vec<u8>> {
    Ok(raw.to_vec())
}

/// Decodes UTF-8 text.
pub fn decode_string(raw: &[u8]) -> Result<String> {
    String::from_utf8(raw.to_vec())
        .map_err(|e| CacheError::Decode(format!("value is not valid UTF-8: {}", e)))
}

/// Decodes a base-10 signed integer.
pub fn decode_integer(raw: &[u8]) -> Result<i64> {
    let text = decode_string(raw)?;
    text.trim()
        .parse::<i64>()
        .map_err(|_| CacheError::Decode(format!("value {:?} is not an integer", text)))
}

/// Decodes a floating point number.
pub fn decode_float(raw: &[u8]) -> Result<f64> {
    let text = decode_string(raw)?;
    text.trim()
        .parse::<f64>()
        .map_err(|_| CacheError::Decode(format!("value {:?} is not a float", text)))
}
