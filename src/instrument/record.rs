//! Call Record Module
//!
//! One immutable entry of an operation's call history.

use serde::{Deserialize, Serialize};

// == Call Record ==
/// A single recorded invocation of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Operation the call was made to
    pub method: String,
    /// Argument representations, in call order
    pub inputs: Vec<String>,
    /// Output representation, or the failure description
    pub output: String,
    /// True if the operation failed
    pub failed: bool,
    /// Position in the operation's history, starting at 1
    pub sequence: u64,
}

impl CallRecord {
    /// Formats the record as a replay line: `op(*(inputs)) -> output`.
    ///
    /// Inputs are already rendered representations and are joined as-is.
    pub fn replay_line(&self) -> String {
        format!(
            "{}(*({})) -> {}",
            self.method,
            self.inputs.join(", "),
            self.output
        )
    }
}

// == Stored Call ==
/// The part of a record written to the backend. Method and sequence are
/// implied by the list key and the position in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredCall {
    pub inputs: Vec<String>,
    pub output: String,
    #[serde(default)]
    pub failed: bool,
}

impl StoredCall {
    pub fn into_record(self, method: &str, sequence: u64) -> CallRecord {
        CallRecord {
            method: method.to_string(),
            inputs: self.inputs,
            output: self.output,
            failed: self.failed,
            sequence,
        }
    }
}
