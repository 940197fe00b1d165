//! Error types for cadence-engine operations.
//!
//! Only the rule parse/validate path can fail. Occurrence expansion itself is
//! a total function: malformed instants or windows produce an empty result,
//! never an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CadenceError {
    /// The serialized rule was not valid JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The rule was structurally valid JSON but violated a bounds or shape
    /// constraint (interval out of range, empty weekday set, ...).
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),
}

/// Convenience alias used throughout cadence-engine.
pub type Result<T> = std::result::Result<T, CadenceError>;
