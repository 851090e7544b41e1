//! Error types for admission operations.

use thiserror::Error;

/// Errors produced by the admission core.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// The record's `kind` tag is missing or not one of the six known kinds.
    #[error("unrecognized job kind: {0}")]
    UnrecognizedKind(String),
    /// The kind is known but a field its policy needs is missing or mistyped.
    #[error("malformed {kind} record: {reason}")]
    MalformedJob {
        /// Kind tag of the offending record.
        kind: String,
        /// Decoder message.
        reason: String,
    },
    /// Configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
