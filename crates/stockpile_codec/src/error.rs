//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input could not be parsed as JSON at all.
    #[error("malformed snapshot: {message}")]
    Malformed {
        /// Description of the parse error.
        message: String,
    },

    /// The input parsed but does not match the snapshot schema or violates
    /// an item invariant.
    #[error("schema mismatch: {message}")]
    SchemaMismatch {
        /// Description of the schema violation.
        message: String,
    },

    /// Failed to serialize records to JSON.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },
}

impl CodecError {
    /// Creates a malformed input error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a schema mismatch error.
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    /// Creates an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Returns true if the input was not parseable at all.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    /// Returns true if the input parsed but violated the schema.
    #[must_use]
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::SchemaMismatch { .. })
    }
}
