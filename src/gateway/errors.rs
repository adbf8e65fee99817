//! Gateway error types
//!
//! Store failures pass through unchanged inside `GatewayError::Store`; the
//! remaining variants are raised by the gateway itself.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Failure reported by the document store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored document could not be decoded as the expected shape
    #[error("document {id} is malformed: {reason}")]
    Schema { id: String, reason: String },

    /// Search term is not a valid regular expression
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    /// The counter cannot be incremented further
    #[error("sequence counter exhausted")]
    SequenceExhausted,

    /// Counter writes kept conflicting past the retry budget
    #[error("sequence allocation still conflicting after {0} retries")]
    SequenceContended(u32),

    /// Attempt to overwrite or delete the sequence counter through the record API
    #[error("document {0} is reserved")]
    ReservedId(String),
}

impl GatewayError {
    pub fn schema(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Stable string code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Store(e) => e.code(),
            Self::Schema { .. } => "DOCGATE_SCHEMA_MISMATCH",
            Self::InvalidPattern(_) => "DOCGATE_INVALID_PATTERN",
            Self::SequenceExhausted => "DOCGATE_SEQUENCE_EXHAUSTED",
            Self::SequenceContended(_) => "DOCGATE_SEQUENCE_CONTENDED",
            Self::ReservedId(_) => "DOCGATE_RESERVED_ID",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_not_found())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_conflict())
    }
}

impl From<regex::Error> for GatewayError {
    fn from(e: regex::Error) -> Self {
        Self::InvalidPattern(e.to_string())
    }
}
