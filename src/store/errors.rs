//! Store error types
//!
//! Error codes:
//! - DOCGATE_STORE_NOT_FOUND
//! - DOCGATE_STORE_CONFLICT
//! - DOCGATE_STORE_IO_ERROR
//! - DOCGATE_STORE_SERIALIZATION
//! - DOCGATE_STORE_FAILED

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a document store.
///
/// `NotFound` is the only kind callers are expected to branch on; everything
/// else (revision conflicts included) is a generic failure from the gateway's
/// point of view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No live document under the requested id
    #[error("missing document: {0}")]
    NotFound(String),

    /// Revision token did not match the latest revision
    #[error("document update conflict: {0}")]
    Conflict(String),

    /// Backing file could not be read or written
    #[error("I/O error: {0}")]
    Io(String),

    /// Persisted state could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Any other engine failure
    #[error("store failure: {0}")]
    Other(String),
}

impl StoreError {
    /// Create a not found error for a document id
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create a conflict error for a document id
    pub fn conflict(id: impl Into<String>) -> Self {
        Self::Conflict(id.into())
    }

    /// Create a generic failure
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "DOCGATE_STORE_NOT_FOUND",
            Self::Conflict(_) => "DOCGATE_STORE_CONFLICT",
            Self::Io(_) => "DOCGATE_STORE_IO_ERROR",
            Self::Serialization(_) => "DOCGATE_STORE_SERIALIZATION",
            Self::Other(_) => "DOCGATE_STORE_FAILED",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(StoreError::not_found("1").code(), "DOCGATE_STORE_NOT_FOUND");
        assert_eq!(StoreError::conflict("1").code(), "DOCGATE_STORE_CONFLICT");
    }

    #[test]
    fn test_kind_predicates() {
        assert!(StoreError::not_found("x").is_not_found());
        assert!(!StoreError::conflict("x").is_not_found());
        assert!(StoreError::conflict("x").is_conflict());
    }

    #[test]
    fn test_io_conversion() {
        let err: StoreError = io::Error::new(io::ErrorKind::Other, "disk gone").into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.to_string().contains("disk gone"));
    }
}
