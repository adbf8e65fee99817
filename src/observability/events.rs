//! Observable gateway events
//!
//! Every log line names one of these. Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded from disk
    ConfigLoaded,
    /// Gateway ready to serve
    GatewayOpen,

    // Indexes
    /// Index declaration begins
    IndexEnsureBegin,
    /// One index declared
    IndexDeclared,
    /// All indexes declared
    IndexEnsureComplete,

    // Sequence
    /// Counter document created on first use
    SequenceCreated,
    /// Counter incremented and persisted
    SequenceAllocated,
    /// Revision conflict on the counter, retrying
    SequenceConflictRetry,

    // Operations
    /// Gateway operation succeeded
    OperationComplete,
    /// Gateway operation failed and was replaced by its fallback
    OperationContained,
    /// Gateway operation failed and the failure was returned to the caller
    OperationFailed,
    /// Store attached a warning to a query result
    StoreWarning,
    /// Query result document that does not decode as a record
    RecordSkipped,

    // File-backed store
    /// Store state read from disk
    StoreLoaded,
    /// Store state written to disk
    StorePersisted,
    /// Disk write failed, in-memory mutation undone
    StoreRolledBack,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::GatewayOpen => "GATEWAY_OPEN",

            Event::IndexEnsureBegin => "INDEX_ENSURE_BEGIN",
            Event::IndexDeclared => "INDEX_DECLARED",
            Event::IndexEnsureComplete => "INDEX_ENSURE_COMPLETE",

            Event::SequenceCreated => "SEQUENCE_CREATED",
            Event::SequenceAllocated => "SEQUENCE_ALLOCATED",
            Event::SequenceConflictRetry => "SEQUENCE_CONFLICT_RETRY",

            Event::OperationComplete => "OPERATION_COMPLETE",
            Event::OperationContained => "OPERATION_CONTAINED",
            Event::OperationFailed => "OPERATION_FAILED",
            Event::StoreWarning => "STORE_WARNING",
            Event::RecordSkipped => "RECORD_SKIPPED",

            Event::StoreLoaded => "STORE_LOADED",
            Event::StorePersisted => "STORE_PERSISTED",
            Event::StoreRolledBack => "STORE_ROLLED_BACK",
        }
    }

    /// Severity used by `Logger::event`
    pub fn severity(&self) -> Severity {
        match self {
            Event::OperationContained | Event::OperationFailed => Severity::Error,
            Event::StoreWarning
            | Event::SequenceConflictRetry
            | Event::RecordSkipped
            | Event::StoreRolledBack => Severity::Warn,
            Event::SequenceAllocated
            | Event::OperationComplete
            | Event::IndexDeclared
            | Event::StorePersisted => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_are_errors() {
        assert_eq!(Event::OperationContained.severity(), Severity::Error);
        assert_eq!(Event::OperationFailed.severity(), Severity::Error);
    }

    #[test]
    fn test_event_names_unique() {
        let all = [
            Event::ConfigLoaded,
            Event::GatewayOpen,
            Event::IndexEnsureBegin,
            Event::IndexDeclared,
            Event::IndexEnsureComplete,
            Event::SequenceCreated,
            Event::SequenceAllocated,
            Event::SequenceConflictRetry,
            Event::OperationComplete,
            Event::OperationContained,
            Event::OperationFailed,
            Event::StoreWarning,
            Event::RecordSkipped,
            Event::StoreLoaded,
            Event::StorePersisted,
            Event::StoreRolledBack,
        ];
        let names: std::collections::HashSet<_> = all.iter().map(|e| e.as_str()).collect();
        assert_eq!(names.len(), all.len());
    }
}
