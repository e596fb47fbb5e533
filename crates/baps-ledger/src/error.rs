/// Errors raised by the Ledger Service.
///
/// The core never retries or rewrites these; they reach the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("read of {key:?} failed: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("write of {key:?} failed: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("scan of prefix {prefix:?} failed: {reason}")]
    ScanFailed { prefix: String, reason: String },

    #[error("event {name:?} rejected: {reason}")]
    EventRejected { name: String, reason: String },

    /// A key or scanned range read by the invocation was written by a
    /// concurrent commit.
    #[error("read of {key:?} invalidated by a concurrent commit")]
    Conflict { key: String },

    #[error("ledger lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
