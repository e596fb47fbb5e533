use thiserror::Error;

/// Errors produced while decoding, validating, or encoding payloads.
///
/// Every variant except [`TypeError::Encode`] means the caller supplied
/// malformed input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("malformed {what} payload: {reason}")]
    Malformed { what: &'static str, reason: String },

    #[error("invalid {field} {value:?}: {reason}")]
    InvalidKeySegment {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("contract id {0:?} collides with a reserved key namespace")]
    ReservedNamespace(String),

    #[error("unknown contract status: {0:?}")]
    UnknownStatus(String),

    #[error("unknown vote decision: {0:?}")]
    UnknownDecision(String),

    #[error("encoding error: {0}")]
    Encode(String),
}

impl TypeError {
    /// Returns `true` if the error was caused by caller input rather than by
    /// an encoding failure.
    pub fn is_decode(&self) -> bool {
        !matches!(self, Self::Encode(_))
    }
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
