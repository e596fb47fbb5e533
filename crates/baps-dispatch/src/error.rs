use std::fmt;

use baps_ledger::LedgerError;
use baps_notify::NotifyError;
use baps_registry::RegistryError;
use baps_types::TypeError;
use baps_votes::VoteError;
use thiserror::Error;

/// Errors returned to the invoking client.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("bad arguments to {function}: {reason}")]
    BadArguments {
        function: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Votes(#[from] VoteError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("response encoding failed: {0}")]
    Encode(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Error category seen by clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed payload or argument.
    Decode,
    /// A lookup found no record.
    NotFound,
    /// The Ledger Service failed a read, write, scan or event.
    Ledger,
    /// The requested status change or registration is not allowed.
    IllegalTransition,
    /// Encoding failure or misconfiguration inside the core.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decode => "DecodeError",
            Self::NotFound => "NotFoundError",
            Self::Ledger => "LedgerError",
            Self::IllegalTransition => "IllegalTransitionError",
            Self::Internal => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn type_kind(e: &TypeError) -> ErrorKind {
    if e.is_decode() {
        ErrorKind::Decode
    } else {
        ErrorKind::Internal
    }
}

impl DispatchError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownFunction(_) | Self::BadArguments { .. } => ErrorKind::Decode,
            Self::Votes(e) => match e {
                VoteError::Decode(t) => type_kind(t),
                VoteError::NotFound { .. } => ErrorKind::NotFound,
                VoteError::InvalidConfig(_) => ErrorKind::Internal,
                VoteError::Ledger(_) => ErrorKind::Ledger,
            },
            Self::Registry(e) => match e {
                RegistryError::Decode(t) => type_kind(t),
                RegistryError::NotFound { .. } => ErrorKind::NotFound,
                RegistryError::IllegalTransition { .. } | RegistryError::AlreadyRegistered { .. } => {
                    ErrorKind::IllegalTransition
                }
                RegistryError::Ledger(_) => ErrorKind::Ledger,
            },
            Self::Notify(e) => match e {
                NotifyError::Decode(t) => type_kind(t),
                NotifyError::Ledger(_) => ErrorKind::Ledger,
            },
            Self::Ledger(_) => ErrorKind::Ledger,
            Self::Encode(_) => ErrorKind::Internal,
        }
    }
}
