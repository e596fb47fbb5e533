use baps_ledger::LedgerError;
use baps_types::TypeError;
use thiserror::Error;

/// Errors from vote operations.
#[derive(Debug, Error)]
pub enum VoteError {
    /// The vote payload or a query argument is malformed.
    #[error("decode error: {0}")]
    Decode(#[from] TypeError),

    /// No vote is stored for this voter on this contract.
    #[error("no vote from {voter_org} on contract {contract_id}")]
    NotFound {
        contract_id: String,
        voter_org: String,
    },

    /// The quorum configuration cannot be evaluated.
    #[error("invalid quorum configuration: {0}")]
    InvalidConfig(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Result alias for vote operations.
pub type VoteResult<T> = Result<T, VoteError>;
