use baps_ledger::LedgerError;
use baps_types::{ContractStatus, TypeError};
use thiserror::Error;

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("decode error: {0}")]
    Decode(#[from] TypeError),

    #[error("contract not found: {contract_id}")]
    NotFound { contract_id: String },

    #[error("illegal transition for contract {contract_id}: {from} -> {to}")]
    IllegalTransition {
        contract_id: String,
        from: ContractStatus,
        to: ContractStatus,
    },

    /// Returned instead of overwriting when re-registration is rejected.
    #[error("contract already registered: {contract_id}")]
    AlreadyRegistered { contract_id: String },

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
