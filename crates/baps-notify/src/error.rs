use baps_ledger::LedgerError;
use baps_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("decode error: {0}")]
    Decode(#[from] TypeError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
