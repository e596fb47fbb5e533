//! The contract status transition table.
//!
//! Registration always writes `on_chain`, so `draft` records only exist when
//! they were written by another program sharing the ledger. The table still
//! lets them enter the lifecycle.

use baps_types::ContractStatus;

/// Statuses reachable in one step from `from`.
pub fn successors(from: ContractStatus) -> &'static [ContractStatus] {
    match from {
        ContractStatus::Draft => &[ContractStatus::OnChain],
        ContractStatus::OnChain => &[ContractStatus::Approved, ContractStatus::Rejected],
        ContractStatus::Approved | ContractStatus::Rejected => &[],
    }
}

/// Returns `true` if a record in `from` may move to `to`.
///
/// Same-state changes are not transitions and are refused.
pub fn can_transition(from: ContractStatus, to: ContractStatus) -> bool {
    successors(from).contains(&to)
}
