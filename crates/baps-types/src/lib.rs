//! Foundation types for BAPS, the multi-party contract approval core.
//!
//! Every other BAPS crate depends on `baps-types`. The types here are the
//! JSON payloads exchanged with the Ledger Service and its clients, plus the
//! composite keys under which they are stored.
//!
//! # Key Types
//!
//! - [`Vote`]: one organization's decision on a contract at an approval level
//! - [`ContractRecord`]: the registered contract and its [`ContractStatus`]
//! - [`ContractSubmission`]: registration input (caller status is ignored)
//! - [`Subscriber`]: a bank subscribed to approvals for a country
//! - [`ApprovalNotice`]: payload of the `ContractApproved` event
//! - [`keys`]: composite key builders and key segment validation

pub mod contract;
pub mod error;
pub mod event;
pub mod keys;
pub mod subscriber;
pub mod vote;

pub use contract::{ContractRecord, ContractStatus, ContractSubmission};
pub use error::{TypeError, TypeResult};
pub use event::{ApprovalNotice, EventKind};
pub use subscriber::Subscriber;
pub use vote::{Vote, VoteDecision};
