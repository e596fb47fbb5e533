//! Vote ledger for BAPS.
//!
//! Organizations cast votes on a contract at an approval level; the
//! [`VoteLedger`] stores one current vote per (contract, voter) and decides
//! whether a level has reached quorum.
//!
//! ```rust
//! use baps_ledger::InMemoryLedger;
//! use baps_votes::{ConsensusOutcome, QuorumConfig, VoteError, VoteLedger};
//!
//! let ledger = InMemoryLedger::new();
//! let votes = VoteLedger::new(QuorumConfig::default()).unwrap();
//!
//! for voter in ["BankA", "BankB"] {
//!     let payload = format!(
//!         r#"{{"contractId":"C1","voterOrg":"{voter}","level":1,"decision":"approved"}}"#
//!     );
//!     ledger
//!         .invoke(|stub| votes.submit_vote(stub, payload.as_bytes()))
//!         .unwrap();
//! }
//!
//! let outcome = ledger
//!     .evaluate(|stub| -> Result<_, VoteError> { votes.check_consensus(stub, "C1", 1) })
//!     .unwrap();
//! assert_eq!(outcome, ConsensusOutcome::Approved);
//! ```
//!
//! The vote ledger never touches contract records: moving a contract to
//! `approved` after consensus is a separate invocation issued by the caller.

pub mod config;
pub mod error;
pub mod ledger;
pub mod tally;

pub use config::{QuorumConfig, QuorumRule};
pub use error::{VoteError, VoteResult};
pub use ledger::VoteLedger;
pub use tally::{ConsensusOutcome, Tally};
