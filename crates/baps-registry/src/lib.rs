//! Contract registry for BAPS.
//!
//! The [`ContractRegistry`] owns contract records stored under
//! `contract~{contractId}` and enforces their status lifecycle:
//!
//! ```text
//! draft ──▶ on_chain ──▶ approved
//!               │
//!               └──────▶ rejected
//! ```
//!
//! Registration always lands a record in `on_chain`. Consensus reached in the
//! vote ledger does not move a contract by itself; the orchestrator issues a
//! separate `UpdateStatus` invocation.

pub mod config;
pub mod error;
pub mod registry;
pub mod transitions;

pub use config::{RegistryConfig, Reregistration};
pub use error::{RegistryError, RegistryResult};
pub use registry::ContractRegistry;
pub use transitions::{can_transition, successors};
