//! Ledger Service boundary for BAPS.
//!
//! The approval core never owns state. Every operation runs inside one
//! invocation of an external, transactional Ledger Service and talks to it
//! only through the [`LedgerStub`] capability: point reads, buffered writes,
//! prefix scans, and event emission. The service commits the writes and
//! events of an invocation as a unit, or nothing at all.
//!
//! # Modules
//!
//! - [`error`]: [`LedgerError`], propagated verbatim to clients
//! - [`traits`]: the [`LedgerStub`] capability trait
//! - [`scan`]: [`StateScan`], the scoped prefix-scan iterator
//! - [`receipt`]: [`LedgerEvent`], [`TxReceipt`], [`CommittedEvent`]
//! - [`memory`]: [`InMemoryLedger`], a complete in-process Ledger Service
//!   for tests and embedding

pub mod error;
pub mod memory;
pub mod receipt;
pub mod scan;
pub mod traits;

pub use error::{LedgerError, LedgerResult};
pub use memory::{Faults, InMemoryLedger, Invocation, Invoked};
pub use receipt::{CommittedEvent, LedgerEvent, TxReceipt};
pub use scan::{KeyValue, ScanLease, StateScan};
pub use traits::LedgerStub;
