//! The [`LedgerStub`] trait: the capability handed to every core operation.

use chrono::{DateTime, Utc};

use crate::error::LedgerResult;
use crate::receipt::LedgerEvent;
use crate::scan::StateScan;

/// Per-invocation access to the shared keyed store.
///
/// A stub is scoped to a single invocation. Implementations must satisfy:
/// - Reads observe committed state; writes made during the invocation are
///   buffered and not visible to its reads.
/// - Writes and emitted events are committed together when the invocation
///   succeeds and discarded when it fails.
/// - An invocation whose reads were invalidated by a concurrent commit is
///   rejected as a whole.
/// - Scans return entries in lexicographic key order.
pub trait LedgerStub {
    /// Read the value stored at `key`.
    ///
    /// Returns `Ok(None)` if no value exists.
    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    /// Buffer a write of `value` at `key`, replacing any existing value.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()>;

    /// Open a scan over every key starting with `prefix`.
    ///
    /// The returned [`StateScan`] holds a lease that is released when it is
    /// closed or dropped.
    fn scan_prefix(&self, prefix: &str) -> LedgerResult<StateScan>;

    /// Attach an event to the invocation.
    fn emit_event(&mut self, event: LedgerEvent) -> LedgerResult<()>;

    /// Timestamp of the invocation, identical for every call within it.
    fn tx_timestamp(&self) -> DateTime<Utc>;
}
