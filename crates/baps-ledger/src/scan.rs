use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::LedgerResult;

/// One entry produced by a prefix scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Registration of an open scan with the ledger that produced it.
///
/// Acquiring a lease increments the ledger's open-scan counter; dropping it
/// decrements the counter again.
#[derive(Debug)]
pub struct ScanLease {
    open: Arc<AtomicUsize>,
}

impl ScanLease {
    pub fn acquire(open: &Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        Self {
            open: Arc::clone(open),
        }
    }
}

impl Drop for ScanLease {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Iterator over the entries under a key prefix.
///
/// The scan is a scoped resource: its lease is released by [`close`] or,
/// on every other exit path, by `Drop`. A closed scan yields no further
/// entries.
///
/// [`close`]: StateScan::close
#[derive(Debug)]
pub struct StateScan {
    prefix: String,
    entries: std::vec::IntoIter<LedgerResult<KeyValue>>,
    lease: Option<ScanLease>,
}

impl StateScan {
    pub fn new(
        prefix: impl Into<String>,
        entries: Vec<LedgerResult<KeyValue>>,
        lease: Option<ScanLease>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            entries: entries.into_iter(),
            lease,
        }
    }

    /// The prefix this scan covers.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `true` until the scan is closed.
    pub fn is_open(&self) -> bool {
        self.lease.is_some()
    }

    /// Release the scan explicitly.
    pub fn close(mut self) {
        self.lease.take();
    }
}

impl Iterator for StateScan {
    type Item = LedgerResult<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lease.as_ref()?;
        self.entries.next()
    }
}
