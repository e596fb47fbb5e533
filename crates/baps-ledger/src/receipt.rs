use std::fmt;

use chrono::{DateTime, Utc};

/// An event attached to an invocation.
///
/// Events are opaque to the ledger: a name plus a payload that off-core
/// consumers decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEvent {
    pub name: String,
    pub payload: Vec<u8>,
}

impl LedgerEvent {
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// An event in the committed log, tagged with its transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommittedEvent {
    /// Sequence number of the transaction that emitted the event.
    pub seq: u64,
    pub event: LedgerEvent,
}

/// Proof of a committed invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    /// Transaction sequence number (1-based, monotonic).
    pub seq: u64,
    /// BLAKE3 digest over the sequence number, write set, and events.
    pub tx_hash: [u8; 32],
    pub timestamp: DateTime<Utc>,
    /// Keys written, in key order.
    pub writes: Vec<String>,
    /// Events emitted, in emission order.
    pub events: Vec<LedgerEvent>,
}

impl TxReceipt {
    /// Short hex representation of the hash (first 8 hex chars).
    pub fn short_hash(&self) -> String {
        hex::encode(&self.tx_hash[..4])
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.tx_hash)
    }

    /// Returns `true` if the invocation neither wrote nor emitted anything.
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty() && self.events.is_empty()
    }
}

impl fmt::Display for TxReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx#{} [{}]", self.seq, self.short_hash())
    }
}
