//! In-memory Ledger Service for tests and embedding.
//!
//! [`InMemoryLedger`] keeps committed state in a `BTreeMap` (lexicographic
//! key order, like the scan order of a real ledger) and an append-only event
//! log. Each call to [`InMemoryLedger::invoke`] hands the closure a fresh
//! [`Invocation`] that records what it read and buffers what it writes.
//!
//! Nothing is locked while the closure runs. At commit the read set is
//! validated against the current state: if any key or scanned range it saw
//! has since been written, the invocation fails with
//! [`LedgerError::Conflict`] and nothing is applied. Otherwise its writes and
//! events are applied together under the commit lock.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::receipt::{CommittedEvent, LedgerEvent, TxReceipt};
use crate::scan::{KeyValue, ScanLease, StateScan};
use crate::traits::LedgerStub;

/// Faults injected into invocations, for exercising error paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Faults {
    /// Every `get_state` and `scan_prefix` fails.
    pub fail_reads: bool,
    /// Every `put_state` fails.
    pub fail_writes: bool,
    /// Scans fail after yielding this many entries.
    pub fail_scan_after: Option<usize>,
}

/// The result of a committed invocation.
#[derive(Clone, Debug)]
pub struct Invoked<T> {
    pub value: T,
    pub receipt: TxReceipt,
}

/// A committed value with the version of the write that produced it.
#[derive(Clone, Debug)]
struct Versioned {
    value: Vec<u8>,
    version: u64,
}

/// An in-memory, transactional implementation of the Ledger Service.
pub struct InMemoryLedger {
    state: RwLock<BTreeMap<String, Versioned>>,
    log: RwLock<Vec<CommittedEvent>>,
    /// Sequence number of the last committed invocation.
    height: AtomicU64,
    /// Last write version handed out, by commits and `insert_raw` alike.
    versions: AtomicU64,
    /// Serializes validate-and-apply. Never held while a closure runs.
    commit_lock: Mutex<()>,
    open_scans: Arc<AtomicUsize>,
    faults: RwLock<Faults>,
    pinned_clock: RwLock<Option<DateTime<Utc>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BTreeMap::new()),
            log: RwLock::new(Vec::new()),
            height: AtomicU64::new(0),
            versions: AtomicU64::new(0),
            commit_lock: Mutex::new(()),
            open_scans: Arc::new(AtomicUsize::new(0)),
            faults: RwLock::new(Faults::default()),
            pinned_clock: RwLock::new(None),
        }
    }

    /// Run `f` as one atomic invocation and commit its effects.
    ///
    /// On success the buffered writes are applied, the events are appended
    /// to the log, and a [`TxReceipt`] is returned alongside the value. If
    /// `f` fails, or a concurrent commit invalidated what it read, nothing is
    /// applied.
    pub fn invoke<T, E, F>(&self, f: F) -> Result<Invoked<T>, E>
    where
        F: FnOnce(&mut Invocation<'_>) -> Result<T, E>,
        E: From<LedgerError>,
    {
        let mut invocation = Invocation::new(self, self.now());

        let value = match f(&mut invocation) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    discarded_writes = invocation.writes.len(),
                    discarded_events = invocation.events.len(),
                    "invocation failed; nothing committed"
                );
                return Err(e);
            }
        };

        let receipt = self.commit(invocation)?;
        Ok(Invoked { value, receipt })
    }

    /// Run `f` against the current state without committing anything.
    ///
    /// Writes and events produced by `f` are simulated and then discarded.
    pub fn evaluate<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Invocation<'_>) -> Result<T, E>,
    {
        let mut invocation = Invocation::new(self, self.now());
        let value = f(&mut invocation)?;
        debug!(
            discarded_writes = invocation.writes.len(),
            discarded_events = invocation.events.len(),
            "evaluation finished"
        );
        Ok(value)
    }

    fn commit(&self, invocation: Invocation<'_>) -> LedgerResult<TxReceipt> {
        let Invocation {
            reads,
            writes,
            events,
            timestamp,
            ..
        } = invocation;
        let reads = reads.into_inner();

        let _guard = self
            .commit_lock
            .lock()
            .map_err(|e| LedgerError::Poisoned(e.to_string()))?;
        let mut state = self
            .state
            .write()
            .map_err(|e| LedgerError::Poisoned(e.to_string()))?;

        if let Some(key) = reads.first_conflict(&state) {
            warn!(key = %key, discarded_writes = writes.len(), "read conflict; nothing committed");
            return Err(LedgerError::Conflict { key });
        }

        let seq = self.height.load(Ordering::SeqCst) + 1;
        let tx_hash = tx_digest(seq, &writes, &events);

        for (key, value) in &writes {
            state.insert(
                key.clone(),
                Versioned {
                    value: value.clone(),
                    version: self.next_version(),
                },
            );
        }
        self.log
            .write()
            .map_err(|e| LedgerError::Poisoned(e.to_string()))?
            .extend(events.iter().cloned().map(|event| CommittedEvent { seq, event }));
        self.height.store(seq, Ordering::SeqCst);
        drop(state);

        info!(
            seq,
            writes = writes.len(),
            events = events.len(),
            tx = %hex::encode(&tx_hash[..4]),
            "invocation committed"
        );

        Ok(TxReceipt {
            seq,
            tx_hash,
            timestamp,
            writes: writes.into_keys().collect(),
            events,
        })
    }

    fn next_version(&self) -> u64 {
        self.versions.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn now(&self) -> DateTime<Utc> {
        let pinned = *self.pinned_clock.read().unwrap_or_else(PoisonError::into_inner);
        pinned.unwrap_or_else(Utc::now)
    }

    fn current_faults(&self) -> LedgerResult<Faults> {
        self.faults
            .read()
            .map(|f| f.clone())
            .map_err(|e| LedgerError::Poisoned(e.to_string()))
    }

    /// Use `at` as the timestamp of every later invocation.
    pub fn pin_clock(&self, at: DateTime<Utc>) {
        *self.pinned_clock.write().unwrap_or_else(PoisonError::into_inner) = Some(at);
    }

    /// Replace the injected faults.
    pub fn set_faults(&self, faults: Faults) {
        *self.faults.write().unwrap_or_else(PoisonError::into_inner) = faults;
    }

    pub fn clear_faults(&self) {
        self.set_faults(Faults::default());
    }

    /// Write directly to committed state, bypassing invocations.
    ///
    /// Intended for seeding fixtures, including data this core would never
    /// write itself. Invocations that already read `key` will conflict.
    pub fn insert_raw(&self, key: impl Into<String>, value: Vec<u8>) {
        let version = self.next_version();
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), Versioned { value, version });
    }

    /// Committed value at `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|v| v.value.clone())
    }

    /// Committed keys under `prefix`, in key order.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Number of committed keys.
    pub fn len(&self) -> usize {
        self.state.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sequence number of the last committed invocation (0 before any).
    pub fn height(&self) -> u64 {
        self.height.load(Ordering::SeqCst)
    }

    /// The full committed event log.
    pub fn events(&self) -> Vec<CommittedEvent> {
        self.log.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Committed events from transactions after `seq`.
    ///
    /// Off-core consumers poll this with the last sequence number they have
    /// processed.
    pub fn events_since(&self, seq: u64) -> Vec<CommittedEvent> {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.seq > seq)
            .cloned()
            .collect()
    }

    /// Number of scans currently holding a lease.
    pub fn open_scans(&self) -> usize {
        self.open_scans.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedger")
            .field("key_count", &self.len())
            .field("height", &self.height())
            .field("open_scans", &self.open_scans())
            .finish()
    }
}

/// Versions observed by an invocation, checked again at commit.
#[derive(Debug, Default)]
struct ReadSet {
    /// Point reads: key to the version seen (`None` if absent).
    keys: BTreeMap<String, Option<u64>>,
    /// Prefix scans: prefix to every (key, version) it matched.
    ranges: Vec<(String, Vec<(String, u64)>)>,
}

impl ReadSet {
    fn first_conflict(&self, state: &BTreeMap<String, Versioned>) -> Option<String> {
        for (key, seen) in &self.keys {
            if state.get(key).map(|v| v.version) != *seen {
                return Some(key.clone());
            }
        }
        for (prefix, seen) in &self.ranges {
            let current = state
                .range(prefix.clone()..)
                .take_while(|(k, _)| k.starts_with(prefix.as_str()))
                .map(|(k, v)| (k, v.version));
            if !current.eq(seen.iter().map(|(k, v)| (k, *v))) {
                return Some(prefix.clone());
            }
        }
        None
    }
}

/// The [`LedgerStub`] of one invocation against an [`InMemoryLedger`].
pub struct Invocation<'a> {
    ledger: &'a InMemoryLedger,
    timestamp: DateTime<Utc>,
    reads: RefCell<ReadSet>,
    writes: BTreeMap<String, Vec<u8>>,
    events: Vec<LedgerEvent>,
}

impl<'a> Invocation<'a> {
    fn new(ledger: &'a InMemoryLedger, timestamp: DateTime<Utc>) -> Self {
        Self {
            ledger,
            timestamp,
            reads: RefCell::new(ReadSet::default()),
            writes: BTreeMap::new(),
            events: Vec::new(),
        }
    }
}

impl LedgerStub for Invocation<'_> {
    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        if self.ledger.current_faults()?.fail_reads {
            return Err(LedgerError::ReadFailed {
                key: key.to_string(),
                reason: "injected read fault".into(),
            });
        }
        let state = self
            .ledger
            .state
            .read()
            .map_err(|e| LedgerError::Poisoned(e.to_string()))?;
        let entry = state.get(key);
        self.reads
            .borrow_mut()
            .keys
            .entry(key.to_string())
            .or_insert(entry.map(|v| v.version));
        Ok(entry.map(|v| v.value.clone()))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()> {
        if self.ledger.current_faults()?.fail_writes {
            return Err(LedgerError::WriteFailed {
                key: key.to_string(),
                reason: "injected write fault".into(),
            });
        }
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> LedgerResult<StateScan> {
        let faults = self.ledger.current_faults()?;
        if faults.fail_reads {
            return Err(LedgerError::ScanFailed {
                prefix: prefix.to_string(),
                reason: "injected read fault".into(),
            });
        }

        let (mut entries, seen): (Vec<LedgerResult<KeyValue>>, Vec<(String, u64)>) = {
            let state = self
                .ledger
                .state
                .read()
                .map_err(|e| LedgerError::Poisoned(e.to_string()))?;
            state
                .range(prefix.to_string()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (Ok(KeyValue::new(k.clone(), v.value.clone())), (k.clone(), v.version)))
                .unzip()
        };
        self.reads
            .borrow_mut()
            .ranges
            .push((prefix.to_string(), seen));

        if let Some(after) = faults.fail_scan_after {
            entries.truncate(after);
            entries.push(Err(LedgerError::ScanFailed {
                prefix: prefix.to_string(),
                reason: format!("injected fault after {after} entries"),
            }));
        }

        debug!(prefix, entries = entries.len(), "scan opened");
        Ok(StateScan::new(
            prefix,
            entries,
            Some(ScanLease::acquire(&self.ledger.open_scans)),
        ))
    }

    fn emit_event(&mut self, event: LedgerEvent) -> LedgerResult<()> {
        if event.name.is_empty() {
            return Err(LedgerError::EventRejected {
                name: event.name,
                reason: "event name must not be empty".into(),
            });
        }
        self.events.push(event);
        Ok(())
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// BLAKE3 digest identifying a transaction by its effects.
fn tx_digest(seq: u64, writes: &BTreeMap<String, Vec<u8>>, events: &[LedgerEvent]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"baps-tx-v1");
    hasher.update(&seq.to_le_bytes());
    for (key, value) in writes {
        hasher.update(&(key.len() as u64).to_le_bytes());
        hasher.update(key.as_bytes());
        hasher.update(&(value.len() as u64).to_le_bytes());
        hasher.update(value);
    }
    for event in events {
        hasher.update(&(event.name.len() as u64).to_le_bytes());
        hasher.update(event.name.as_bytes());
        hasher.update(&(event.payload.len() as u64).to_le_bytes());
        hasher.update(&event.payload);
    }
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Ledger(LedgerError),
        Abort,
    }

    impl From<LedgerError> for TestError {
        fn from(e: LedgerError) -> Self {
            Self::Ledger(e)
        }
    }

    fn put(ledger: &InMemoryLedger, key: &str, value: &[u8]) -> TxReceipt {
        ledger
            .invoke(|stub| stub.put_state(key, value.to_vec()))
            .map(|invoked: Invoked<()>| invoked.receipt)
            .unwrap()
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    // -----------------------------------------------------------------------
    // Commit and abort
    // -----------------------------------------------------------------------

    #[test]
    fn committed_writes_are_visible() {
        let ledger = InMemoryLedger::new();
        let receipt = put(&ledger, "C1~BankA", b"vote");
        assert_eq!(receipt.seq, 1);
        assert_eq!(receipt.writes, vec!["C1~BankA".to_string()]);
        assert_eq!(ledger.get("C1~BankA"), Some(b"vote".to_vec()));
        assert_eq!(ledger.height(), 1);
    }

    #[test]
    fn failed_invocation_commits_nothing() {
        let ledger = InMemoryLedger::new();
        let result: Result<Invoked<()>, TestError> = ledger.invoke(|stub| {
            stub.put_state("C1~BankA", b"vote".to_vec())?;
            stub.emit_event(LedgerEvent::new("VoteSubmitted", b"vote".to_vec()))?;
            Err(TestError::Abort)
        });
        assert_eq!(result.unwrap_err(), TestError::Abort);
        assert!(ledger.is_empty());
        assert!(ledger.events().is_empty());
        assert_eq!(ledger.height(), 0);
    }

    #[test]
    fn reads_do_not_observe_buffered_writes() {
        let ledger = InMemoryLedger::new();
        let seen = ledger
            .invoke(|stub| -> LedgerResult<Option<Vec<u8>>> {
                stub.put_state("k", b"v".to_vec())?;
                stub.get_state("k")
            })
            .unwrap();
        assert_eq!(seen.value, None);
        assert_eq!(ledger.get("k"), Some(b"v".to_vec()));
    }

    #[test]
    fn evaluate_discards_effects() {
        let ledger = InMemoryLedger::new();
        let value = ledger
            .evaluate(|stub| -> LedgerResult<u32> {
                stub.put_state("k", b"v".to_vec())?;
                stub.emit_event(LedgerEvent::new("E", Vec::new()))?;
                Ok(7)
            })
            .unwrap();
        assert_eq!(value, 7);
        assert!(ledger.is_empty());
        assert!(ledger.events().is_empty());
        assert_eq!(ledger.height(), 0);
    }

    #[test]
    fn read_only_invocation_still_gets_a_receipt() {
        let ledger = InMemoryLedger::new();
        let invoked = ledger
            .invoke(|stub| stub.get_state("missing"))
            .unwrap();
        assert!(invoked.receipt.is_read_only());
        assert_eq!(invoked.receipt.seq, 1);
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    #[test]
    fn events_are_logged_with_their_transaction() {
        let ledger = InMemoryLedger::new();
        ledger
            .invoke(|stub| stub.emit_event(LedgerEvent::new("VoteSubmitted", b"1".to_vec())))
            .unwrap();
        let second = ledger
            .invoke(|stub| stub.emit_event(LedgerEvent::new("ContractApproved", b"2".to_vec())))
            .unwrap();
        assert_eq!(second.receipt.events.len(), 1);

        let all = ledger.events();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].seq, 1);
        assert_eq!(all[1].seq, 2);

        let newer = ledger.events_since(1);
        assert_eq!(newer.len(), 1);
        assert_eq!(newer[0].event.name, "ContractApproved");
    }

    #[test]
    fn empty_event_name_is_rejected() {
        let ledger = InMemoryLedger::new();
        let err = ledger
            .invoke(|stub| stub.emit_event(LedgerEvent::new("", Vec::new())))
            .unwrap_err();
        assert!(matches!(err, LedgerError::EventRejected { .. }));
    }

    // -----------------------------------------------------------------------
    // Scans
    // -----------------------------------------------------------------------

    #[test]
    fn scan_respects_prefix_and_key_order() {
        let ledger = InMemoryLedger::new();
        ledger.insert_raw("C1~BankB", b"b".to_vec());
        ledger.insert_raw("C1~BankA", b"a".to_vec());
        ledger.insert_raw("C10~BankA", b"x".to_vec());
        ledger.insert_raw("contract~C1", b"r".to_vec());

        let keys = ledger
            .evaluate(|stub| -> LedgerResult<Vec<String>> {
                stub.scan_prefix("C1~")?
                    .map(|kv| kv.map(|kv| kv.key))
                    .collect()
            })
            .unwrap();
        assert_eq!(keys, vec!["C1~BankA", "C1~BankB"]);
        assert_eq!(ledger.open_scans(), 0);
        assert_eq!(ledger.keys_with_prefix("C1"), vec!["C1~BankA", "C1~BankB", "C10~BankA"]);
    }

    #[test]
    fn scan_lease_is_held_while_open() {
        let ledger = InMemoryLedger::new();
        ledger.insert_raw("sub~AE~BankA", Vec::new());
        ledger
            .evaluate(|stub| -> LedgerResult<()> {
                let scan = stub.scan_prefix("sub~AE~")?;
                assert_eq!(ledger.open_scans(), 1);
                scan.close();
                assert_eq!(ledger.open_scans(), 0);
                Ok(())
            })
            .unwrap();
    }

    // -----------------------------------------------------------------------
    // Fault injection
    // -----------------------------------------------------------------------

    #[test]
    fn injected_write_fault_aborts_invocation() {
        let ledger = InMemoryLedger::new();
        ledger.set_faults(Faults {
            fail_writes: true,
            ..Faults::default()
        });
        let err = ledger
            .invoke(|stub| stub.put_state("k", b"v".to_vec()))
            .unwrap_err();
        assert!(matches!(err, LedgerError::WriteFailed { .. }));
        assert!(ledger.is_empty());

        ledger.clear_faults();
        put(&ledger, "k", b"v");
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn injected_read_fault() {
        let ledger = InMemoryLedger::new();
        ledger.set_faults(Faults {
            fail_reads: true,
            ..Faults::default()
        });
        let err = ledger.evaluate(|stub| stub.get_state("k")).unwrap_err();
        assert!(matches!(err, LedgerError::ReadFailed { .. }));
        let err = ledger.evaluate(|stub| stub.scan_prefix("k").map(|_| ())).unwrap_err();
        assert!(matches!(err, LedgerError::ScanFailed { .. }));
    }

    #[test]
    fn injected_scan_fault_releases_lease() {
        let ledger = InMemoryLedger::new();
        ledger.insert_raw("C1~BankA", Vec::new());
        ledger.insert_raw("C1~BankB", Vec::new());
        ledger.set_faults(Faults {
            fail_scan_after: Some(1),
            ..Faults::default()
        });
        let err = ledger
            .evaluate(|stub| -> LedgerResult<usize> {
                let mut n = 0;
                for entry in stub.scan_prefix("C1~")? {
                    entry?;
                    n += 1;
                }
                Ok(n)
            })
            .unwrap_err();
        assert!(matches!(err, LedgerError::ScanFailed { .. }));
        assert_eq!(ledger.open_scans(), 0);
    }

    // -----------------------------------------------------------------------
    // Receipts and clock
    // -----------------------------------------------------------------------

    #[test]
    fn pinned_clock_sets_tx_timestamp() {
        let ledger = InMemoryLedger::new();
        ledger.pin_clock(fixed_time());
        let invoked = ledger
            .invoke(|stub| -> LedgerResult<DateTime<Utc>> { Ok(stub.tx_timestamp()) })
            .unwrap();
        assert_eq!(invoked.value, fixed_time());
        assert_eq!(invoked.receipt.timestamp, fixed_time());
    }

    #[test]
    fn tx_hash_depends_on_effects() {
        let a = InMemoryLedger::new();
        let b = InMemoryLedger::new();
        let c = InMemoryLedger::new();
        let ra = put(&a, "k", b"v");
        let rb = put(&b, "k", b"v");
        let rc = put(&c, "k", b"w");
        assert_eq!(ra.tx_hash, rb.tx_hash);
        assert_ne!(ra.tx_hash, rc.tx_hash);
        assert_eq!(ra.hash_hex().len(), 64);
        assert!(ra.to_string().starts_with("tx#1 ["));
    }

    // -----------------------------------------------------------------------
    // Read-set validation
    // -----------------------------------------------------------------------

    fn bump(ledger: &InMemoryLedger) -> LedgerResult<Invoked<()>> {
        ledger.invoke(|stub| -> LedgerResult<()> {
            let current = stub
                .get_state("counter")?
                .map(|v| u64::from_le_bytes(v.try_into().unwrap()))
                .unwrap_or(0);
            stub.put_state("counter", (current + 1).to_le_bytes().to_vec())
        })
    }

    #[test]
    fn concurrent_invocations_never_lose_updates() {
        use std::thread;

        let ledger = Arc::new(InMemoryLedger::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    let mut done = 0;
                    while done < 10 {
                        match bump(&ledger) {
                            Ok(_) => done += 1,
                            Err(LedgerError::Conflict { .. }) => continue,
                            Err(e) => panic!("unexpected ledger error: {e}"),
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }

        let raw = ledger.get("counter").unwrap();
        assert_eq!(u64::from_le_bytes(raw.try_into().unwrap()), 80);
        assert_eq!(ledger.height(), 80);
    }

    #[test]
    fn ledger_is_usable_from_inside_an_invocation() {
        use std::sync::mpsc;
        use std::thread;

        let ledger = Arc::new(InMemoryLedger::new());
        put(&ledger, "k", b"v");

        let (tx, rx) = mpsc::channel();
        let worker = {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                let seen = ledger
                    .invoke(|_| -> LedgerResult<u64> { Ok(ledger.height()) })
                    .map(|invoked| invoked.value);
                let _ = tx.send(seen);
            })
        };

        let seen = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("invocation reading the height should return");
        assert_eq!(seen, Ok(1));
        worker.join().unwrap();
        assert_eq!(ledger.height(), 2);
    }

    #[test]
    fn nested_invocation_invalidates_outer_read() {
        let ledger = InMemoryLedger::new();
        let err = ledger
            .invoke(|stub| -> LedgerResult<()> {
                assert_eq!(stub.get_state("k")?, None);
                put(&ledger, "k", b"inner");
                stub.put_state("j", b"outer".to_vec())
            })
            .unwrap_err();
        assert_eq!(err, LedgerError::Conflict { key: "k".into() });
        assert_eq!(ledger.get("k"), Some(b"inner".to_vec()));
        assert_eq!(ledger.get("j"), None);
        assert_eq!(ledger.height(), 1);
    }

    #[test]
    fn new_key_under_scanned_prefix_is_a_conflict() {
        let ledger = InMemoryLedger::new();
        ledger.insert_raw("sub~AE~BankA", Vec::new());
        let err = ledger
            .invoke(|stub| -> LedgerResult<()> {
                let seen = stub.scan_prefix("sub~AE~")?.count();
                assert_eq!(seen, 1);
                ledger.insert_raw("sub~AE~BankB", Vec::new());
                stub.put_state("count~AE", seen.to_string().into_bytes())
            })
            .unwrap_err();
        assert!(matches!(err, LedgerError::Conflict { ref key } if key == "sub~AE~"));
        assert_eq!(ledger.get("count~AE"), None);
    }

    #[test]
    fn unrelated_commits_do_not_conflict() {
        let ledger = InMemoryLedger::new();
        ledger.insert_raw("C1~BankA", b"a".to_vec());
        let invoked = ledger
            .invoke(|stub| -> LedgerResult<()> {
                stub.get_state("C1~BankA")?;
                put(&ledger, "C2~BankB", b"b");
                let value = ledger
                    .evaluate(|inner| inner.get_state("C2~BankB"))?;
                assert_eq!(value, Some(b"b".to_vec()));
                stub.put_state("C1~BankC", b"c".to_vec())
            })
            .unwrap();
        assert_eq!(invoked.receipt.seq, 2);
        assert_eq!(ledger.get("C1~BankC"), Some(b"c".to_vec()));
    }

    #[test]
    fn debug_format() {
        let ledger = InMemoryLedger::new();
        let debug = format!("{ledger:?}");
        assert!(debug.contains("InMemoryLedger"));
        assert!(debug.contains("key_count"));
    }
}
