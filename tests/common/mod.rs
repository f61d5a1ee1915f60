//! Shared fixtures for the rangefeed task tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc as std_mpsc, Arc, Mutex};

use aerodb_rangefeed::hlc::Timestamp;
use aerodb_rangefeed::mvcc::{
    MvccKey, MvccKeyValue, MvccMetadata, SliceIterator, SnapshotError, SnapshotIterator,
    SnapshotResult,
};
use aerodb_rangefeed::rangefeed::{RangefeedResult, TxnPusher};
use aerodb_rangefeed::txn::{Transaction, TxnId, TxnMeta};
use futures_util::future::BoxFuture;
use tokio::sync::mpsc;

// =============================================================================
// Logging
// =============================================================================

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// =============================================================================
// Snapshot rows
// =============================================================================

pub fn make_kv(key: &str, val: &str, ts: i64) -> MvccKeyValue {
    MvccKeyValue::new(MvccKey::new(key.as_bytes(), Timestamp::from_wall(ts)), val.as_bytes())
}

fn make_meta_kv(key: &str, meta: MvccMetadata) -> MvccKeyValue {
    MvccKeyValue::new(MvccKey::metadata(key.as_bytes()), meta.encode().unwrap())
}

pub fn make_inline(key: &str, val: &str) -> MvccKeyValue {
    make_meta_kv(key, MvccMetadata::Inline(val.as_bytes().to_vec()))
}

pub fn make_intent(key: &str, txn_id: TxnId, txn_key: &str, txn_ts: i64) -> MvccKeyValue {
    let txn = TxnMeta::new(txn_id, txn_key.as_bytes(), Timestamp::from_wall(txn_ts));
    make_meta_kv(key, MvccMetadata::Intent(txn))
}

/// Metadata row whose payload does not decode.
pub fn make_corrupt_meta(key: &str) -> MvccKeyValue {
    MvccKeyValue::new(MvccKey::metadata(key.as_bytes()), b"garbage".to_vec())
}

/// The snapshot every scan test reads: values, inline values and intents
/// of two transactions, on both sides of the span `[d, w)`.
pub fn fixture_rows(txn1: TxnId, txn2: TxnId) -> Vec<MvccKeyValue> {
    vec![
        make_kv("a", "val1", 10),
        make_inline("b", "val2"),
        make_intent("c", txn1, "txnKey1", 15),
        make_kv("c", "val3", 11),
        make_kv("c", "val4", 9),
        make_intent("d", txn2, "txnKey2", 21),
        make_kv("d", "val5", 20),
        make_kv("d", "val6", 19),
        make_inline("g", "val7"),
        make_kv("m", "val8", 1),
        make_intent("n", txn1, "txnKey1", 12),
        make_intent("r", txn1, "txnKey1", 19),
        make_kv("r", "val9", 4),
        make_intent("w", txn1, "txnKey1", 3),
        make_inline("x", "val10"),
        make_intent("z", txn2, "txnKey2", 21),
        make_kv("z", "val11", 4),
    ]
}

// =============================================================================
// Test iterator
// =============================================================================

/// Iterator over in-memory rows that counts closes, can fail every read and
/// can hold its first seek until released.
pub struct TestIterator {
    inner: SliceIterator,
    err: Option<SnapshotError>,
    gate: Option<std_mpsc::Receiver<()>>,
    closes: Arc<AtomicUsize>,
}

/// Observes a `TestIterator` after it moved into a task.
#[derive(Clone)]
pub struct CloseCounter(Arc<AtomicUsize>);

impl CloseCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl TestIterator {
    pub fn new(rows: Vec<MvccKeyValue>) -> (Self, CloseCounter) {
        let closes = Arc::new(AtomicUsize::new(0));
        let it = Self {
            inner: SliceIterator::new(rows).unwrap(),
            err: None,
            gate: None,
            closes: Arc::clone(&closes),
        };
        (it, CloseCounter(closes))
    }

    pub fn failing(err: SnapshotError) -> (Self, CloseCounter) {
        let (mut it, closes) = Self::new(Vec::new());
        it.err = Some(err);
        (it, closes)
    }

    /// Block the first seek until the returned sender sends or is dropped.
    pub fn blocked(mut self) -> (Self, std_mpsc::Sender<()>) {
        let (tx, rx) = std_mpsc::channel();
        self.gate = Some(rx);
        (self, tx)
    }
}

impl SnapshotIterator for TestIterator {
    fn seek(&mut self, key: &MvccKey) {
        if let Some(gate) = self.gate.take() {
            let _ = gate.recv();
        }
        self.inner.seek(key);
    }

    fn valid(&self) -> SnapshotResult<bool> {
        match &self.err {
            Some(err) => Err(err.clone()),
            None => self.inner.valid(),
        }
    }

    fn next(&mut self) {
        self.inner.next();
    }

    fn next_key(&mut self) {
        self.inner.next_key();
    }

    fn unsafe_key(&self) -> &MvccKey {
        self.inner.unsafe_key()
    }

    fn unsafe_value(&self) -> &[u8] {
        self.inner.unsafe_value()
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close();
    }
}

// =============================================================================
// Test pusher
// =============================================================================

type PushFn = dyn Fn(Vec<TxnMeta>, Timestamp) -> RangefeedResult<Vec<Transaction>> + Send + Sync;

/// Pusher answering pushes from a closure and recording cleanup requests.
pub struct TestPusher {
    push_fn: Box<PushFn>,
    cleanup_result: Mutex<RangefeedResult<()>>,
    cleanups: mpsc::UnboundedSender<Vec<Transaction>>,
}

impl TestPusher {
    pub fn new<F>(push_fn: F) -> (Arc<Self>, mpsc::UnboundedReceiver<Vec<Transaction>>)
    where
        F: Fn(Vec<TxnMeta>, Timestamp) -> RangefeedResult<Vec<Transaction>> + Send + Sync + 'static,
    {
        let (cleanups, rx) = mpsc::unbounded_channel();
        let pusher = Self {
            push_fn: Box::new(push_fn),
            cleanup_result: Mutex::new(Ok(())),
            cleanups,
        };
        (Arc::new(pusher), rx)
    }

    /// Pusher for tests that never push.
    pub fn unused() -> Arc<Self> {
        Self::new(|_, _| panic!("unexpected push")).0
    }

    pub fn fail_cleanups_with(&self, result: RangefeedResult<()>) {
        *self.cleanup_result.lock().unwrap() = result;
    }
}

impl TxnPusher for TestPusher {
    fn push_txns(
        &self,
        txns: Vec<TxnMeta>,
        ts: Timestamp,
    ) -> BoxFuture<'_, RangefeedResult<Vec<Transaction>>> {
        let result = (self.push_fn)(txns, ts);
        Box::pin(async move { result })
    }

    fn cleanup_txn_intents_async(
        &self,
        txns: Vec<Transaction>,
    ) -> BoxFuture<'_, RangefeedResult<()>> {
        let _ = self.cleanups.send(txns);
        let result = self.cleanup_result.lock().unwrap().clone();
        Box::pin(async move { result })
    }
}
