//! # Initial Resolved Timestamp Scan
//!
//! Runs once when a processor starts. Walks every key of the processor's
//! span, collects the transactions holding intents, reports each of them
//! to the processor as a WriteIntent operation and finally sends the
//! `InitResolvedTs` marker so the processor can start computing a
//! resolved timestamp.
//!
//! Only the metadata row of each key can hold an intent, and it is always
//! the first row of the key, so the scan steps key by key.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::errors::{RangefeedError, RangefeedResult};
use super::event::{write_intent_op, Event};
use super::processor::Processor;
use super::scan::{decode_metadata, IterGuard};
use crate::mvcc::{MvccMetadata, SnapshotIterator};
use crate::observability::{Event as LogEvent, TaskScope};
use crate::txn::{TxnId, TxnMeta};

/// Scan establishing the set of outstanding transactions in a span
pub struct InitResolvedTsScan<I: SnapshotIterator> {
    p: Arc<Processor>,
    it: IterGuard<I>,
}

impl<I: SnapshotIterator> InitResolvedTsScan<I> {
    pub(crate) fn new(p: Arc<Processor>, it: I) -> Self {
        Self {
            p,
            it: IterGuard::new(it),
        }
    }

    /// Run the scan to completion.
    ///
    /// The iterator is released before this returns, whatever the outcome.
    /// On error or cancellation the `InitResolvedTs` marker is not sent.
    pub async fn run(self, token: &CancellationToken) -> RangefeedResult<()> {
        let Self { p, mut it } = self;
        let scope = TaskScope::new(LogEvent::InitScanBegin, p.span().to_string());

        let collected = collect_intents(&p, &mut *it, token);
        drop(it);
        let result = match collected {
            Ok(txns) => deliver(&p, txns, token).await,
            Err(err) => Err(err),
        };

        match &result {
            Ok(()) => scope.complete(LogEvent::InitScanComplete),
            Err(err) if err.is_cancellation() => {
                p.metrics().increment_cancellations();
                scope.cancelled();
            }
            Err(err) => {
                p.metrics().increment_scan_failures();
                scope.fail(LogEvent::InitScanFailed, err);
            }
        }
        result
    }
}

/// Walk the span key by key and gather one entry per transaction.
///
/// Entries keep first-encounter order. When a transaction holds several
/// intents, the earliest timestamp seen wins.
fn collect_intents<I: SnapshotIterator + ?Sized>(
    p: &Processor,
    it: &mut I,
    token: &CancellationToken,
) -> RangefeedResult<Vec<TxnMeta>> {
    let span = p.span();
    let mut txns: Vec<TxnMeta> = Vec::new();
    let mut positions: HashMap<TxnId, usize> = HashMap::new();

    it.seek(&span.start_key());
    loop {
        if token.is_cancelled() {
            return Err(RangefeedError::Cancelled);
        }
        if !it.valid()? {
            break;
        }
        let key = it.unsafe_key();
        if span.is_past_end(key) {
            break;
        }

        if !key.is_value() {
            if let MvccMetadata::Intent(txn) = decode_metadata(key, it.unsafe_value())? {
                match positions.entry(txn.id) {
                    Entry::Occupied(pos) => {
                        txns[*pos.get()].timestamp.backward(txn.timestamp);
                    }
                    Entry::Vacant(pos) => {
                        pos.insert(txns.len());
                        txns.push(txn);
                    }
                }
            }
        }

        it.next_key();
    }

    Ok(txns)
}

/// Send one WriteIntent event per transaction, then the init marker.
async fn deliver(
    p: &Processor,
    txns: Vec<TxnMeta>,
    token: &CancellationToken,
) -> RangefeedResult<()> {
    let count = txns.len();
    p.metrics().add_intents_discovered(count as u64);
    tracing::debug!(span = %p.span(), txns = count, "outstanding transactions found");

    for txn in txns {
        let op = write_intent_op(txn.id, txn.key, txn.timestamp);
        p.send_event(Event::single(op), token).await?;
    }
    p.send_event(Event::InitResolvedTs, token).await
}
