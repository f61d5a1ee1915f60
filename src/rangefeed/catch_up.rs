//! # Catch-Up Scan
//!
//! Runs once per new registration that asked for history. Replays every
//! committed value in the registration's span that is newer than its start
//! timestamp, straight into the registration's sink, so the subscriber sees
//! no gap between history and the live stream.
//!
//! Delivery order is iteration order: keys ascending, and within a key,
//! newest version first.

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;

use super::channels::CatchUpResult;
use super::errors::{RangefeedError, RangefeedResult};
use super::event::RangeFeedValue;
use super::processor::Processor;
use super::registration::{CatchUpIterator, Registration};
use super::scan::{decode_metadata, IterGuard};
use crate::hlc::Timestamp;
use crate::mvcc::{MvccMetadata, SnapshotIterator};
use crate::observability::{Event as LogEvent, RangefeedMetrics, TaskScope};

/// Historical replay for one registration
pub struct CatchUpScan {
    p: Arc<Processor>,
    r: Arc<Registration>,
    it: IterGuard<CatchUpIterator>,
}

impl CatchUpScan {
    /// Takes the registration's catch-up iterator. `None` if it has none.
    pub(crate) fn new(p: Arc<Processor>, r: Arc<Registration>) -> Option<Self> {
        let it = r.take_catch_up_iter()?;
        Some(Self {
            p,
            r,
            it: IterGuard::new(it),
        })
    }

    /// Registration being caught up
    pub fn registration(&self) -> &Arc<Registration> {
        &self.r
    }

    /// Run the scan to completion.
    ///
    /// Values already delivered stay delivered if the scan fails. Exactly
    /// one `CatchUpResult` is posted to the processor afterwards, on
    /// success, failure and cancellation alike, once the iterator has been
    /// released. A cancelled scan gives up posting if the queue is full.
    pub async fn run(self, token: &CancellationToken) -> RangefeedResult<()> {
        let Self { p, r, mut it } = self;
        let scope = TaskScope::new(LogEvent::CatchUpBegin, r.id().to_string());

        let result = iterate_and_send(&r, &mut *it, token, p.metrics());
        drop(it);

        match &result {
            Ok(()) => scope.complete(LogEvent::CatchUpComplete),
            Err(err) if err.is_cancellation() => {
                p.metrics().increment_cancellations();
                scope.cancelled();
            }
            Err(err) => {
                p.metrics().increment_scan_failures();
                scope.fail(LogEvent::CatchUpFailed, err);
            }
        }

        let completion = CatchUpResult {
            registration: Arc::clone(&r),
            outcome: result.clone(),
        };
        post_completion(&p, completion, token).await;

        result
    }
}

/// Post the scan's completion, waiting for room unless cancelled.
///
/// A cancelled scan still posts when the queue has room; with a full queue
/// the completion is dropped so the scan can return.
async fn post_completion(p: &Processor, completion: CatchUpResult, token: &CancellationToken) {
    let id = completion.registration.id();
    let sender = p.catch_up_sender();

    let completion = match sender.try_send(completion) {
        Ok(()) => return,
        Err(TrySendError::Closed(_)) => {
            tracing::warn!(registration = %id, "catch-up completion dropped, processor gone");
            return;
        }
        Err(TrySendError::Full(completion)) => completion,
    };

    tokio::select! {
        biased;
        res = sender.send(completion) => {
            if res.is_err() {
                tracing::warn!(registration = %id, "catch-up completion dropped, processor gone");
            }
        }
        _ = token.cancelled() => {
            tracing::warn!(
                registration = %id,
                "catch-up completion dropped, queue full after cancellation"
            );
        }
    }
}

/// Replay every value in the registration's span newer than its start
/// timestamp.
fn iterate_and_send<I: SnapshotIterator + ?Sized>(
    r: &Registration,
    it: &mut I,
    token: &CancellationToken,
    metrics: &RangefeedMetrics,
) -> RangefeedResult<()> {
    let span = r.span();
    let start_ts = r.start_ts();

    it.seek(&span.start_key());
    loop {
        if token.is_cancelled() {
            return Err(RangefeedError::Cancelled);
        }
        if !it.valid()? {
            return Ok(());
        }
        let key = it.unsafe_key();
        if span.is_past_end(key) {
            return Ok(());
        }

        let mut skip_rest_of_key = false;
        let value = if key.is_value() {
            if start_ts.less(key.timestamp) {
                Some(RangeFeedValue::new(
                    key.key.clone(),
                    it.unsafe_value(),
                    key.timestamp,
                ))
            } else {
                // Older versions of this key are at or below start_ts too.
                skip_rest_of_key = true;
                None
            }
        } else {
            match decode_metadata(key, it.unsafe_value())? {
                // Inline values carry no timestamp; they count as zero.
                MvccMetadata::Inline(raw) if start_ts.less(Timestamp::ZERO) => {
                    Some(RangeFeedValue::new(key.key.clone(), raw, Timestamp::ZERO))
                }
                // Intents are resolved elsewhere, never replayed.
                _ => None,
            }
        };

        if let Some(value) = value {
            r.publish(value)?;
            metrics.increment_values_replayed();
        }

        if skip_rest_of_key {
            it.next_key();
        } else {
            it.next();
        }
    }
}
