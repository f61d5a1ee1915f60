//! # Transaction Push Attempt
//!
//! Pushes the oldest outstanding transactions of a span so the resolved
//! timestamp can move. The outcome of every push is reported to the
//! processor as a single batched event; finished transactions additionally
//! get their intents cleaned up in the background.
//!
//! The done signal fires exactly once per attempt, after the event was
//! enqueued, whatever the outcome.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::channels::{CleanupFailure, DoneSignal};
use super::config::CleanupFailurePolicy;
use super::errors::{RangefeedError, RangefeedResult};
use super::event::{abort_intent_op, update_intent_op, Event, LogicalOp};
use super::processor::Processor;
use crate::hlc::Timestamp;
use crate::observability::{Event as LogEvent, TaskScope};
use crate::txn::{Transaction, TxnMeta, TxnStatus};

/// One push of a batch of transactions
pub struct TxnPushAttempt {
    p: Arc<Processor>,
    txns: Vec<TxnMeta>,
    ts: Timestamp,
    done: DoneSignal,
}

impl TxnPushAttempt {
    pub(crate) fn new(
        p: Arc<Processor>,
        txns: Vec<TxnMeta>,
        ts: Timestamp,
        done: DoneSignal,
    ) -> Self {
        Self { p, txns, ts, done }
    }

    /// Transactions to push
    pub fn txns(&self) -> &[TxnMeta] {
        &self.txns
    }

    /// Push target
    pub fn ts(&self) -> Timestamp {
        self.ts
    }

    /// Run the attempt to completion.
    ///
    /// An empty batch returns without calling the pusher. A failed push
    /// emits nothing and requests no cleanup. A failed cleanup never fails
    /// the attempt.
    pub async fn run(self, token: &CancellationToken) -> RangefeedResult<()> {
        let Self { p, txns, ts, done } = self;
        let scope = TaskScope::new(LogEvent::PushBegin, format!("{} txns to {}", txns.len(), ts));
        p.metrics().increment_push_attempts();

        let result = push_and_report(&p, txns, ts, token).await;

        match &result {
            Ok(()) => scope.complete(LogEvent::PushComplete),
            Err(err) if err.is_cancellation() => {
                p.metrics().increment_cancellations();
                scope.cancelled();
            }
            Err(err) => {
                p.metrics().increment_push_failures();
                scope.fail(LogEvent::PushFailed, err);
            }
        }

        done.fire();
        result
    }
}

async fn push_and_report(
    p: &Arc<Processor>,
    txns: Vec<TxnMeta>,
    ts: Timestamp,
    token: &CancellationToken,
) -> RangefeedResult<()> {
    if txns.is_empty() {
        return Ok(());
    }
    let requested = txns.len();
    let pushed = push(p, txns, ts, token).await?;
    if pushed.len() != requested {
        return Err(RangefeedError::PushResultMismatch {
            requested,
            received: pushed.len(),
        });
    }

    let (ops, to_cleanup) = outcome_ops(pushed);
    if let Some(event) = Event::from_ops(ops) {
        p.send_event(event, token).await?;
    }

    if !to_cleanup.is_empty() {
        spawn_cleanup(Arc::clone(p), to_cleanup);
    }
    Ok(())
}

/// Call the pusher, bounded by the configured timeout and by cancellation.
async fn push(
    p: &Processor,
    txns: Vec<TxnMeta>,
    ts: Timestamp,
    token: &CancellationToken,
) -> RangefeedResult<Vec<Transaction>> {
    let call = p.pusher().push_txns(txns, ts);
    let bounded = async {
        match p.config().push_timeout() {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(res) => res,
                Err(_) => Err(RangefeedError::PushTimeout(limit.as_millis() as u64)),
            },
            None => call.await,
        }
    };

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(RangefeedError::Cancelled),
        res = bounded => res,
    }
}

/// Translate push results into ops, in input order, and pick out the
/// transactions whose intents can be cleaned up.
fn outcome_ops(pushed: Vec<Transaction>) -> (Vec<LogicalOp>, Vec<Transaction>) {
    let mut ops = Vec::with_capacity(pushed.len());
    let mut to_cleanup = Vec::new();

    for txn in pushed {
        match txn.status {
            TxnStatus::Pending => {
                ops.push(update_intent_op(txn.id(), txn.timestamp()));
            }
            TxnStatus::Committed => {
                // The status record, not the op, carries finality.
                ops.push(update_intent_op(txn.id(), txn.timestamp()));
                to_cleanup.push(txn);
            }
            TxnStatus::Aborted => {
                ops.push(abort_intent_op(txn.id()));
                to_cleanup.push(txn);
            }
        }
    }
    (ops, to_cleanup)
}

/// Request intent cleanup for all of `txns` in one call, without waiting.
fn spawn_cleanup(p: Arc<Processor>, txns: Vec<Transaction>) {
    let txn_ids: Vec<_> = txns.iter().map(Transaction::id).collect();
    p.metrics().add_cleanups_requested(txn_ids.len() as u64);
    tracing::debug!(event = %LogEvent::CleanupRequested, txns = txn_ids.len());

    tokio::spawn(async move {
        let err = match p.pusher().cleanup_txn_intents_async(txns).await {
            Ok(()) => return,
            Err(err) => err,
        };

        p.metrics().increment_cleanup_failures();
        if p.config().cleanup_failure_policy == CleanupFailurePolicy::Log {
            tracing::warn!(
                event = %LogEvent::CleanupFailed,
                txns = txn_ids.len(),
                reason = %err
            );
        }
        if let Some(reports) = p.cleanup_reports() {
            // Nobody listening is fine.
            let _ = reports.send(CleanupFailure { txn_ids, error: err });
        }
    });
}
