//! # Delivery Points
//!
//! Message-passing primitives connecting tasks to the processor:
//! - Event queue: bounded, many producers, one consumer, blocks when full
//! - Catch-up completion queue: one entry per finished catch-up scan
//! - Done signal: one-shot completion of a push attempt
//! - Cleanup reports: detached channel for failed intent cleanups

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::errors::{RangefeedError, RangefeedResult};
use super::event::Event;
use super::registration::Registration;
use crate::txn::TxnId;

/// Consumer side of the event queue (owned by the processor)
pub type EventReceiver = mpsc::Receiver<Event>;

/// Producer side of the event queue, shared by all tasks
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Event>,
}

/// Create the shared event queue.
pub fn event_channel(capacity: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender { tx }, rx)
}

impl EventSender {
    /// Enqueue an event, waiting for room if the queue is full.
    ///
    /// Cancellation wins over a pending or ready send, so a cancelled task
    /// never enqueues anything further.
    pub async fn send(&self, event: Event, token: &CancellationToken) -> RangefeedResult<()> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(RangefeedError::Cancelled),
            res = self.tx.send(event) => res.map_err(|_| RangefeedError::EventQueueClosed),
        }
    }

    /// Remaining queue capacity.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }
}

/// Outcome of one catch-up scan
#[derive(Debug)]
pub struct CatchUpResult {
    /// The registration that was caught up
    pub registration: Arc<Registration>,
    /// How the scan ended
    pub outcome: RangefeedResult<()>,
}

/// Producer side of the catch-up completion queue
pub type CatchUpSender = mpsc::Sender<CatchUpResult>;

/// Consumer side of the catch-up completion queue
pub type CatchUpReceiver = mpsc::Receiver<CatchUpResult>;

/// Create the catch-up completion queue.
pub fn catch_up_channel(capacity: usize) -> (CatchUpSender, CatchUpReceiver) {
    mpsc::channel(capacity)
}

/// One-shot completion signal handed to a push attempt.
///
/// Fires exactly once: explicitly through `fire`, or when dropped.
#[derive(Debug)]
pub struct DoneSignal {
    tx: Option<oneshot::Sender<()>>,
}

/// Waiting side of a `DoneSignal`
#[derive(Debug)]
pub struct DoneWaiter {
    rx: oneshot::Receiver<()>,
}

/// Create a completion signal pair.
pub fn done_signal() -> (DoneSignal, DoneWaiter) {
    let (tx, rx) = oneshot::channel();
    (DoneSignal { tx: Some(tx) }, DoneWaiter { rx })
}

impl DoneSignal {
    /// Fire the signal.
    pub fn fire(mut self) {
        self.fire_once();
    }

    fn fire_once(&mut self) {
        if let Some(tx) = self.tx.take() {
            // The waiter may already be gone
            let _ = tx.send(());
        }
    }
}

impl Drop for DoneSignal {
    fn drop(&mut self) {
        self.fire_once();
    }
}

impl DoneWaiter {
    /// Wait for the signal.
    pub async fn wait(self) {
        let _ = self.rx.await;
    }

    /// Returns true if the signal has fired. Consumes the notification.
    pub fn try_done(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }
}

/// A failed intent cleanup, reported out of band
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    /// Transactions whose cleanup was requested
    pub txn_ids: Vec<TxnId>,
    /// The failure
    pub error: RangefeedError,
}

/// Producer side of the cleanup report channel
pub type CleanupReportSender = mpsc::UnboundedSender<CleanupFailure>;

/// Consumer side of the cleanup report channel
pub type CleanupReportReceiver = mpsc::UnboundedReceiver<CleanupFailure>;

/// Create a cleanup report channel.
pub fn cleanup_report_channel() -> (CleanupReportSender, CleanupReportReceiver) {
    mpsc::unbounded_channel()
}
