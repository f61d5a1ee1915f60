//! # Processor Handle
//!
//! The task-facing side of a rangefeed processor: the span it serves, its
//! configuration, the transaction pusher, and the delivery points tasks
//! report through.
//!
//! The processor's event loop, resolved timestamp bookkeeping and task
//! scheduling live with the caller. This handle only builds and spawns
//! tasks; deciding *when* to run them is not its concern.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::catch_up::CatchUpScan;
use super::channels::{
    catch_up_channel, event_channel, CatchUpReceiver, CatchUpSender, CleanupReportSender,
    DoneSignal, EventReceiver, EventSender,
};
use super::config::RangefeedConfig;
use super::errors::RangefeedResult;
use super::event::Event;
use super::init_scan::InitResolvedTsScan;
use super::push_attempt::TxnPushAttempt;
use super::pusher::TxnPusher;
use super::registration::Registration;
use super::span::Span;
use crate::hlc::Timestamp;
use crate::mvcc::SnapshotIterator;
use crate::observability::RangefeedMetrics;
use crate::txn::TxnMeta;

/// Receiving ends handed back to the processor's event loop
#[derive(Debug)]
pub struct ProcessorReceivers {
    /// Shared event queue
    pub events: EventReceiver,
    /// Catch-up completion queue
    pub catch_ups: CatchUpReceiver,
}

/// Task-facing processor handle
pub struct Processor {
    span: Span,
    config: RangefeedConfig,
    pusher: Arc<dyn TxnPusher>,
    event_tx: EventSender,
    catch_up_tx: CatchUpSender,
    cleanup_reports: Option<CleanupReportSender>,
    metrics: Arc<RangefeedMetrics>,
}

impl Processor {
    /// Create a processor handle for `span`.
    ///
    /// Validates `config` and sizes the event and catch-up queues from it.
    pub fn new(
        span: Span,
        pusher: Arc<dyn TxnPusher>,
        config: RangefeedConfig,
    ) -> RangefeedResult<(Arc<Self>, ProcessorReceivers)> {
        Self::with_cleanup_reports(span, pusher, config, None)
    }

    /// Like `new`, also forwarding failed intent cleanups to `reports`.
    pub fn with_cleanup_reports(
        span: Span,
        pusher: Arc<dyn TxnPusher>,
        config: RangefeedConfig,
        reports: Option<CleanupReportSender>,
    ) -> RangefeedResult<(Arc<Self>, ProcessorReceivers)> {
        config.validate()?;

        let (event_tx, events) = event_channel(config.event_queue_capacity);
        let (catch_up_tx, catch_ups) = catch_up_channel(config.catch_up_queue_capacity);

        let processor = Self {
            span,
            config,
            pusher,
            event_tx,
            catch_up_tx,
            cleanup_reports: reports,
            metrics: Arc::new(RangefeedMetrics::new()),
        };
        Ok((Arc::new(processor), ProcessorReceivers { events, catch_ups }))
    }

    /// Span served by the processor
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Configuration
    pub fn config(&self) -> &RangefeedConfig {
        &self.config
    }

    /// Task counters
    pub fn metrics(&self) -> &Arc<RangefeedMetrics> {
        &self.metrics
    }

    pub(crate) fn pusher(&self) -> &Arc<dyn TxnPusher> {
        &self.pusher
    }

    pub(crate) fn catch_up_sender(&self) -> &CatchUpSender {
        &self.catch_up_tx
    }

    pub(crate) fn cleanup_reports(&self) -> Option<&CleanupReportSender> {
        self.cleanup_reports.as_ref()
    }

    /// Enqueue an event on the shared queue, blocking while it is full.
    pub(crate) async fn send_event(
        &self,
        event: Event,
        token: &CancellationToken,
    ) -> RangefeedResult<()> {
        self.event_tx.send(event, token).await
    }

    // ==================
    // Task construction
    // ==================

    /// Build the initial resolved timestamp scan over `iter`.
    pub fn new_init_resolved_ts_scan<I: SnapshotIterator>(
        self: &Arc<Self>,
        iter: I,
    ) -> InitResolvedTsScan<I> {
        InitResolvedTsScan::new(Arc::clone(self), iter)
    }

    /// Build the catch-up scan for `registration`.
    ///
    /// Returns `None` if the registration has no catch-up iterator (none
    /// was requested, or a scan already took it).
    pub fn new_catch_up_scan(
        self: &Arc<Self>,
        registration: Arc<Registration>,
    ) -> Option<CatchUpScan> {
        CatchUpScan::new(Arc::clone(self), registration)
    }

    /// Build a push attempt for `txns` to timestamp `ts`.
    pub fn new_txn_push_attempt(
        self: &Arc<Self>,
        txns: Vec<TxnMeta>,
        ts: Timestamp,
        done: DoneSignal,
    ) -> TxnPushAttempt {
        TxnPushAttempt::new(Arc::clone(self), txns, ts, done)
    }

    // ==================
    // Task spawning
    // ==================

    /// Run the initial scan on a blocking worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_init_resolved_ts_scan<I: SnapshotIterator + 'static>(
        self: &Arc<Self>,
        iter: I,
        token: CancellationToken,
    ) -> JoinHandle<RangefeedResult<()>> {
        let scan = self.new_init_resolved_ts_scan(iter);
        let handle = Handle::current();
        tokio::task::spawn_blocking(move || handle.block_on(scan.run(&token)))
    }

    /// Run the catch-up scan for `registration` on a blocking worker.
    ///
    /// Returns `None` when there is nothing to catch up. Must be called from
    /// within a tokio runtime.
    pub fn spawn_catch_up_scan(
        self: &Arc<Self>,
        registration: Arc<Registration>,
        token: CancellationToken,
    ) -> Option<JoinHandle<RangefeedResult<()>>> {
        let scan = self.new_catch_up_scan(registration)?;
        let handle = Handle::current();
        Some(tokio::task::spawn_blocking(move || {
            handle.block_on(scan.run(&token))
        }))
    }

    /// Run a push attempt on the async runtime.
    pub fn spawn_txn_push_attempt(
        self: &Arc<Self>,
        txns: Vec<TxnMeta>,
        ts: Timestamp,
        done: DoneSignal,
        token: CancellationToken,
    ) -> JoinHandle<RangefeedResult<()>> {
        let attempt = self.new_txn_push_attempt(txns, ts, done);
        tokio::spawn(async move { attempt.run(&token).await })
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("span", &self.span)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rangefeed::errors::RangefeedError;
    use crate::txn::Transaction;
    use futures_util::future::BoxFuture;

    struct NoopPusher;

    impl TxnPusher for NoopPusher {
        fn push_txns(
            &self,
            _txns: Vec<TxnMeta>,
            _ts: Timestamp,
        ) -> BoxFuture<'_, RangefeedResult<Vec<Transaction>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn cleanup_txn_intents_async(
            &self,
            _txns: Vec<Transaction>,
        ) -> BoxFuture<'_, RangefeedResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    fn span() -> Span {
        Span::new(b"a".to_vec(), b"z".to_vec())
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = RangefeedConfig {
            event_queue_capacity: 0,
            ..RangefeedConfig::default()
        };
        let err = Processor::new(span(), Arc::new(NoopPusher), config).unwrap_err();
        assert!(matches!(err, RangefeedError::Config(_)));
    }

    #[tokio::test]
    async fn test_event_queue_sized_from_config() {
        let config = RangefeedConfig {
            event_queue_capacity: 3,
            ..RangefeedConfig::default()
        };
        let (p, _receivers) = Processor::new(span(), Arc::new(NoopPusher), config).unwrap();
        assert_eq!(p.event_tx.capacity(), 3);

        p.send_event(Event::InitResolvedTs, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(p.event_tx.capacity(), 2);
    }

    #[test]
    fn test_no_catch_up_without_iterator() {
        let (p, _receivers) =
            Processor::new(span(), Arc::new(NoopPusher), RangefeedConfig::default()).unwrap();
        let (r, _stream) = Registration::new(span(), Timestamp::ZERO, None);
        assert!(p.new_catch_up_scan(r).is_none());
    }
}
