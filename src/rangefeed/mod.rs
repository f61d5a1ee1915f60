//! # AeroDB Rangefeed Tasks
//!
//! Background work behind a rangefeed processor: the scans and pushes that
//! let a processor stream value changes for a key span together with a
//! resolved timestamp.
//!
//! ## Architecture
//!
//! - **Initial Scan**: finds every outstanding transaction in the span once
//!   at startup, then marks the resolved timestamp as initialized
//! - **Catch-Up Scan**: replays history newer than a new subscriber's start
//!   timestamp straight into its stream
//! - **Push Attempt**: pushes stuck transactions, reports the outcome as
//!   intent ops and cleans up intents of finished ones
//! - **Delivery points**: the shared event queue, the catch-up completion
//!   queue, per-attempt done signals and cleanup failure reports
//!
//! Each task runs against its own snapshot iterator and reports through the
//! processor handle. When to run them is the processor's business.

pub mod catch_up;
pub mod channels;
pub mod config;
pub mod errors;
pub mod event;
pub mod init_scan;
pub mod processor;
pub mod push_attempt;
pub mod pusher;
pub mod registration;
mod scan;
pub mod span;

pub use catch_up::CatchUpScan;
pub use channels::{
    catch_up_channel, cleanup_report_channel, done_signal, event_channel, CatchUpReceiver,
    CatchUpResult, CatchUpSender, CleanupFailure, CleanupReportReceiver, CleanupReportSender,
    DoneSignal, DoneWaiter, EventReceiver, EventSender,
};
pub use config::{CleanupFailurePolicy, RangefeedConfig};
pub use errors::{RangefeedError, RangefeedResult};
pub use event::{
    abort_intent_op, commit_intent_op, update_intent_op, write_intent_op, Event, LogicalOp,
    RangeFeedValue,
};
pub use init_scan::InitResolvedTsScan;
pub use processor::{Processor, ProcessorReceivers};
pub use push_attempt::TxnPushAttempt;
pub use pusher::TxnPusher;
pub use registration::{CatchUpIterator, Registration, RegistrationStream};
pub use span::Span;
