//! # Registrations
//!
//! A registration is one subscriber of the rangefeed: a key span, an
//! exclusive start timestamp, an optional private iterator for its
//! catch-up scan, and a sink receiving `RangeFeedValue`s.
//!
//! Registration bookkeeping (adding, removing, live fan-out) is owned by
//! the processor. The catch-up scan is the only writer of the sink until
//! the processor moves the registration to live streaming.

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use uuid::Uuid;

use super::errors::{RangefeedError, RangefeedResult};
use super::event::RangeFeedValue;
use super::span::Span;
use crate::hlc::Timestamp;
use crate::mvcc::SnapshotIterator;

/// Boxed iterator owned by a registration until its catch-up scan starts
pub type CatchUpIterator = Box<dyn SnapshotIterator>;

/// Receiving end of a registration's sink
pub type RegistrationStream = mpsc::UnboundedReceiver<RangeFeedValue>;

/// A rangefeed subscriber
pub struct Registration {
    id: Uuid,
    span: Span,
    /// Exclusive lower bound of interest
    start_ts: Timestamp,
    catch_up_iter: Mutex<Option<CatchUpIterator>>,
    sink: mpsc::UnboundedSender<RangeFeedValue>,
}

impl Registration {
    /// Create a registration and the stream its values arrive on.
    ///
    /// Pass `catch_up_iter` when the subscriber needs history replayed
    /// from `start_ts`.
    pub fn new(
        span: Span,
        start_ts: Timestamp,
        catch_up_iter: Option<CatchUpIterator>,
    ) -> (Arc<Self>, RegistrationStream) {
        let (sink, stream) = mpsc::unbounded_channel();
        let registration = Self {
            id: Uuid::new_v4(),
            span,
            start_ts,
            catch_up_iter: Mutex::new(catch_up_iter),
            sink,
        };
        (Arc::new(registration), stream)
    }

    /// Registration id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Key span of interest
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Exclusive start timestamp
    pub fn start_ts(&self) -> Timestamp {
        self.start_ts
    }

    /// Returns true if a catch-up iterator is still attached.
    pub fn needs_catch_up(&self) -> bool {
        self.catch_up_iter
            .lock()
            .map(|it| it.is_some())
            .unwrap_or(false)
    }

    /// Detach the catch-up iterator. Returns `None` once taken.
    pub fn take_catch_up_iter(&self) -> Option<CatchUpIterator> {
        self.catch_up_iter.lock().ok().and_then(|mut it| it.take())
    }

    /// Deliver a value to the subscriber.
    pub fn publish(&self, value: RangeFeedValue) -> RangefeedResult<()> {
        self.sink
            .send(value)
            .map_err(|_| RangefeedError::RegistrationDisconnected(self.id))
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("span", &self.span)
            .field("start_ts", &self.start_ts)
            .field("needs_catch_up", &self.needs_catch_up())
            .finish()
    }
}
