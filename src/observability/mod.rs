//! Observability for the rangefeed tasks
//!
//! This module provides:
//! - Lifecycle event names (`Event`)
//! - Scope-based begin/complete/fail logging (`TaskScope`)
//! - Counters (`RangefeedMetrics`)
//!
//! Log output goes through `tracing`; installing a subscriber is up to the
//! embedding process.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on task outcome
//! 3. One log line = one event
//!
//! # Usage
//!
//! ```ignore
//! use aerodb_rangefeed::observability::{Event, TaskScope};
//!
//! let scope = TaskScope::new(Event::InitScanBegin, "[d, w)");
//! // ... do work ...
//! scope.complete(Event::InitScanComplete);
//! ```

mod events;
mod metrics;
mod scope;

pub use events::Event;
pub use metrics::{MetricsSnapshot, RangefeedMetrics};
pub use scope::TaskScope;
