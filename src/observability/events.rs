//! Observable rangefeed events
//!
//! Events are explicit and typed. Each task logs a BEGIN event, then
//! exactly one of COMPLETE / FAILED / CANCELLED.

use std::fmt;

/// Observable events in the rangefeed tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Initial resolved timestamp scan
    /// Initial scan started
    InitScanBegin,
    /// Initial scan delivered every intent and the init marker
    InitScanComplete,
    /// Initial scan failed
    InitScanFailed,

    // Catch-up scan
    /// Catch-up scan started
    CatchUpBegin,
    /// Catch-up scan replayed every value
    CatchUpComplete,
    /// Catch-up scan failed
    CatchUpFailed,

    // Transaction push
    /// Push attempt started
    PushBegin,
    /// Push attempt delivered its operations
    PushComplete,
    /// Push attempt failed
    PushFailed,
    /// Intent cleanup requested for finished transactions
    CleanupRequested,
    /// Intent cleanup could not be submitted
    CleanupFailed,

    // Lifecycle
    /// A task observed cancellation
    TaskCancelled,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::InitScanBegin => "INIT_RTS_SCAN_BEGIN",
            Event::InitScanComplete => "INIT_RTS_SCAN_COMPLETE",
            Event::InitScanFailed => "INIT_RTS_SCAN_FAILED",

            Event::CatchUpBegin => "CATCH_UP_SCAN_BEGIN",
            Event::CatchUpComplete => "CATCH_UP_SCAN_COMPLETE",
            Event::CatchUpFailed => "CATCH_UP_SCAN_FAILED",

            Event::PushBegin => "TXN_PUSH_BEGIN",
            Event::PushComplete => "TXN_PUSH_COMPLETE",
            Event::PushFailed => "TXN_PUSH_FAILED",
            Event::CleanupRequested => "INTENT_CLEANUP_REQUESTED",
            Event::CleanupFailed => "INTENT_CLEANUP_FAILED",

            Event::TaskCancelled => "TASK_CANCELLED",
        }
    }

    /// Returns true for failure events
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::InitScanFailed | Event::CatchUpFailed | Event::PushFailed | Event::CleanupFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
