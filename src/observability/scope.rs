//! TaskScope for automatic begin/complete logging
//!
//! - Logs the BEGIN event on creation
//! - Logs COMPLETE / FAILED / CANCELLED when finished explicitly
//! - Logs an INCOMPLETE warning when dropped unfinished (the task's future
//!   was dropped mid-run)

use std::time::Instant;

use super::events::Event;

/// A scope that logs the lifecycle of one task run
///
/// # Usage
///
/// ```ignore
/// let scope = TaskScope::new(Event::CatchUpBegin, registration_id);
/// // ... do work ...
/// scope.complete(Event::CatchUpComplete);
/// ```
pub struct TaskScope {
    begin: Event,
    subject: String,
    started: Instant,
    finished: bool,
}

impl TaskScope {
    /// Create a new scope. Logs `begin` immediately at INFO.
    pub fn new(begin: Event, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        tracing::info!(event = %begin, subject = %subject);
        Self {
            begin,
            subject,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Mark the task as completed. Logs `event` at INFO.
    pub fn complete(mut self, event: Event) {
        self.finished = true;
        tracing::info!(
            event = %event,
            subject = %self.subject,
            elapsed_ms = self.started.elapsed().as_millis() as u64
        );
    }

    /// Mark the task as failed. Logs `event` at ERROR.
    pub fn fail(mut self, event: Event, reason: &dyn std::fmt::Display) {
        self.finished = true;
        tracing::error!(
            event = %event,
            subject = %self.subject,
            reason = %reason,
            elapsed_ms = self.started.elapsed().as_millis() as u64
        );
    }

    /// Mark the task as cancelled. Logs at INFO; cancellation is not a fault.
    pub fn cancelled(mut self) {
        self.finished = true;
        tracing::info!(
            event = %Event::TaskCancelled,
            task = %self.begin,
            subject = %self.subject
        );
    }

    /// Check if the scope has been finished
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                event = %self.begin,
                subject = %self.subject,
                "scope dropped without completion"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_starts_unfinished() {
        let scope = TaskScope::new(Event::InitScanBegin, "[a, z)");
        assert!(!scope.is_finished());
        scope.complete(Event::InitScanComplete);
    }

    #[test]
    fn test_scope_fail() {
        let scope = TaskScope::new(Event::PushBegin, "3 txns");
        scope.fail(Event::PushFailed, &"rpc unavailable");
    }

    #[test]
    fn test_scope_cancelled() {
        let scope = TaskScope::new(Event::CatchUpBegin, "r1");
        scope.cancelled();
    }

    #[test]
    fn test_scope_drop_without_finish() {
        // Logs a warning, must not panic
        let scope = TaskScope::new(Event::CatchUpBegin, "r2");
        drop(scope);
    }
}
