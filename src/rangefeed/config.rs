//! Rangefeed Configuration
//!
//! Loaded from a JSON file or built in code, validated before use, and
//! immutable once a processor is created.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::{RangefeedError, RangefeedResult};

/// What a transaction push attempt does when intent cleanup fails.
///
/// Cleanup is best effort in both cases: the attempt neither waits for it
/// nor fails because of it. Failures are always forwarded to the
/// processor's cleanup report channel when one is installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupFailurePolicy {
    /// Log the failure at WARN
    #[default]
    Log,
    /// Drop the failure without logging
    Ignore,
}

/// Rangefeed task configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangefeedConfig {
    /// Capacity of the shared event queue (default 4096)
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,

    /// Capacity of the catch-up completion queue (default 16).
    ///
    /// Should match the number of concurrent catch-up scans expected.
    #[serde(default = "default_catch_up_queue_capacity")]
    pub catch_up_queue_capacity: usize,

    /// Upper bound on a single push call in milliseconds (default: none)
    #[serde(default)]
    pub push_timeout_ms: Option<u64>,

    /// Cleanup failure handling (default "log")
    #[serde(default)]
    pub cleanup_failure_policy: CleanupFailurePolicy,
}

fn default_event_queue_capacity() -> usize {
    4096
}
fn default_catch_up_queue_capacity() -> usize {
    16
}

impl Default for RangefeedConfig {
    fn default() -> Self {
        Self {
            event_queue_capacity: default_event_queue_capacity(),
            catch_up_queue_capacity: default_catch_up_queue_capacity(),
            push_timeout_ms: None,
            cleanup_failure_policy: CleanupFailurePolicy::default(),
        }
    }
}

impl RangefeedConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> RangefeedResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| RangefeedError::config(format!("Failed to read config: {}", e)))?;

        let config: RangefeedConfig = serde_json::from_str(&content)
            .map_err(|e| RangefeedError::config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> RangefeedResult<()> {
        if self.event_queue_capacity == 0 {
            return Err(RangefeedError::config("event_queue_capacity must be > 0"));
        }

        if self.catch_up_queue_capacity == 0 {
            return Err(RangefeedError::config("catch_up_queue_capacity must be > 0"));
        }

        if self.push_timeout_ms == Some(0) {
            return Err(RangefeedError::config("push_timeout_ms must be > 0 when set"));
        }

        Ok(())
    }

    /// Push timeout as a `Duration`.
    pub fn push_timeout(&self) -> Option<Duration> {
        self.push_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_is_valid() {
        let config = RangefeedConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.event_queue_capacity, 4096);
        assert_eq!(config.catch_up_queue_capacity, 16);
        assert_eq!(config.push_timeout(), None);
        assert_eq!(config.cleanup_failure_policy, CleanupFailurePolicy::Log);
    }

    #[test]
    fn test_load_applies_defaults() {
        let file = write_config(r#"{"event_queue_capacity": 8}"#);
        let config = RangefeedConfig::load(file.path()).unwrap();

        assert_eq!(config.event_queue_capacity, 8);
        assert_eq!(config.catch_up_queue_capacity, 16);
    }

    #[test]
    fn test_load_full() {
        let file = write_config(
            r#"{
                "event_queue_capacity": 100,
                "catch_up_queue_capacity": 4,
                "push_timeout_ms": 250,
                "cleanup_failure_policy": "ignore"
            }"#,
        );
        let config = RangefeedConfig::load(file.path()).unwrap();

        assert_eq!(config.push_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.cleanup_failure_policy, CleanupFailurePolicy::Ignore);
    }

    #[test]
    fn test_load_rejects_zero_capacity() {
        let file = write_config(r#"{"catch_up_queue_capacity": 0}"#);
        let err = RangefeedConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, RangefeedError::Config(_)));
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let file = write_config("not json");
        let err = RangefeedConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config JSON"));
    }

    #[test]
    fn test_zero_timeout_invalid() {
        let config = RangefeedConfig {
            push_timeout_ms: Some(0),
            ..RangefeedConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
