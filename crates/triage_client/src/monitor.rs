//! Bounded in-memory error log for diagnostics.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::error;
use triage_error::ApiError;

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLogEntry {
    /// Human-readable detail message.
    pub message: String,
    /// Symbolic error code.
    pub code: &'static str,
    /// HTTP-like numeric form of the error.
    pub status_code: u16,
    /// Where the failure was observed (e.g. the operation name).
    pub context: String,
    /// When the failure was recorded.
    pub occurred_at: DateTime<Utc>,
}

/// Bounded ring of recent failures.
///
/// Pass a shared instance explicitly into whatever needs it; each test can
/// construct its own isolated monitor. Recording also emits a
/// `tracing::error!` event, so entries show up in logs without a separate
/// query.
#[derive(Debug)]
pub struct ErrorMonitor {
    entries: Mutex<VecDeque<ErrorLogEntry>>,
    capacity: usize,
}

impl Default for ErrorMonitor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl ErrorMonitor {
    /// Default number of retained entries.
    pub const DEFAULT_CAPACITY: usize = 1000;

    /// Create a monitor retaining at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Record a classified failure observed in `context`.
    pub fn record(&self, context: &str, err: &ApiError) {
        error!(
            context,
            code = err.kind().code(),
            status = err.status_code(),
            error = %err,
            "recorded API failure"
        );

        let entry = ErrorLogEntry {
            message: err.message().to_string(),
            code: err.kind().code(),
            status_code: err.status_code(),
            context: context.to_string(),
            occurred_at: Utc::now(),
        };

        let mut entries = self.entries.lock().unwrap();
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// The most recent entries, oldest first, at most `limit` of them.
    pub fn recent(&self, limit: usize) -> Vec<ErrorLogEntry> {
        let entries = self.entries.lock().unwrap();
        let skip = entries.len().saturating_sub(limit);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether any failures have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Discard all retained entries.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_to_capacity() {
        let monitor = ErrorMonitor::new(3);
        for i in 0..5 {
            monitor.record("test", &ApiError::upstream(Some(503), format!("failure {}", i)));
        }

        assert_eq!(monitor.len(), 3);
        let recent = monitor.recent(10);
        assert_eq!(recent[0].message, "failure 2");
        assert_eq!(recent[2].message, "failure 4");
    }

    #[test]
    fn recent_returns_the_tail() {
        let monitor = ErrorMonitor::default();
        for i in 0..4 {
            monitor.record("test", &ApiError::upstream(None, format!("failure {}", i)));
        }

        let recent = monitor.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[1].message, "failure 3");
        assert_eq!(recent[1].status_code, 502);
    }
}
