//! Recording log sink

use crate::logging::{Field, LogSink};
use std::sync::{Mutex, PoisonError};

/// Severity of a recorded entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// `LogSink::info`
    Info,
    /// `LogSink::error`
    Error,
    /// `LogSink::fatal`
    Fatal,
}

/// One recorded log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Severity
    pub level: Level,
    /// Message text
    pub message: String,
    /// Rendered key/value fields, in call order
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Value of the first field named `key`
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// [`LogSink`] that keeps every entry in memory.
///
/// `fatal` records the entry and then panics instead of exiting, so a test
/// can observe that the process would have terminated.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether nothing was logged
    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    fn record(&self, level: Level, message: &str, fields: &[Field<'_>]) {
        let entry = LogEntry {
            level,
            message: message.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

impl LogSink for RecordingSink {
    fn info(&self, message: &str, fields: &[Field<'_>]) {
        self.record(Level::Info, message, fields);
    }

    fn error(&self, message: &str, fields: &[Field<'_>]) {
        self.record(Level::Error, message, fields);
    }

    fn fatal(&self, message: &str, fields: &[Field<'_>]) -> ! {
        self.record(Level::Fatal, message, fields);
        panic!("fatal: {}", message)
    }
}
