//! Log entry structure

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One record on its way through the sink: severity, message, time and the
/// merged default and per-call fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    #[serde(skip_serializing_if = "LogContext::is_empty", default)]
    pub fields: LogContext,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
            fields: LogContext::new(),
        }
    }

    pub fn with_fields(mut self, fields: LogContext) -> Self {
        self.fields = fields;
        self
    }

    /// First line of the message
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn is_multiline(&self) -> bool {
        self.message.trim_end().contains('\n')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_has_no_fields() {
        let entry = LogEntry::new(LogLevel::Warn, "disk low");
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.message, "disk low");
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn test_short_message() {
        let entry = LogEntry::new(LogLevel::Error, "first line\nstack trace");
        assert_eq!(entry.short_message(), "first line");
        assert!(entry.is_multiline());

        let entry = LogEntry::new(LogLevel::Error, "single line\n");
        assert!(!entry.is_multiline());
    }
}
