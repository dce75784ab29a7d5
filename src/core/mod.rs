//! Core logger types and traits

pub mod error;
pub mod formatter;
pub mod hook;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;

pub use error::{LoggerError, Result};
pub use formatter::{
    Formatter, FormatterConfig, JsonFormatter, TextFormatter, DEFAULT_TIMESTAMP_FORMAT,
};
pub use hook::Hook;
pub use log_context::{FieldValue, LogContext};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use metrics::LoggerMetrics;
