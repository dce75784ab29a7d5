//! # Split Logging
//!
//! A process-wide logging facade over a small structured record sink.
//!
//! ## Features
//!
//! - **Stream splitting**: warnings and above on stderr, everything on stdout
//! - **Default fields**: key/value pairs attached to every record
//! - **Graylog forwarding**: asynchronous GELF over UDP for warnings and above
//! - **Thread safe**: configuration and logging may run concurrently
//!
//! ```no_run
//! use split_logging::prelude::*;
//! use split_logging::{debugf, warnln};
//!
//! facade::initialize(None);
//! facade::split_logs();
//! facade::set_default_fields(Some(LogContext::new().with_field("service", "billing")));
//!
//! warnln!("disk low");      // stderr and stdout
//! debugf!("retry {}", 3);   // stdout only
//! ```

pub mod core;
pub mod facade;
pub mod hooks;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        FieldValue, Formatter, FormatterConfig, Hook, JsonFormatter, LogContext, LogEntry,
        LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result, TextFormatter,
    };
    pub use crate::facade;
    pub use crate::hooks::{GraylogHook, WriterHook};
}

pub use self::core::{
    FieldValue, Formatter, FormatterConfig, Hook, JsonFormatter, LogContext, LogEntry, LogLevel,
    Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result, TextFormatter,
    DEFAULT_TIMESTAMP_FORMAT, FATAL_EXIT_CODE,
};
pub use facade::{
    add_async_graylog_hook, initialize, set_default_fields, split_logs,
};
pub use hooks::{GraylogHook, WriterHook};
