//! Process-wide logging facade
//!
//! One [`Logger`] is created lazily on first use and shared by every function
//! in this module. Configure it once at startup (`initialize`, `split_logs`,
//! `add_async_graylog_hook`, `set_default_fields`), then log from anywhere.
//! Configuration may run concurrently with logging; the logger's locks keep
//! each record consistent with one configuration.
//!
//! Logging functions never return errors. Failures show up on standard error
//! and in [`Logger::metrics`].

use crate::core::{
    Formatter, FormatterConfig, LogContext, LogLevel, Logger, Result, TextFormatter,
};
use crate::hooks::GraylogHook;
use once_cell::sync::Lazy;
use std::fmt::{self, Display};
use std::sync::Arc;

static LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

/// The process-wide logger
pub fn logger() -> &'static Logger {
    &LOGGER
}

/// Install `formatter`, or the default colored text formatter with
/// `YYYY-MM-DD HH:MM:SS` timestamps when `None`. The last call wins.
pub fn initialize(formatter: Option<Box<dyn Formatter>>) -> &'static Logger {
    let formatter = formatter
        .unwrap_or_else(|| Box::new(TextFormatter::new(FormatterConfig::default())));
    LOGGER.set_formatter(formatter);
    &LOGGER
}

/// Replace the fields attached to every subsequent record; `None` clears
pub fn set_default_fields(fields: Option<LogContext>) {
    LOGGER.set_default_fields(fields);
}

/// Send warnings and above to standard error, everything to standard output.
///
/// Call once per process; see [`Logger::split_logs`].
pub fn split_logs() {
    LOGGER.split_logs();
}

/// Forward warnings and above to the Graylog input at `host:port`, with
/// `extra` attached to every forwarded record
pub fn add_async_graylog_hook(host: &str, port: &str, extra: LogContext) -> Result<()> {
    let hook = GraylogHook::builder(format!("{}:{}", host, port))
        .with_extra(extra)
        .with_min_level(LogLevel::Warn)
        .build()?;
    LOGGER.add_hook(Arc::new(hook));
    Ok(())
}

/// Log at fatal level, then exit with status 1
pub fn fatalln(args: &[&dyn Display]) -> ! {
    LOGGER.logln(LogLevel::Fatal, args);
    LOGGER.exit()
}

/// Log at fatal level, then exit with status 1
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    LOGGER.logf(LogLevel::Fatal, args);
    LOGGER.exit()
}

/// Log at info level
pub fn println(args: &[&dyn Display]) {
    LOGGER.logln(LogLevel::Info, args);
}

/// Log at info level
pub fn printf(args: fmt::Arguments<'_>) {
    LOGGER.logf(LogLevel::Info, args);
}

pub fn errorln(args: &[&dyn Display]) {
    LOGGER.logln(LogLevel::Error, args);
}

pub fn errorf(args: fmt::Arguments<'_>) {
    LOGGER.logf(LogLevel::Error, args);
}

pub fn warnln(args: &[&dyn Display]) {
    LOGGER.logln(LogLevel::Warn, args);
}

pub fn warnf(args: fmt::Arguments<'_>) {
    LOGGER.logf(LogLevel::Warn, args);
}

pub fn debugln(args: &[&dyn Display]) {
    LOGGER.logln(LogLevel::Debug, args);
}

pub fn debugf(args: fmt::Arguments<'_>) {
    LOGGER.logf(LogLevel::Debug, args);
}
