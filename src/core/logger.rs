//! The record sink
//!
//! [`Logger`] owns the active formatter, its own direct output, the ordered
//! hook list and the default fields. Every configuration method takes `&self`
//! so a single instance can live in a `static` and be reconfigured while
//! other threads log: log calls take read locks, configuration takes write
//! locks.

use super::{
    error::Result,
    formatter::{Formatter, TextFormatter},
    hook::Hook,
    log_context::LogContext,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use crate::hooks::WriterHook;
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::fmt::{self, Display};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Exit status used by [`Logger::fatal`]
pub const FATAL_EXIT_CODE: i32 = 1;

pub struct Logger {
    formatter: RwLock<Arc<dyn Formatter>>,
    hooks: RwLock<Vec<Arc<dyn Hook>>>,
    output: Mutex<Box<dyn Write + Send>>,
    /// Set while the own output is a null destination, so entries are not
    /// formatted for nothing
    output_discarded: AtomicBool,
    min_level: RwLock<LogLevel>,
    default_fields: RwLock<Option<Arc<LogContext>>>,
    metrics: LoggerMetrics,
    split: AtomicBool,
}

impl Logger {
    /// Create a logger writing colored text to standard error with every
    /// level enabled and no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            formatter: RwLock::new(Arc::new(TextFormatter::default())),
            hooks: RwLock::new(Vec::new()),
            output: Mutex::new(Box::new(io::stderr())),
            output_discarded: AtomicBool::new(false),
            min_level: RwLock::new(LogLevel::Debug),
            default_fields: RwLock::new(None),
            metrics: LoggerMetrics::new(),
            split: AtomicBool::new(false),
        }
    }

    /// Replace the formatter used for the own output and by every hook
    pub fn set_formatter(&self, formatter: Box<dyn Formatter>) {
        *self.formatter.write() = Arc::from(formatter);
    }

    pub fn formatter(&self) -> Arc<dyn Formatter> {
        Arc::clone(&self.formatter.read())
    }

    /// Replace the logger's own direct output
    pub fn set_output<W: Write + Send + 'static>(&self, output: W) {
        *self.output.lock() = Box::new(output);
        self.output_discarded.store(false, Ordering::Release);
    }

    /// Send the logger's own output to a null destination; only hooks see
    /// records afterwards
    pub fn discard_output(&self) {
        *self.output.lock() = Box::new(io::sink());
        self.output_discarded.store(true, Ordering::Release);
    }

    /// Register a hook. Hooks fire in registration order.
    pub fn add_hook(&self, hook: Arc<dyn Hook>) {
        self.hooks.write().push(hook);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.read().len()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= *self.min_level.read()
    }

    /// Install the fields attached to every subsequent record.
    ///
    /// Replaces the previous set wholesale; `None` or an empty context clears.
    pub fn set_default_fields(&self, fields: Option<LogContext>) {
        let fields = fields.filter(|f| !f.is_empty()).map(Arc::new);
        *self.default_fields.write() = fields;
    }

    pub fn default_fields(&self) -> Option<Arc<LogContext>> {
        self.default_fields.read().clone()
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.log_with_fields(level, message, LogContext::new());
    }

    /// Log the operands joined by single spaces
    pub fn logln(&self, level: LogLevel, args: &[&dyn Display]) {
        if !self.is_enabled(level) {
            return;
        }
        self.log(level, join_operands(args));
    }

    /// Log pre-formatted arguments, usually built with `format_args!`
    pub fn logf(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level) {
            return;
        }
        self.log(level, fmt::format(args));
    }

    /// Log with per-call fields. Per-call fields win over default fields on
    /// key collisions.
    pub fn log_with_fields(&self, level: LogLevel, message: impl Into<String>, fields: LogContext) {
        if !self.is_enabled(level) {
            return;
        }

        let mut fields = fields;
        if let Some(defaults) = self.default_fields.read().as_ref() {
            fields.merge_defaults(defaults);
        }

        let entry = LogEntry::new(level, message).with_fields(fields);
        self.dispatch(&entry);
    }

    /// Fire every matching hook, then write to the own output.
    ///
    /// Failures are reported on standard error and counted; they never reach
    /// the caller. A panicking hook does not stop the others.
    fn dispatch(&self, entry: &LogEntry) {
        let formatter = self.formatter();
        let mut has_error = false;

        {
            let hooks = self.hooks.read();
            for (idx, hook) in hooks.iter().enumerate() {
                if !hook.accepts(entry.level) {
                    continue;
                }

                let fire_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    hook.fire(entry, formatter.as_ref())
                }));

                match fire_result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        eprintln!(
                            "[LOGGER ERROR] Failed to fire hook #{} ({}): {}",
                            idx,
                            hook.name(),
                            e
                        );
                        self.metrics.record_hook_failure();
                        has_error = true;
                    }
                    Err(panic_info) => {
                        eprintln!(
                            "[LOGGER CRITICAL] Hook #{} ({}) panicked: {}. \
                             Other hooks continue to function.",
                            idx,
                            hook.name(),
                            panic_message(panic_info.as_ref())
                        );
                        self.metrics.record_hook_failure();
                        has_error = true;
                    }
                }
            }
        }

        if !self.output_discarded.load(Ordering::Acquire) {
            if let Err(e) = self.write_output(entry, formatter.as_ref()) {
                eprintln!("[LOGGER ERROR] Failed to write to log: {}", e);
                self.metrics.record_output_failure();
                has_error = true;
            }
        }

        if has_error {
            self.metrics.record_dropped();
        } else {
            self.metrics.record_logged();
        }
    }

    fn write_output(&self, entry: &LogEntry, formatter: &dyn Formatter) -> Result<()> {
        let bytes = formatter.format(entry)?;
        self.output.lock().write_all(&bytes)?;
        Ok(())
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Log at fatal level, flush, and exit the process with status 1
    pub fn fatal(&self, message: impl Into<String>) -> ! {
        self.log(LogLevel::Fatal, message);
        self.exit()
    }

    /// Log at panic level, then panic with the message
    pub fn panic(&self, message: impl Into<String>) -> ! {
        let message = message.into();
        self.log(LogLevel::Panic, message.clone());
        panic!("{}", message);
    }

    pub(crate) fn exit(&self) -> ! {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// Flush every hook, then the own output.
    ///
    /// A failing destination does not stop the others from being flushed;
    /// the first error is returned once all of them have been tried.
    pub fn flush(&self) -> Result<()> {
        let mut first_error = None;

        for hook in self.hooks.read().iter() {
            if let Err(e) = hook.flush() {
                first_error.get_or_insert(e);
            }
        }
        if let Err(e) = self.output.lock().flush() {
            first_error.get_or_insert(e.into());
        }

        first_error.map_or(Ok(()), Err)
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Route warnings and above to standard error and everything to standard
    /// output, replacing the own output.
    ///
    /// Intended to be called once per process: a second call registers a
    /// second pair of hooks and every record is written twice.
    pub fn split_logs(&self) {
        self.split_logs_to(io::stderr(), io::stdout());
    }

    /// [`split_logs`](Self::split_logs) with caller supplied destinations
    pub fn split_logs_to<E, O>(&self, error_stream: E, output_stream: O)
    where
        E: Write + Send + 'static,
        O: Write + Send + 'static,
    {
        if self.split.swap(true, Ordering::AcqRel) {
            eprintln!(
                "[LOGGER WARNING] split_logs called more than once; \
                 records will be written to each stream again."
            );
        }

        self.discard_output();
        self.add_hook(Arc::new(WriterHook::new(error_stream, &LogLevel::SEVERE)));
        self.add_hook(Arc::new(WriterHook::new(output_stream, &LogLevel::ALL)));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Space-separated rendering of `args`
pub(crate) fn join_operands(args: &[&dyn Display]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use split_logging::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Info)
///     .formatter(JsonFormatter::default())
///     .output(std::io::sink())
///     .default_fields(LogContext::new().with_field("service", "api"))
///     .build();
///
/// logger.info("ready");
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    formatter: Option<Box<dyn Formatter>>,
    output: Option<Box<dyn Write + Send>>,
    hooks: Vec<Arc<dyn Hook>>,
    default_fields: Option<LogContext>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Debug,
            formatter: None,
            output: None,
            hooks: Vec::new(),
            default_fields: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output<W: Write + Send + 'static>(mut self, output: W) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn hook<H: Hook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn default_fields(mut self, fields: LogContext) -> Self {
        self.default_fields = Some(fields);
        self
    }

    pub fn build(self) -> Logger {
        let logger = Logger::new();
        logger.set_min_level(self.min_level);
        if let Some(formatter) = self.formatter {
            logger.set_formatter(formatter);
        }
        if let Some(output) = self.output {
            *logger.output.lock() = output;
        }
        for hook in self.hooks {
            logger.add_hook(hook);
        }
        logger.set_default_fields(self.default_fields);
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
