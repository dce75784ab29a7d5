//! Level-filtered writer hook

use crate::core::{Formatter, Hook, LogEntry, LogLevel, Result};
use parking_lot::Mutex;
use std::io::Write;

/// Writes entries of the configured levels to a destination stream
///
/// # Example
///
/// ```
/// use split_logging::hooks::WriterHook;
/// use split_logging::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::new();
/// logger.discard_output();
/// logger.add_hook(Arc::new(WriterHook::new(std::io::stderr(), &LogLevel::SEVERE)));
/// logger.warn("only warnings and above reach stderr");
/// ```
pub struct WriterHook {
    writer: Mutex<Box<dyn Write + Send>>,
    levels: Vec<LogLevel>,
}

impl WriterHook {
    pub fn new<W: Write + Send + 'static>(writer: W, levels: &[LogLevel]) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            levels: levels.to_vec(),
        }
    }

    /// Hook for `level` and everything more severe
    pub fn at_least<W: Write + Send + 'static>(writer: W, level: LogLevel) -> Self {
        Self::new(writer, &level.and_above())
    }
}

impl Hook for WriterHook {
    fn levels(&self) -> &[LogLevel] {
        &self.levels
    }

    fn fire(&self, entry: &LogEntry, formatter: &dyn Formatter) -> Result<()> {
        let line = formatter.format(entry)?;
        self.writer.lock().write_all(&line)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "writer"
    }
}
