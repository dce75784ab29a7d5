//! Hook trait for level-filtered log destinations

use super::{error::Result, formatter::Formatter, log_entry::LogEntry, log_level::LogLevel};

/// A handler the [`Logger`](super::Logger) fires for every record whose level
/// is in [`Hook::levels`].
pub trait Hook: Send + Sync {
    /// Levels this hook fires for
    fn levels(&self) -> &[LogLevel];

    /// Handle one entry, serializing it with the sink's active formatter when
    /// the hook needs text
    fn fire(&self, entry: &LogEntry, formatter: &dyn Formatter) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;

    fn accepts(&self, level: LogLevel) -> bool {
        self.levels().contains(&level)
    }
}
