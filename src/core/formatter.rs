//! Record formatters
//!
//! A [`Formatter`] turns a [`LogEntry`] into the bytes a hook writes. Two
//! implementations are provided:
//! - [`TextFormatter`]: human-readable, optionally colored (default)
//! - [`JsonFormatter`]: one JSON object per line
//!
//! Both are driven by a [`FormatterConfig`].

use super::error::{LoggerError, Result};
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Instant;

/// Timestamp layout installed when no formatter is supplied: `2025-01-08 10:30:45`
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Width the colored layout pads messages to, so fields line up
const MESSAGE_PAD: usize = 44;

/// Serializes log entries to text
pub trait Formatter: Send + Sync {
    /// Render one entry, including the trailing newline
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>>;

    fn name(&self) -> &str;
}

/// Options shared by the built-in formatters
///
/// # Examples
///
/// ```
/// use split_logging::FormatterConfig;
///
/// let config = FormatterConfig::new()
///     .with_timestamp_format("%H:%M:%S")
///     .with_force_colors(false);
/// assert!(config.full_timestamp);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// strftime-compatible timestamp layout
    pub timestamp_format: String,
    /// Emit ANSI colors even when the destination is not a terminal
    pub force_colors: bool,
    /// Print the wall-clock time instead of seconds since start
    pub full_timestamp: bool,
    /// Leave the timestamp out entirely
    pub disable_timestamp: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            force_colors: true,
            full_timestamp: true,
            disable_timestamp: false,
        }
    }
}

impl FormatterConfig {
    /// Create a new formatter configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format_str: &str) -> Self {
        self.timestamp_format = format_str.to_string();
        self
    }

    #[must_use]
    pub fn with_force_colors(mut self, force: bool) -> Self {
        self.force_colors = force;
        self
    }

    #[must_use]
    pub fn with_full_timestamp(mut self, full: bool) -> Self {
        self.full_timestamp = full;
        self
    }

    #[must_use]
    pub fn with_disable_timestamp(mut self, disable: bool) -> Self {
        self.disable_timestamp = disable;
        self
    }

    /// Format `datetime` with the configured layout.
    ///
    /// Fails instead of panicking when the layout contains an invalid
    /// specifier.
    pub fn format_timestamp(&self, datetime: &DateTime<Local>) -> Result<String> {
        let mut out = String::new();
        write!(out, "{}", datetime.format(&self.timestamp_format)).map_err(|_| {
            LoggerError::formatter(
                "timestamp",
                format!("invalid timestamp format '{}'", self.timestamp_format),
            )
        })?;
        Ok(out)
    }
}

/// Human-readable formatter
///
/// With colors: `WARN[2025-01-08 10:30:45] disk low        service=api`
///
/// Without colors: `time="2025-01-08 10:30:45" level=warning msg="disk low" service=api`
pub struct TextFormatter {
    config: FormatterConfig,
    started: Instant,
}

impl TextFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self {
            config,
            started: Instant::now(),
        }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    // Escapes are written directly: `force_colors` must apply even when
    // `colored` would disable styling for a non-terminal destination.
    fn paint(level: LogLevel, text: &str) -> String {
        format!("\x1b[{}m{}\x1b[0m", level.color_code().to_fg_str(), text)
    }

    fn format_colored(&self, entry: &LogEntry) -> Result<String> {
        let mut line = Self::paint(entry.level, entry.level.short_tag());

        if !self.config.disable_timestamp {
            if self.config.full_timestamp {
                let ts = self.config.format_timestamp(&entry.timestamp)?;
                line.push_str(&format!("[{}]", ts));
            } else {
                line.push_str(&format!("[{:04}]", self.started.elapsed().as_secs()));
            }
        }

        line.push_str(&format!(
            " {:<width$}",
            entry.message.trim_end_matches('\n'),
            width = MESSAGE_PAD
        ));

        for (key, value) in entry.fields.fields() {
            line.push_str(&format!(
                " {}={}",
                Self::paint(entry.level, key),
                quote_if_needed(&value.to_string())
            ));
        }

        Ok(line)
    }

    fn format_plain(&self, entry: &LogEntry) -> Result<String> {
        let mut pairs = Vec::with_capacity(entry.fields.len() + 3);

        if !self.config.disable_timestamp {
            let ts = self.config.format_timestamp(&entry.timestamp)?;
            pairs.push(format!("time={}", quote_if_needed(&ts)));
        }
        pairs.push(format!("level={}", entry.level.as_lower_str()));
        pairs.push(format!(
            "msg={}",
            quote_if_needed(entry.message.trim_end_matches('\n'))
        ));

        for (key, value) in entry.fields.fields() {
            pairs.push(format!("{}={}", key, quote_if_needed(&value.to_string())));
        }

        Ok(pairs.join(" "))
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(FormatterConfig::default())
    }
}

impl Formatter for TextFormatter {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let mut line = if self.config.force_colors {
            self.format_colored(entry)?
        } else {
            self.format_plain(entry)?
        };

        line.truncate(line.trim_end().len());
        line.push('\n');
        Ok(line.into_bytes())
    }

    fn name(&self) -> &str {
        "text"
    }
}

/// JSON formatter: `{"level":"warning","msg":"disk low","service":"api","time":"..."}`
///
/// Fields that clash with `time`, `level` or `msg` are stored as
/// `fields.<name>`.
pub struct JsonFormatter {
    config: FormatterConfig,
}

impl JsonFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(FormatterConfig::default().with_force_colors(false))
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let mut json_obj = serde_json::Map::new();

        for (key, value) in entry.fields.fields() {
            let key = match key.as_str() {
                "time" | "level" | "msg" => format!("fields.{}", key),
                _ => key.clone(),
            };
            json_obj.insert(key, value.to_json_value());
        }

        if !self.config.disable_timestamp {
            json_obj.insert(
                "time".to_string(),
                serde_json::Value::String(self.config.format_timestamp(&entry.timestamp)?),
            );
        }
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.as_lower_str().to_string()),
        );
        json_obj.insert(
            "msg".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        let mut bytes = serde_json::to_vec(&serde_json::Value::Object(json_obj))?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// Quote values containing anything beyond a conservative character set
fn quote_if_needed(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-._/@^+".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("{:?}", value)
    }
}
