//! Property-based tests for split_logging using proptest

use parking_lot::Mutex;
use proptest::prelude::*;
use split_logging::prelude::*;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
        Just(LogLevel::Panic),
    ]
}

fn plain_logger() -> Logger {
    Logger::builder()
        .formatter(TextFormatter::new(
            FormatterConfig::new()
                .with_force_colors(false)
                .with_disable_timestamp(true),
        ))
        .build()
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);

        let parsed: LogLevel = level.as_lower_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that LogLevel ordering matches the discriminants
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 < level2, val1 < val2);
    }

    /// Test that more severe levels map to lower syslog severities
    #[test]
    fn test_syslog_severity_monotonic(level1 in any_level(), level2 in any_level()) {
        if level1 > level2 {
            prop_assert!(level1.syslog_severity() < level2.syslog_severity());
        }
    }

    /// `and_above` contains exactly the levels at least as severe
    #[test]
    fn test_and_above(min in any_level(), level in any_level()) {
        prop_assert_eq!(min.and_above().contains(&level), level >= min);
    }
}

// ============================================================================
// Routing Tests
// ============================================================================

proptest! {
    /// After splitting, a record reaches the error stream iff it is warn or
    /// more severe, and always reaches the output stream
    #[test]
    fn test_split_routing(level in any_level(), message in "[a-z]{1,16}") {
        let err = Capture::default();
        let out = Capture::default();
        let logger = plain_logger();
        logger.split_logs_to(err.clone(), out.clone());

        logger.log(level, message.clone());

        let needle = format!("msg={}", message);
        prop_assert!(out.contents().contains(&needle));
        prop_assert_eq!(err.contents().contains(&needle), level >= LogLevel::Warn);
    }

    /// Every record carries every default field
    #[test]
    fn test_default_fields_superset(
        fields in prop::collection::btree_map("[a-z]{1,8}", "[a-z0-9]{1,8}", 1..6),
        level in any_level(),
    ) {
        let out = Capture::default();
        let logger = plain_logger();
        logger.set_output(out.clone());
        logger.set_default_fields(Some(fields.clone().into_iter().collect()));

        logger.log(level, "record");

        let line = out.contents();
        for (key, value) in &fields {
            let pair = format!("{}={}", key, value);
            prop_assert!(line.contains(&pair), "missing {} in {}", pair, line);
        }
    }

    /// Line variants join operands with single spaces
    #[test]
    fn test_logln_joins_with_spaces(words in prop::collection::vec("[a-z]{1,6}", 1..5)) {
        let out = Capture::default();
        let logger = Logger::builder()
            .formatter(JsonFormatter::default())
            .output(out.clone())
            .build();

        let operands: Vec<&dyn std::fmt::Display> =
            words.iter().map(|w| w as &dyn std::fmt::Display).collect();
        logger.logln(LogLevel::Info, &operands);

        let value: serde_json::Value = serde_json::from_str(out.contents().trim_end()).unwrap();
        prop_assert_eq!(value["msg"].as_str().unwrap(), words.join(" "));
    }
}
