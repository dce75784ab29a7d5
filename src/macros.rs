//! Logging macros for the process-wide facade.
//!
//! The `*ln!` macros take any number of `Display` operands and join them with
//! spaces; the `*f!` macros take a format string like `format!`.
//!
//! # Examples
//!
//! ```
//! use split_logging::{debugf, infoln, warnln};
//!
//! infoln!("server started on port", 8080);
//! warnln!("disk low:", 93, "%");
//! debugf!("retry {} of {}", 3, 5);
//! ```

/// Log a formatted message on any [`Logger`](crate::Logger).
///
/// # Examples
///
/// ```
/// # use split_logging::prelude::*;
/// # let logger = Logger::builder().output(std::io::sink()).build();
/// use split_logging::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.logf($level, format_args!($($arg)+))
    };
}

/// Log operands at fatal level and exit with status 1.
///
/// ```no_run
/// use split_logging::fatalln;
/// fatalln!("cannot open config:", "/etc/app.toml");
/// ```
#[macro_export]
macro_rules! fatalln {
    ($($arg:expr),* $(,)?) => {
        $crate::facade::fatalln(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Log a formatted message at fatal level and exit with status 1.
///
/// ```no_run
/// use split_logging::fatalf;
/// fatalf!("cannot bind port {}", 8080);
/// ```
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::facade::fatalf(format_args!($($arg)+))
    };
}

/// Log operands at info level (`Println`).
#[macro_export]
macro_rules! infoln {
    ($($arg:expr),* $(,)?) => {
        $crate::facade::println(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Log a formatted message at info level (`Printf`).
#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::facade::printf(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! errorln {
    ($($arg:expr),* $(,)?) => {
        $crate::facade::errorln(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::facade::errorf(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warnln {
    ($($arg:expr),* $(,)?) => {
        $crate::facade::warnln(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::facade::warnf(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debugln {
    ($($arg:expr),* $(,)?) => {
        $crate::facade::debugln(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::facade::debugf(format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{FormatterConfig, LogLevel, Logger, TextFormatter};
    use parking_lot::Mutex;
    use std::io::{self, Write};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_log_macro() {
        let out = Capture::default();
        let logger = Logger::builder()
            .formatter(TextFormatter::new(
                FormatterConfig::new()
                    .with_force_colors(false)
                    .with_disable_timestamp(true),
            ))
            .output(out.clone())
            .build();

        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Warn, "Formatted: {}", 42);

        let contents = String::from_utf8(out.0.lock().clone()).unwrap();
        assert!(contents.contains("msg=\"Test message\""));
        assert!(contents.contains("level=warning msg=\"Formatted: 42\""));
    }

    #[test]
    fn test_facade_macros_compile_with_mixed_operands() {
        let attempt = 3;
        debugln!("attempt", attempt, "of", 5.0, true);
        debugf!("attempt {} of {}", attempt, 5);
        debugln!();
    }
}
