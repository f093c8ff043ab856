//! Leveled logger handed to pipeline stages
//!
//! The threshold is fixed at construction. Records below it are dropped
//! without rendering; `error` records go to stderr, everything else to
//! stdout. Write failures are ignored.

use super::format::render_line;
use super::level::LogLevel;
use chrono::Local;
use std::fmt;
use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;

type StdoutFn = fn() -> io::Stdout;
type StderrFn = fn() -> io::Stderr;

/// Leveled logger writing `[timestamp] LEVEL: message` lines
///
/// `O` receives debug/info/warn records and `E` receives error records.
/// Each record is written with a single `write_all`, so lines from
/// concurrent callers never interleave on the standard streams.
pub struct Logger<O = StdoutFn, E = StderrFn> {
    level: LogLevel,
    out: O,
    err: E,
}

impl Logger {
    /// Create a logger for the standard streams from a level name
    ///
    /// Unknown names (including the empty string) select `info`.
    pub fn new(level_name: &str) -> Self {
        Self::with_level(LogLevel::parse_lenient(level_name))
    }

    /// Create a logger for the standard streams at an explicit level
    pub fn with_level(level: LogLevel) -> Self {
        Logger {
            level,
            out: io::stdout as StdoutFn,
            err: io::stderr as StderrFn,
        }
    }
}

impl<O, E> Logger<O, E>
where
    O: for<'a> MakeWriter<'a>,
    E: for<'a> MakeWriter<'a>,
{
    /// Create a logger with custom sinks for the output and error streams
    pub fn with_writers(level: LogLevel, out: O, err: E) -> Self {
        Logger { level, out, err }
    }

    /// Minimum level this logger emits
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether a record at `level` would be emitted
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    /// Emit a record at `level`
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let line = render_line(level, Local::now(), args);
        // A closed or full stream must not fail the caller.
        let _ = if level >= LogLevel::Error {
            self.err.make_writer().write_all(line.as_bytes())
        } else {
            self.out.make_writer().write_all(line.as_bytes())
        };
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }
}

impl<O, E> fmt::Debug for Logger<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

/// Log a debug record with `format!`-style arguments
///
/// ```ignore
/// log_debug!(logger, "fetched {} rows from {}", rows, table);
/// ```
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(::std::format_args!($($arg)+))
    };
}

/// Log an info record with `format!`-style arguments
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(::std::format_args!($($arg)+))
    };
}

/// Log a warning record with `format!`-style arguments
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(::std::format_args!($($arg)+))
    };
}

/// Log an error record with `format!`-style arguments
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(::std::format_args!($($arg)+))
    };
}
