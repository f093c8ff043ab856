//! Process-wide tracing subscriber
//!
//! Library diagnostics (document discovery, overlay and placeholder
//! decisions) are emitted through `tracing`. This installs a subscriber
//! that renders them in the same line format and stream routing as
//! [`Logger`](super::Logger).

use super::format::LineFormat;
use super::level::LogLevel;
use std::io;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `level` when set. Returns `false` if a
/// global subscriber was already installed.
pub fn init_tracing(level: LogLevel) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.name()));

    let writer = io::stderr
        .with_max_level(tracing::Level::ERROR)
        .or_else(io::stdout);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(LineFormat)
                .with_ansi(false)
                .with_writer(writer),
        )
        .with(filter)
        .try_init()
        .is_ok()
}
