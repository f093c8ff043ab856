//! Record format shared by [`Logger`](super::Logger) and the tracing subscriber
//!
//! ```text
//! [2025-03-14 09:26:53] INFO: Starting data extraction
//! ```
//!
//! Timestamps are local time. This line shape is what downstream log
//! consumers parse, so both emitters go through [`render_line`] or
//! [`LineFormat`].

use super::level::LogLevel;
use chrono::{DateTime, Local};
use std::fmt::{self, Write as _};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// `YYYY-MM-DD HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render one record, newline included
pub fn render_line(level: LogLevel, timestamp: DateTime<Local>, message: fmt::Arguments<'_>) -> String {
    let mut line = String::with_capacity(64);
    // Writing into a String cannot fail.
    let _ = writeln!(
        line,
        "[{}] {}: {}",
        timestamp.format(TIMESTAMP_FORMAT),
        level.label(),
        message
    );
    line
}

/// `tracing-subscriber` event formatter producing the same line shape
///
/// Structured fields other than the message are appended by the
/// subscriber's field formatter as `key=value` pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = LogLevel::from_tracing(event.metadata().level());
        write!(
            writer,
            "[{}] {}: ",
            Local::now().format(TIMESTAMP_FORMAT),
            level.label()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
