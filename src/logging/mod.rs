//! Leveled logging
//!
//! [`Logger`] is the handle pipeline stages write to. [`init_tracing`]
//! routes the crate's own `tracing` diagnostics through the same format.

pub mod format;
pub mod level;
pub mod logger;
pub mod subscriber;

pub use format::{LineFormat, TIMESTAMP_FORMAT, render_line};
pub use level::LogLevel;
pub use logger::Logger;
pub use subscriber::init_tracing;
