//! ETL pipeline
//!
//! Configuration resolution and leveled logging for a three-stage
//! extract/transform/load pipeline.
//!
//! ## Configuration
//!
//! A `config.yaml` (or `.yml`, `.toml`, `.json`) document is searched for in
//! the working directory, `./config` and `~/.etl-pipeline-in-go`. Environment
//! variables named after a key override it, and `${NAME}` values are
//! substituted from the environment:
//!
//! ```yaml
//! app:
//!   name: orders-etl
//!   log_level: info           # ETL_APP_LOG_LEVEL
//! extract:
//!   database:
//!     host: db.internal       # ETL_EXTRACT_DATABASE_HOST
//!     password: ${DB_PASS}    # read from $DB_PASS
//! ```
//!
//! ## Logging
//!
//! ```text
//! [2025-03-14 09:26:53] INFO: Starting data extraction for orders-etl 1.0.0
//! ```
//!
//! Error records go to stderr, everything else to stdout.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod util;

// Re-export main types
pub use crate::config::{EtlConfig, Resolver, resolve};
pub use crate::error::ConfigError;
pub use crate::logging::{LogLevel, Logger};
