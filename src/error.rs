//! Error types for etl-pipeline
//!
//! Configuration resolution is all-or-nothing: every failure surfaces as a
//! single [`ConfigError`] and no partially resolved configuration escapes.
//! The logger never reports errors to its caller.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration resolution errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No config document found (searched: {})", display_dirs(.searched))]
    DocumentNotFound { searched: Vec<PathBuf> },

    #[error("Failed to parse config document {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    #[error("Failed to unmarshal config: {0}")]
    Unmarshal(#[source] config::ConfigError),

    #[error("Placeholder '${{{name}}}' in '{key}' references an unset environment variable")]
    MissingEnvPlaceholder { key: String, name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_dirs(dirs: &[PathBuf]) -> String {
    if dirs.is_empty() {
        return "<none>".to_string();
    }
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for configuration resolution
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
