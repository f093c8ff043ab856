//! Config document discovery
//!
//! A document is a file named `config` with a recognized extension. With an
//! explicit search path only that directory is searched (a path naming a
//! file is used as-is); otherwise the default directories are tried in
//! order and the first match wins.

use crate::error::ConfigError;
use config::FileFormat;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Base name of the config document
pub const DOCUMENT_NAME: &str = "config";

/// Default search directories, in order. `~` expands to the home directory.
pub const DEFAULT_SEARCH_DIRS: &[&str] = &[".", "config", "~/.etl-pipeline-in-go"];

/// Structured-data format of a config document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
    Json,
}

impl DocumentFormat {
    /// Recognized extensions in the order they are tried within a directory
    pub const EXTENSIONS: &'static [(&'static str, DocumentFormat)] = &[
        ("yaml", DocumentFormat::Yaml),
        ("yml", DocumentFormat::Yaml),
        ("toml", DocumentFormat::Toml),
        ("json", DocumentFormat::Json),
    ];

    /// Format for a file extension, case-insensitive
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::EXTENSIONS
            .iter()
            .find(|(candidate, _)| *candidate == ext)
            .map(|(_, format)| *format)
    }

    pub(crate) fn file_format(self) -> FileFormat {
        match self {
            DocumentFormat::Yaml => FileFormat::Yaml,
            DocumentFormat::Toml => FileFormat::Toml,
            DocumentFormat::Json => FileFormat::Json,
        }
    }
}

/// A located config document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub format: DocumentFormat,
}

/// Expand the default search directories against a working and home directory
///
/// The home-relative entry is dropped when no home directory is known.
pub fn default_search_dirs(working_dir: &Path, home_dir: Option<&Path>) -> Vec<PathBuf> {
    DEFAULT_SEARCH_DIRS
        .iter()
        .filter_map(|dir| expand_dir(dir, working_dir, home_dir))
        .collect()
}

/// Find `config.<ext>` inside `dir`
pub fn find_in_dir(dir: &Path) -> Option<Document> {
    DocumentFormat::EXTENSIONS.iter().find_map(|(ext, format)| {
        let path = dir.join(format!("{DOCUMENT_NAME}.{ext}"));
        path.is_file().then_some(Document {
            path,
            format: *format,
        })
    })
}

/// Locate the config document
///
/// `search_path` may be relative (to `working_dir`) and may start with `~`.
pub fn locate_document(
    search_path: Option<&Path>,
    working_dir: &Path,
    home_dir: Option<&Path>,
) -> Result<Document, ConfigError> {
    let dirs = match search_path {
        Some(path) => {
            let Some(path) = expand_dir(&path.to_string_lossy(), working_dir, home_dir) else {
                return Err(ConfigError::DocumentNotFound {
                    searched: vec![path.to_path_buf()],
                });
            };
            if path.is_file() {
                // Unknown extensions are read as YAML, the canonical format.
                let format = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(DocumentFormat::from_extension)
                    .unwrap_or(DocumentFormat::Yaml);
                debug!(path = %path.display(), "Using explicit config document");
                return Ok(Document { path, format });
            }
            vec![path]
        }
        None => default_search_dirs(working_dir, home_dir),
    };

    for dir in &dirs {
        if let Some(document) = find_in_dir(dir) {
            debug!(path = %document.path.display(), "Found config document");
            return Ok(document);
        }
        debug!(dir = %dir.display(), "No config document in directory");
    }

    Err(ConfigError::DocumentNotFound { searched: dirs })
}

fn expand_dir(dir: &str, working_dir: &Path, home_dir: Option<&Path>) -> Option<PathBuf> {
    if (dir == "~" || dir.starts_with("~/")) && home_dir.is_none() {
        return None;
    }
    let expanded = shellexpand::tilde_with_context(dir, || {
        home_dir.map(|h| h.to_string_lossy().into_owned())
    });
    let path = Path::new(expanded.as_ref());
    if path == Path::new(".") {
        Some(working_dir.to_path_buf())
    } else {
        Some(working_dir.join(path))
    }
}
