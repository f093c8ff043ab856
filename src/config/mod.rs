//! Configuration module
//!
//! Resolves the pipeline configuration from a `config` document, `ETL_*`
//! environment overlay variables and `${NAME}` placeholders.

pub mod keymap;
pub mod loader;
pub mod locate;
pub mod placeholder;
pub mod types;

pub use loader::{ENV_PREFIX, Resolver, resolve, resolve_from_str};
pub use locate::{Document, DocumentFormat, locate_document};
pub use placeholder::PlaceholderPolicy;
pub use types::*;
