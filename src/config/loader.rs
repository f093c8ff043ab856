//! Configuration resolver with layered sources
//!
//! Resolution runs in a fixed order:
//! 1. Locate the `config` document (see [`locate`](super::locate))
//! 2. Parse it; malformed syntax fails before anything else happens
//! 3. Drop document keys the schema does not know
//! 4. Overlay `ETL_*` environment variables onto every schema key
//! 5. Substitute `${NAME}` placeholders from the environment
//! 6. Bind the resolved keys into [`EtlConfig`]
//!
//! Precedence (highest to lowest): placeholder substitution of the final
//! value, environment overlay, document, zero value.

use super::keymap::{KeyMap, schema_keys};
use super::locate::{Document, DocumentFormat, locate_document};
use super::placeholder::{PlaceholderPolicy, interpolate};
use super::types::EtlConfig;
use crate::error::ConfigError;
use config::{File, Source};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of environment overlay variables
pub const ENV_PREFIX: &str = "ETL";

/// Resolve the configuration from the process environment
///
/// Without a search path the working directory, `./config` and
/// `~/.etl-pipeline-in-go` are searched in that order.
pub fn resolve(search_path: Option<&Path>) -> Result<EtlConfig, ConfigError> {
    let resolver = match search_path {
        Some(path) => Resolver::new().search_path(path),
        None => Resolver::new(),
    };
    resolver.resolve()
}

/// Resolve a document given as a string (useful for testing)
///
/// The environment overlay and placeholders still apply.
pub fn resolve_from_str(content: &str, format: DocumentFormat) -> Result<EtlConfig, ConfigError> {
    Resolver::new().resolve_str(content, format)
}

/// Configurable resolver
///
/// Anything left unset falls back to the process: current directory, home
/// directory, environment variables.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    search_path: Option<PathBuf>,
    working_dir: Option<PathBuf>,
    home_dir: Option<PathBuf>,
    env: Option<BTreeMap<String, String>>,
    policy: PlaceholderPolicy,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search only this directory (or use this file directly)
    pub fn search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// Directory the default search locations are relative to
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Home directory used for `~/.etl-pipeline-in-go`
    pub fn home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    /// Use a fixed environment instead of the process environment
    pub fn env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn placeholder_policy(mut self, policy: PlaceholderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Locate the config document without reading it
    pub fn locate(&self) -> Result<Document, ConfigError> {
        let working_dir = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let home_dir = self.home_dir.clone().or_else(dirs::home_dir);
        locate_document(
            self.search_path.as_deref(),
            &working_dir,
            home_dir.as_deref(),
        )
    }

    /// Run the full resolution
    pub fn resolve(&self) -> Result<EtlConfig, ConfigError> {
        let document = self.locate()?;
        debug!(path = %document.path.display(), "Loading configuration");

        let table = File::from(document.path.as_path())
            .format(document.format.file_format())
            .required(true)
            .collect()
            .map_err(|source| ConfigError::Parse {
                path: document.path.clone(),
                source,
            })?;

        self.finish(KeyMap::from_table(table))
    }

    /// Resolve an in-memory document
    pub fn resolve_str(&self, content: &str, format: DocumentFormat) -> Result<EtlConfig, ConfigError> {
        let table = File::from_str(content, format.file_format())
            .collect()
            .map_err(|source| ConfigError::Parse {
                path: PathBuf::from("<string>"),
                source,
            })?;

        self.finish(KeyMap::from_table(table))
    }

    fn finish(&self, mut keys: KeyMap) -> Result<EtlConfig, ConfigError> {
        let env = self.env_snapshot();
        let schema = schema_keys::<EtlConfig>();

        let ignored = keys.retain_schema(&schema).len();
        let overridden = keys.overlay_env(ENV_PREFIX, &schema, &env);
        let stats = interpolate(&mut keys, &env, self.policy)?;
        debug!(
            keys = keys.len(),
            overridden,
            ignored,
            substituted = stats.substituted,
            unresolved = stats.unresolved,
            "Configuration keys resolved"
        );

        keys.bind()
    }

    fn env_snapshot(&self) -> BTreeMap<String, String> {
        match &self.env {
            Some(env) => env.clone(),
            None => std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use std::fs;
    use tempfile::TempDir;

    const DOCUMENT: &str = r#"
app:
  name: orders-etl
  version: 1.2.0
  log_level: DEBUG
extract:
  api:
    url: http://a
    method: GET
    auth_token: ${API_TOKEN}
    timeout_seconds: 30
    retry_attempts: 3
  kafka:
    brokers:
      - k1:9092
      - k2:9092
    topic: orders
transform:
  worker_pool_size: 4
"#;

    fn resolver_in(dir: &TempDir) -> Resolver {
        Resolver::new()
            .working_dir(dir.path())
            .home_dir(dir.path().join("home"))
            .env(Vec::<(String, String)>::new())
    }

    #[test]
    fn test_resolve_document_literals() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), DOCUMENT).unwrap();

        let config = resolver_in(&dir).resolve().unwrap();
        assert_eq!(config.app.name, "orders-etl");
        assert_eq!(config.app.version, "1.2.0");
        assert_eq!(config.app.log_level, LogLevel::Debug);
        assert_eq!(config.extract.api.timeout_seconds, 30);
        assert_eq!(config.extract.kafka.brokers, vec!["k1:9092", "k2:9092"]);
        assert_eq!(config.extract.api.auth_token.expose_secret(), "${API_TOKEN}");
        assert_eq!(config.transform.worker_pool_size, 4);
        assert!(config.load.s3.bucket.is_empty());
    }

    #[test]
    fn test_overlay_then_placeholder() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), DOCUMENT).unwrap();

        let config = resolver_in(&dir)
            .env([
                ("ETL_EXTRACT_API_URL", "http://b"),
                ("ETL_LOAD_POSTGRES_PASSWORD", "${PG_PASS}"),
                ("PG_PASS", "pg-secret"),
                ("API_TOKEN", "tok-1"),
            ])
            .resolve()
            .unwrap();

        assert_eq!(config.extract.api.url, "http://b");
        assert_eq!(config.load.postgres.password.expose_secret(), "pg-secret");
        assert_eq!(config.extract.api.auth_token.expose_secret(), "tok-1");
    }

    #[test]
    fn test_resolve_from_str_toml() {
        let config = Resolver::new()
            .env([("ETL_LOAD_S3_REGION", "eu-west-1")])
            .resolve_str(
                "[load.s3]\nbucket = \"landing\"\nfile_format = \"parquet\"\n",
                DocumentFormat::Toml,
            )
            .unwrap();
        assert_eq!(config.load.s3.bucket, "landing");
        assert_eq!(config.load.s3.region, "eu-west-1");
    }

    #[test]
    fn test_strict_policy_propagates() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), DOCUMENT).unwrap();

        let result = resolver_in(&dir)
            .placeholder_policy(PlaceholderPolicy::Strict)
            .resolve();
        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvPlaceholder { ref name, .. }) if name == "API_TOKEN"
        ));
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "app:\n  name: [unclosed\n").unwrap();

        // Strict policy with an unset placeholder would also fail; parse must win.
        let result = resolver_in(&dir)
            .placeholder_policy(PlaceholderPolicy::Strict)
            .resolve();
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_type_mismatch_is_unmarshal_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "extract:\n  database:\n    port: not-a-number\n",
        )
        .unwrap();

        let result = resolver_in(&dir).resolve();
        assert!(matches!(result, Err(ConfigError::Unmarshal(_))));
    }

    #[test]
    fn test_nothing_found() {
        let dir = TempDir::new().unwrap();
        let result = resolver_in(&dir).resolve();
        assert!(matches!(result, Err(ConfigError::DocumentNotFound { .. })));
    }
}
