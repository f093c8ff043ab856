//! Configuration types for etl-pipeline
//!
//! Every leaf is a string, an integer, or an ordered list of strings. All
//! fields are optional; anything the document, the environment overlay and
//! placeholder resolution leave unset keeps its zero value.

use crate::logging::LogLevel;
use crate::util::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EtlConfig {
    /// Application identity and logging
    pub app: AppConfig,

    /// Source connectors
    pub extract: ExtractConfig,

    /// Transformation settings
    pub transform: TransformConfig,

    /// Sink connectors
    pub load: LoadConfig,
}

impl EtlConfig {
    /// Source sections that carry settings, in declaration order
    pub fn configured_sources(&self) -> Vec<SourceKind> {
        let mut sources = Vec::new();
        if !self.extract.api.url.is_empty() {
            sources.push(SourceKind::Api);
        }
        if !self.extract.database.host.is_empty() {
            sources.push(SourceKind::Database);
        }
        if !self.extract.kafka.brokers.is_empty() || !self.extract.kafka.topic.is_empty() {
            sources.push(SourceKind::Kafka);
        }
        sources
    }

    /// Sink sections that carry settings, in declaration order
    pub fn configured_sinks(&self) -> Vec<SinkKind> {
        let mut sinks = Vec::new();
        if !self.load.postgres.host.is_empty() {
            sinks.push(SinkKind::Postgres);
        }
        if !self.load.bigquery.project_id.is_empty() {
            sinks.push(SinkKind::BigQuery);
        }
        if !self.load.s3.bucket.is_empty() {
            sinks.push(SinkKind::S3);
        }
        sinks
    }
}

/// General application settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,

    pub version: String,

    /// debug, info, warn or error (case-insensitive, unknown means info)
    pub log_level: LogLevel,
}

/// Source connector settings, one sub-section per source kind
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub api: ApiSourceConfig,
    pub database: DatabaseSourceConfig,
    pub kafka: KafkaSourceConfig,
}

/// HTTP API source
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiSourceConfig {
    pub url: String,

    /// HTTP method (GET, POST, ...)
    pub method: String,

    pub auth_token: SecretString,

    pub timeout_seconds: i64,

    /// Negative values are passed through to the connector (e.g. -1 for no limit)
    pub retry_attempts: i64,
}

/// Relational database source
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSourceConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub database: String,

    /// Extraction query text
    pub query: String,

    /// Rows fetched per round trip
    pub batch_size: i64,
}

/// Kafka source
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct KafkaSourceConfig {
    /// Bootstrap brokers, in connection order
    pub brokers: Vec<String>,

    pub topic: String,

    pub group_id: String,

    /// earliest, latest, ...
    pub auto_offset_reset: String,
}

/// Transformation settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Worker threads; 0 leaves the choice to the transform stage
    pub worker_pool_size: u32,

    pub validation: ValidationConfig,
}

/// Record validation rules
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Fields every record must carry
    pub required_fields: Vec<String>,
}

/// Sink connector settings, one sub-section per sink kind
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadConfig {
    pub postgres: PostgresSinkConfig,
    pub bigquery: BigQuerySinkConfig,
    pub s3: S3SinkConfig,
}

/// Postgres sink
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PostgresSinkConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub database: String,
    pub table: String,

    /// Rows written per statement
    pub batch_size: i64,
}

/// BigQuery sink
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BigQuerySinkConfig {
    pub project_id: String,
    pub dataset: String,
    pub table: String,
}

/// S3 object storage sink
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct S3SinkConfig {
    pub bucket: String,
    pub region: String,

    /// Key prefix inside the bucket
    pub path: String,

    /// Output file format (csv, json, parquet, ...)
    pub file_format: String,
}

/// Source connector kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Api,
    Database,
    Kafka,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Api => "api",
            SourceKind::Database => "database",
            SourceKind::Kafka => "kafka",
        })
    }
}

/// Sink connector kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Postgres,
    BigQuery,
    S3,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SinkKind::Postgres => "postgres",
            SinkKind::BigQuery => "bigquery",
            SinkKind::S3 => "s3",
        })
    }
}
