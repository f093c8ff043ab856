//! Pipeline stages
//!
//! Only extraction planning exists: connectors are external collaborators
//! that consume the resolved configuration sections.

use crate::config::{EtlConfig, SourceKind};
use crate::logging::Logger;
use crate::{log_debug, log_info, log_warn};
use tracing_subscriber::fmt::MakeWriter;

/// Report which sources the extract stage would read from
///
/// Returns the configured source kinds in declaration order.
pub fn run_extract<O, E>(config: &EtlConfig, logger: &Logger<O, E>) -> Vec<SourceKind>
where
    O: for<'a> MakeWriter<'a>,
    E: for<'a> MakeWriter<'a>,
{
    log_info!(
        logger,
        "Starting data extraction for {} {}",
        display_or(&config.app.name, "<unnamed>"),
        config.app.version
    );

    let sources = config.configured_sources();
    if sources.is_empty() {
        log_warn!(logger, "No extract sources configured");
        return sources;
    }

    for source in &sources {
        match source {
            SourceKind::Api => {
                let api = &config.extract.api;
                log_debug!(
                    logger,
                    "api: {} {} (timeout {}s, {} retries)",
                    display_or(&api.method, "GET"),
                    api.url,
                    api.timeout_seconds,
                    api.retry_attempts
                );
            }
            SourceKind::Database => {
                let db = &config.extract.database;
                log_debug!(
                    logger,
                    "database: {}@{}:{}/{} (batch size {})",
                    db.user,
                    db.host,
                    db.port,
                    db.database,
                    db.batch_size
                );
            }
            SourceKind::Kafka => {
                let kafka = &config.extract.kafka;
                log_debug!(
                    logger,
                    "kafka: topic {} on [{}] as group {}",
                    kafka.topic,
                    kafka.brokers.join(", "),
                    kafka.group_id
                );
            }
        }
    }

    let names: Vec<String> = sources.iter().map(ToString::to_string).collect();
    log_info!(logger, "Extraction planned for sources: {}", names.join(", "));
    sources
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}
