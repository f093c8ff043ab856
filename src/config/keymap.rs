//! Flat key map between the parsed document and the typed schema
//!
//! Resolution works on an ordered map of dotted keys (`extract.api.url`) to
//! raw leaf values. The document is flattened into it, the environment
//! overlay and placeholder interpolation rewrite it, and [`KeyMap::bind`]
//! turns it into the typed configuration in one pass.

use crate::error::ConfigError;
use config::{Config, Map, Value, ValueKind};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::debug;

/// Document keys renamed before binding (legacy, canonical)
const LEGACY_KEYS: &[(&str, &str)] = &[("transform.woker_pool_size", "transform.worker_pool_size")];

/// Separator for list values supplied through overlay variables
pub const ENV_LIST_SEPARATOR: char = ',';

/// Shape of a leaf in the typed schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafShape {
    Scalar,
    List,
}

/// Every leaf key of a schema type, with its shape
///
/// Enumerated from the serialized default value, so keys absent from a
/// document can still be overlaid from the environment.
pub fn schema_keys<T: Default + Serialize>() -> BTreeMap<String, LeafShape> {
    let mut keys = BTreeMap::new();
    if let Ok(value) = serde_json::to_value(T::default()) {
        collect_schema_keys(String::new(), &value, &mut keys);
    }
    keys
}

fn collect_schema_keys(
    prefix: String,
    value: &serde_json::Value,
    keys: &mut BTreeMap<String, LeafShape>,
) {
    match value {
        serde_json::Value::Object(fields) => {
            for (name, child) in fields {
                collect_schema_keys(join_key(&prefix, name), child, keys);
            }
        }
        serde_json::Value::Array(_) => {
            keys.insert(prefix, LeafShape::List);
        }
        _ => {
            keys.insert(prefix, LeafShape::Scalar);
        }
    }
}

/// Overlay variable name for a key: `extract.api.url` with prefix `ETL`
/// becomes `ETL_EXTRACT_API_URL`
pub fn env_var_name(prefix: &str, key: &str) -> String {
    format!("{}_{}", prefix, key.to_uppercase().replace('.', "_"))
}

/// Ordered map of dotted keys to raw leaf values
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    entries: BTreeMap<String, Value>,
}

impl KeyMap {
    /// Flatten a parsed document table
    ///
    /// Null leaves count as absent.
    pub fn from_table(table: Map<String, Value>) -> Self {
        let mut entries = BTreeMap::new();
        for (name, value) in table {
            flatten_into(name.to_lowercase(), value, &mut entries);
        }
        for (legacy, canonical) in LEGACY_KEYS {
            if let Some(value) = entries.remove(*legacy) {
                entries.entry((*canonical).to_string()).or_insert(value);
            }
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.entries.iter_mut()
    }

    /// Apply `<PREFIX>_<KEY>` overlay variables
    ///
    /// Every schema key and every key already in the map is consulted. Set,
    /// non-empty variables replace the current value; list-shaped keys take
    /// a comma-separated value. Returns the number of keys overridden.
    pub fn overlay_env(
        &mut self,
        prefix: &str,
        schema: &BTreeMap<String, LeafShape>,
        env: &BTreeMap<String, String>,
    ) -> usize {
        let mut candidates: BTreeMap<String, LeafShape> = schema.clone();
        for (key, value) in &self.entries {
            let shape = match value.kind {
                ValueKind::Array(_) => LeafShape::List,
                _ => LeafShape::Scalar,
            };
            candidates.entry(key.clone()).or_insert(shape);
        }

        let mut applied = 0;
        for (key, shape) in candidates {
            let var = env_var_name(prefix, &key);
            let Some(raw) = env.get(&var).filter(|v| !v.is_empty()) else {
                continue;
            };
            let kind = match shape {
                LeafShape::Scalar => ValueKind::String(raw.clone()),
                LeafShape::List => ValueKind::Array(
                    raw.split(ENV_LIST_SEPARATOR)
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(|item| Value::new(Some(&var), ValueKind::String(item.to_string())))
                        .collect(),
                ),
            };
            debug!(key = %key, var = %var, "Environment overlay applied");
            self.entries.insert(key, Value::new(Some(&var), kind));
            applied += 1;
        }
        applied
    }

    /// Drop keys the schema does not know
    ///
    /// Returns the dropped keys, which are logged at debug level.
    pub fn retain_schema(&mut self, schema: &BTreeMap<String, LeafShape>) -> Vec<String> {
        let mut dropped = Vec::new();
        self.entries.retain(|key, _| {
            let known = schema.contains_key(key);
            if !known {
                dropped.push(key.clone());
            }
            known
        });
        for key in &dropped {
            debug!(key = %key, "Ignoring unknown configuration key");
        }
        dropped
    }

    /// Bind the resolved keys into a typed value
    pub fn bind<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
        let builder = self
            .entries
            .into_iter()
            .try_fold(Config::builder(), |builder, (key, value)| {
                builder.set_override(key, value)
            })
            .map_err(ConfigError::Unmarshal)?;

        builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(ConfigError::Unmarshal)
    }
}

// Keys are case-insensitive; the schema spells them in lowercase.
fn flatten_into(key: String, value: Value, entries: &mut BTreeMap<String, Value>) {
    match value.kind {
        ValueKind::Table(table) => {
            for (name, child) in table {
                flatten_into(join_key(&key, &name.to_lowercase()), child, entries);
            }
        }
        ValueKind::Nil => {}
        _ => {
            entries.insert(key, value);
        }
    }
}

fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
