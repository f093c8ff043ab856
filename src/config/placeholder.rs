//! `${NAME}` placeholder interpolation
//!
//! A value is a placeholder only when the whole string starts with `${` and
//! ends with `}`. The inner name is looked up verbatim (no prefix, exact
//! case) in the environment. Substitution is a single pass; a substituted
//! value is never re-scanned.

use super::keymap::KeyMap;
use crate::error::ConfigError;
use config::{Value, ValueKind};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// What to do when a placeholder's variable is unset or empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderPolicy {
    /// Leave the placeholder text in place
    #[default]
    Passthrough,
    /// Fail resolution with `MissingEnvPlaceholder`
    Strict,
}

/// Inner name of a placeholder value, if it is one
pub fn placeholder_name(value: &str) -> Option<&str> {
    value.strip_prefix("${")?.strip_suffix('}')
}

/// Counts from one interpolation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterpolationStats {
    pub substituted: usize,
    pub unresolved: usize,
}

/// Replace placeholders in every string value (and string list element)
pub fn interpolate(
    keys: &mut KeyMap,
    env: &BTreeMap<String, String>,
    policy: PlaceholderPolicy,
) -> Result<InterpolationStats, ConfigError> {
    let mut stats = InterpolationStats::default();

    for (key, value) in keys.iter_mut() {
        if let ValueKind::Array(items) = &mut value.kind {
            for item in items.iter_mut() {
                resolve_value(key, item, env, policy, &mut stats)?;
            }
        } else {
            resolve_value(key, value, env, policy, &mut stats)?;
        }
    }

    Ok(stats)
}

fn resolve_value(
    key: &str,
    value: &mut Value,
    env: &BTreeMap<String, String>,
    policy: PlaceholderPolicy,
    stats: &mut InterpolationStats,
) -> Result<(), ConfigError> {
    let ValueKind::String(text) = &value.kind else {
        return Ok(());
    };
    let Some(name) = placeholder_name(text) else {
        return Ok(());
    };

    match env.get(name).filter(|v| !v.is_empty()) {
        Some(resolved) => {
            debug!(key = %key, var = %name, "Placeholder substituted");
            let origin = format!("${{{name}}}");
            *value = Value::new(Some(&origin), ValueKind::String(resolved.clone()));
            stats.substituted += 1;
        }
        None => match policy {
            PlaceholderPolicy::Strict => {
                return Err(ConfigError::MissingEnvPlaceholder {
                    key: key.to_string(),
                    name: name.to_string(),
                });
            }
            PlaceholderPolicy::Passthrough => {
                warn!(key = %key, var = %name, "Placeholder variable unset, keeping literal");
                stats.unresolved += 1;
            }
        },
    }
    Ok(())
}
