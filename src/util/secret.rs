//! Secret string type for credentials in the pipeline configuration.
//!
//! Connector credentials (API tokens, database passwords) pass through the
//! resolver and may end up in `config show` output or debug logs. This type
//! keeps them out of both.

use serde::{Deserialize, Serialize};
use std::fmt;

const REDACTED: &str = "[REDACTED]";

/// A wrapper for secrets that prevents accidental logging.
///
/// - `Debug`, `Display` and `Serialize` never reveal the value
/// - Explicit `expose_secret()` is required to read it
/// - Clears memory on drop (best-effort)
///
/// An empty secret serializes as an empty string so that unset credentials
/// stay distinguishable from set ones in rendered output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret from any string-like value.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Explicitly expose the secret value.
    ///
    /// Use only where a connector actually needs the credential.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Whether a value was configured at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // Not cryptographically secure; copies may exist elsewhere.
        self.0.clear();
        self.0.shrink_to_fit();
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString::new)
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if self.0.is_empty() {
            serializer.serialize_str("")
        } else {
            serializer.serialize_str(REDACTED)
        }
    }
}
