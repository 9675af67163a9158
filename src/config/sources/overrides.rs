//! Override sources: key/value stores consulted before the config file.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Higher-priority key/value lookup.
///
/// Read-only from the resolver's point of view; implementations decide where
/// the values come from.
pub trait OverrideSource: Send + Sync {
    fn lookup(&self, key: &str) -> Option<String>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Process environment.
///
/// `galen.default.browser` is looked up verbatim first and then as
/// `GALEN_DEFAULT_BROWSER`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvOverrides;

impl EnvOverrides {
    /// Upper-snake form of a property key.
    pub fn env_key(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl OverrideSource for EnvOverrides {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .or_else(|| std::env::var(Self::env_key(key)).ok())
    }

    fn name(&self) -> &str {
        "environment"
    }
}

/// In-memory overrides, mutable at runtime.
#[derive(Debug, Default)]
pub struct MapOverrides {
    values: RwLock<HashMap<String, String>>,
}

impl MapOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }

    pub fn clear(&self) {
        self.values.write().clear();
    }
}

impl OverrideSource for MapOverrides {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
