//! Single-key resolution across the two sources.

use crate::config::sources::OverrideSource;
use crate::error::ConfigError;
use std::collections::BTreeMap;

/// Resolves keys against an override source and a base property set.
///
/// Lookup order is override, then base, then the caller's default. A key set
/// to the empty string is still "set": only a missing key falls through.
#[derive(Clone, Copy)]
pub struct PropertyOverlay<'a> {
    overrides: &'a dyn OverrideSource,
    base: &'a BTreeMap<String, String>,
}

impl<'a> PropertyOverlay<'a> {
    pub fn new(overrides: &'a dyn OverrideSource, base: &'a BTreeMap<String, String>) -> Self {
        Self { overrides, base }
    }

    /// Resolved value, or `None` when neither source nor `default` has one.
    pub fn resolve(&self, key: &str, default: Option<&str>) -> Option<String> {
        self.overrides
            .lookup(key)
            .or_else(|| self.base.get(key).cloned())
            .or_else(|| default.map(str::to_string))
    }

    pub fn resolve_or(&self, key: &str, default: &str) -> String {
        self.resolve(key, Some(default))
            .unwrap_or_else(|| default.to_string())
    }

    /// Like `resolve` without a default, but a missing or blank value is an error.
    pub fn resolve_mandatory(&self, key: &str) -> Result<String, ConfigError> {
        match self.resolve(key, None) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::missing(key)),
        }
    }
}
