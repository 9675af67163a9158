//! Error types for the Galen configuration resolver.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the strict configuration accessors.
///
/// These are never recovered inside the store: a failed read is reported to
/// the caller and terminates that read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing property: {key}")]
    MissingConfiguration { key: String },

    #[error("Couldn't parse property \"{key}\" from config: {value:?}")]
    InvalidConfiguration { key: String, value: String },

    #[error("Property \"{key}\"={value} in config is not in allowed range [{min}, {max}]")]
    OutOfRange {
        key: String,
        value: i32,
        min: i32,
        max: i32,
    },
}

impl ConfigError {
    pub(crate) fn missing(key: &str) -> Self {
        ConfigError::MissingConfiguration {
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid(key: &str, value: &str) -> Self {
        ConfigError::InvalidConfiguration {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// Key the failed read was made for.
    pub fn key(&self) -> &str {
        match self {
            ConfigError::MissingConfiguration { key }
            | ConfigError::InvalidConfiguration { key, .. }
            | ConfigError::OutOfRange { key, .. } => key,
        }
    }
}

/// Failures while building a new snapshot from the configuration file.
///
/// `GalenConfig::load` never propagates these; they are handed back inside
/// `LoadOutcome::Failed` and the previous snapshot stays in place.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file {path} at line {line}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Logging initialisation errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log directive: {0}")]
    InvalidDirective(String),

    #[error("Invalid log format: {0} (must be 'json' or 'text')")]
    InvalidFormat(String),

    #[error("Invalid log output: {0} (must be 'stdout' or 'stderr')")]
    InvalidOutput(String),

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}
