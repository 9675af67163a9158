//! Galen Config: Layered Configuration Resolver
//!
//! Resolves Galen settings from a runtime override source and a flat
//! properties file, with typed and validated accessors on top.

pub mod config;
pub mod error;
pub mod error_rate;
pub mod logging;
pub mod page;
pub mod values;

pub use config::{GalenConfig, LoadOutcome, ResolvedSettings};
pub use error::{ConfigError, LoadError};
pub use error_rate::ErrorRate;
