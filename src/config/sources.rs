//! Configuration sources: the override store and the properties file.

pub mod overrides;
pub mod properties_file;

pub use overrides::{EnvOverrides, MapOverrides, OverrideSource};
