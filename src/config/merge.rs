//! Merge rules: override source first, then base properties, then default.

pub mod precedence;

pub use precedence::PropertyOverlay;
