//! Property-based tests for resolution and parsing guarantees

mod precedence;
