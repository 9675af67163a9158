//! Domain value parsers
//!
//! Stateless string-to-value conversions used by the typed accessors. The
//! strict parsers reject anything outside their grammar; the lenient ones
//! (`parse_bool_lenient`, `is_numeric`) never fail.

use crate::error::ConfigError;

/// Parse a signed 32-bit integer.
///
/// Accepts an optional `+`/`-` sign followed by ASCII digits. Surrounding
/// whitespace is not trimmed, so `" 5"` is rejected.
pub fn parse_int(text: &str) -> Option<i32> {
    text.parse::<i32>().ok()
}

/// Parse an integer for `key`, reporting the raw value on failure.
pub fn parse_int_for(key: &str, text: &str) -> Result<i32, ConfigError> {
    parse_int(text).ok_or_else(|| ConfigError::invalid(key, text))
}

/// Check `value` against the inclusive range `[min, max]`.
pub fn check_range(key: &str, value: i32, min: i32, max: i32) -> Result<i32, ConfigError> {
    if value >= min && value <= max {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            key: key.to_string(),
            value,
            min,
            max,
        })
    }
}

/// Lenient boolean: only a case-insensitive `"true"` is true.
pub fn parse_bool_lenient(text: &str) -> bool {
    text.eq_ignore_ascii_case("true")
}

/// True when `text` is non-empty and made only of digits.
///
/// Signs, whitespace and decimal points all make the text non-numeric.
pub fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_comma_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
