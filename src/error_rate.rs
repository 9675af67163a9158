//! Image comparison error rate
//!
//! An error rate is the allowed visual difference between a screenshot and its
//! reference image, written either as a pixel count (`"5px"`) or as a
//! percentage of the compared area (`"2.5%"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Parsed error rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "value")]
pub enum ErrorRate {
    Pixels(u32),
    Percent(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown error rate: {0:?}")]
pub struct ErrorRateParseError(pub String);

impl ErrorRate {
    pub const ZERO: ErrorRate = ErrorRate::Pixels(0);

    pub fn is_zero(&self) -> bool {
        match self {
            ErrorRate::Pixels(px) => *px == 0,
            ErrorRate::Percent(pct) => *pct == 0.0,
        }
    }
}

impl FromStr for ErrorRate {
    type Err = ErrorRateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let reject = || ErrorRateParseError(s.to_string());

        if let Some(number) = text.strip_suffix("px") {
            let number = number.trim_end();
            if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
                return Err(reject());
            }
            return number.parse::<u32>().map(ErrorRate::Pixels).map_err(|_| reject());
        }

        if let Some(number) = text.strip_suffix('%') {
            let number = number.trim_end();
            // f64::from_str also accepts "inf", "NaN" and exponents; only plain decimals belong here
            let plain = !number.is_empty()
                && number.chars().all(|c| c.is_ascii_digit() || c == '.')
                && number.chars().filter(|c| *c == '.').count() <= 1
                && number.chars().any(|c| c.is_ascii_digit());
            if !plain {
                return Err(reject());
            }
            let pct = number.parse::<f64>().map_err(|_| reject())?;
            if !(0.0..=100.0).contains(&pct) {
                return Err(reject());
            }
            return Ok(ErrorRate::Percent(pct));
        }

        Err(reject())
    }
}

impl fmt::Display for ErrorRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorRate::Pixels(px) => write!(f, "{}px", px),
            ErrorRate::Percent(pct) => write!(f, "{}%", pct),
        }
    }
}
