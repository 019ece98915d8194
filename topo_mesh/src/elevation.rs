//! Reading elevation readings out of survey label text.
//!
//! Labels carry a height in meters such as `"14.200"`, `"+14,2"` or
//! `"-0.450"`. Parsing yields millimeters, the canonical unit for elevation
//! arithmetic.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;

/// Millimeters per meter.
pub const MM_PER_M: f64 = 1000.0;

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").expect("elevation pattern is valid")
});

/// Decimal separator used by the labels of a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecimalSeparator {
    #[default]
    Point,
    Comma,
}

impl DecimalSeparator {
    pub fn as_char(self) -> char {
        match self {
            Self::Point => '.',
            Self::Comma => ',',
        }
    }

    /// Parses `"."` or `","`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "." => Some(Self::Point),
            "," => Some(Self::Comma),
            _ => None,
        }
    }
}

impl fmt::Display for DecimalSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for DecimalSeparator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DecimalSeparator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_str(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("separator must be \".\" or \",\", got {raw:?}"))
        })
    }
}

/// Parses a label into millimeters using the fixed meter to millimeter scale.
pub fn parse_elevation(text: &str, separator: DecimalSeparator) -> Result<f64, ParseError> {
    parse_elevation_scaled(text, separator, MM_PER_M)
}

/// Parses a label and multiplies the numeric value by `scale`.
///
/// Leading spaces and an optional `+`/`-` sign are accepted. The separator is
/// rewritten to `.` before the number is read; anything else that is not a
/// digit rejects the whole label. Trailing whitespace is ignored.
pub fn parse_elevation_scaled(
    text: &str,
    separator: DecimalSeparator,
    scale: f64,
) -> Result<f64, ParseError> {
    let malformed = || ParseError::Malformed(text.to_string());

    let body = text.trim_start_matches(' ').trim_end();
    let (negative, digits) = match body.as_bytes().first() {
        Some(b'+') => (false, &body[1..]),
        Some(b'-') => (true, &body[1..]),
        _ => (false, body),
    };

    let normalized = digits.replace(separator.as_char(), ".");
    if !NUMBER.is_match(&normalized) {
        return Err(malformed());
    }
    let value: f64 = normalized.parse().map_err(|_| malformed())?;
    let scaled = value * scale;
    // digit runs past the f64 range parse as infinity
    if !scaled.is_finite() {
        return Err(malformed());
    }
    Ok(if negative { -scaled } else { scaled })
}

/// Formats millimeters back into the canonical label form: meters with three
/// decimals, a sign only when negative.
pub fn format_elevation(mm: f64, separator: DecimalSeparator) -> String {
    let meters = mm / MM_PER_M;
    // avoid printing "-0.000"
    let meters = if meters == 0.0 { 0.0 } else { meters };
    let text = format!("{meters:.3}");
    match separator {
        DecimalSeparator::Point => text,
        DecimalSeparator::Comma => text.replace('.', ","),
    }
}
