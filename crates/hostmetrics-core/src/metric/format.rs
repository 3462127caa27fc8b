//! Raw sample encodings and their parsing.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::property::PropertyValue;

/// A raw sample did not match the expected encoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Encoding of a raw sample as handed over by a source.
///
/// The encoding is part of the contract between a source and a definition;
/// configuration may override a definition's default per metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawFormat {
    /// Signed decimal integer, e.g. `"150"`.
    Integer,
    /// Finite floating point number, e.g. `"0.15"`.
    Decimal,
    /// Number in `0..=100`, optionally suffixed with `%`.
    Percentage,
    /// `/proc/meminfo` style `"<n> kB"`; a bare number is also accepted.
    Kilobytes,
    /// Non-negative number of seconds.
    Seconds,
    /// Any non-empty text.
    Text,
}

impl RawFormat {
    /// Parses `raw` into a typed value. Surrounding whitespace is ignored.
    pub fn parse(self, raw: &str) -> Result<PropertyValue, ParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ParseError::new(format!("empty {} sample", self)));
        }

        match self {
            RawFormat::Integer => raw
                .parse::<i64>()
                .map(PropertyValue::Integer)
                .map_err(|_| ParseError::new(format!("invalid integer '{}'", raw))),
            RawFormat::Decimal => parse_finite(raw).map(PropertyValue::Float),
            RawFormat::Percentage => {
                let number = raw.strip_suffix('%').unwrap_or(raw).trim_end();
                let value = parse_finite(number)?;
                if !(0.0..=100.0).contains(&value) {
                    return Err(ParseError::new(format!(
                        "percentage out of range: {}",
                        value
                    )));
                }
                Ok(PropertyValue::Percentage(value))
            }
            RawFormat::Kilobytes => {
                let mut parts = raw.split_whitespace();
                let number = parts.next().unwrap_or_default();
                match parts.next() {
                    None | Some("kB") => {}
                    Some(unit) => {
                        return Err(ParseError::new(format!("unexpected unit '{}'", unit)));
                    }
                }
                if parts.next().is_some() {
                    return Err(ParseError::new(format!("trailing data in '{}'", raw)));
                }
                let kb: u64 = number
                    .parse()
                    .map_err(|_| ParseError::new(format!("invalid kilobyte count '{}'", raw)))?;
                kb.checked_mul(1024)
                    .map(PropertyValue::Bytes)
                    .ok_or_else(|| ParseError::new(format!("kilobyte count overflows: {}", kb)))
            }
            RawFormat::Seconds => {
                let value = parse_finite(raw)?;
                if value < 0.0 {
                    return Err(ParseError::new(format!("negative duration: {}", value)));
                }
                Ok(PropertyValue::Seconds(value))
            }
            RawFormat::Text => Ok(PropertyValue::Text(raw.to_string())),
        }
    }
}

fn parse_finite(raw: &str) -> Result<f64, ParseError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::new(format!("invalid number '{}'", raw))),
    }
}

impl fmt::Display for RawFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RawFormat::Integer => "integer",
            RawFormat::Decimal => "decimal",
            RawFormat::Percentage => "percentage",
            RawFormat::Kilobytes => "kilobytes",
            RawFormat::Seconds => "seconds",
            RawFormat::Text => "text",
        };
        f.pad(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percentage() {
        assert_eq!(
            RawFormat::Percentage.parse("12.5").unwrap(),
            PropertyValue::Percentage(12.5)
        );
        assert_eq!(
            RawFormat::Percentage.parse("99 %").unwrap(),
            PropertyValue::Percentage(99.0)
        );
        assert!(RawFormat::Percentage.parse("100.1").is_err());
        assert!(RawFormat::Percentage.parse("-1").is_err());
        assert!(RawFormat::Percentage.parse("abc%").is_err());
    }

    #[test]
    fn test_parse_kilobytes() {
        assert_eq!(
            RawFormat::Kilobytes.parse("16384000 kB").unwrap(),
            PropertyValue::Bytes(16384000 * 1024)
        );
        assert_eq!(
            RawFormat::Kilobytes.parse("2").unwrap(),
            PropertyValue::Bytes(2048)
        );
        assert!(RawFormat::Kilobytes.parse("12 MB").is_err());
        assert!(RawFormat::Kilobytes.parse("12 kB extra").is_err());
        assert!(RawFormat::Kilobytes.parse("-5 kB").is_err());
    }

    #[test]
    fn test_parse_decimal_rejects_non_finite() {
        assert_eq!(
            RawFormat::Decimal.parse("0.15\n").unwrap(),
            PropertyValue::Float(0.15)
        );
        assert!(RawFormat::Decimal.parse("NaN").is_err());
        assert!(RawFormat::Decimal.parse("inf").is_err());
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(
            RawFormat::Seconds.parse("12345.67").unwrap(),
            PropertyValue::Seconds(12345.67)
        );
        assert!(RawFormat::Seconds.parse("-3").is_err());
    }

    #[test]
    fn test_parse_integer_and_text() {
        assert_eq!(
            RawFormat::Integer.parse("-7").unwrap(),
            PropertyValue::Integer(-7)
        );
        assert!(RawFormat::Integer.parse("7.5").is_err());
        assert_eq!(
            RawFormat::Text.parse("  eth0 ").unwrap(),
            PropertyValue::Text("eth0".to_string())
        );
    }

    #[test]
    fn test_empty_sample_is_rejected() {
        let err = RawFormat::Text.parse("   ").unwrap_err();
        assert_eq!(err.message, "empty text sample");
    }
}
