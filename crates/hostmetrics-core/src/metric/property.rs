//! Typed name/value pairs produced by parsing raw samples.

use std::fmt;

use serde::Serialize;

/// Typed value of a [`Property`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Text(String),
    Integer(i64),
    Float(f64),
    /// Share in `0..=100`.
    Percentage(f64),
    Bytes(u64),
    Seconds(f64),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Integer(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Percentage(v) => write!(f, "{:.1}%", v),
            PropertyValue::Bytes(v) => write!(f, "{}B", v),
            PropertyValue::Seconds(v) => write!(f, "{:.2}s", v),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Integer(i64::from(v))
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Integer(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

/// A named, typed reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    name: String,
    value: PropertyValue,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_from_literals() {
        assert_eq!(
            Property::new("A", "A value").value(),
            &PropertyValue::Text("A value".to_string())
        );
        assert_eq!(Property::new("B", 2).value(), &PropertyValue::Integer(2));
        assert_eq!(Property::new("C", 0.5).value(), &PropertyValue::Float(0.5));
    }

    #[test]
    fn test_property_display() {
        let prop = Property::new("CPU User Time", PropertyValue::Percentage(12.345));
        assert_eq!(prop.to_string(), "CPU User Time=12.3%");
    }

    #[test]
    fn test_property_serializes_tagged_value() {
        let json = serde_json::to_string(&Property::new("B", 2)).unwrap();
        assert_eq!(json, r#"{"name":"B","value":{"kind":"integer","value":2}}"#);
    }
}
