//! Runtime value cells and declared-type tags.
//!
//! `Value` is the unit of storage for every field; `ValueType` is the
//! declared-type tag used for exact type matching. Matching is strict:
//! `Int` never matches `Float`, and `Bool` never matches `Int`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored field value.
///
/// Serializes untagged, so records read naturally in YAML
/// (`1`, `1.5`, `true`, `hello`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// The type tag of this value.
    pub fn kind(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::Str,
        }
    }

    /// Numeric view of the value. `Bool` and `Str` are not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Integer view of the value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Boolean view of the value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String view of the value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            // Debug keeps the decimal point on whole floats (8.0, not 8)
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// Declared type of a field, determining what writes are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Str,
}

impl ValueType {
    /// Get the string representation of this type tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "str",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_exact() {
        assert_eq!(Value::Int(1).kind(), ValueType::Int);
        assert_eq!(Value::Float(1.0).kind(), ValueType::Float);
        assert_ne!(Value::Int(1).kind(), ValueType::Float);
        // booleans are not integers
        assert_ne!(Value::Bool(true).kind(), ValueType::Int);
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::Bool(true).as_f64(), None);
        assert_eq!(Value::Str("x".into()).as_f64(), None);
        assert_eq!(Value::Float(2.5).as_i64(), None);
        assert_eq!(Value::Int(7).as_i64(), Some(7));
    }

    #[test]
    fn display_keeps_float_point() {
        assert_eq!(Value::Float(8.0).to_string(), "8.0");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Int(8).to_string(), "8");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
    }

    #[test]
    fn yaml_round_trip_untagged() {
        for value in [
            Value::Bool(true),
            Value::Int(42),
            Value::Float(1.25),
            Value::Str("hello".into()),
        ] {
            let yaml = serde_yaml_ng::to_string(&value).unwrap();
            let parsed: Value = serde_yaml_ng::from_str(&yaml).unwrap();
            assert_eq!(value, parsed);
        }
    }

    #[test]
    fn value_type_names() {
        assert_eq!(ValueType::Float.as_str(), "float");
        assert_eq!(ValueType::Bool.to_string(), "bool");
        let yaml = serde_yaml_ng::to_string(&ValueType::Int).unwrap();
        assert_eq!(yaml.trim(), "int");
    }
}
