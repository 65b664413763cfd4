//! Serializable per-field attribute records.
//!
//! A `FieldRecord` is the ordered, structured view of a field that external
//! renderers consume. Optional attributes are omitted from the output, so a
//! plain property record never mentions bounds or errors.

use crate::param::ParamErrors;
use crate::value::{Value, ValueType};
use serde::{Deserialize, Serialize};

/// The attribute record of a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ParamErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free: Option<bool>,
}

impl FieldRecord {
    /// The value a reader should take as current: the stored value if set,
    /// else the default.
    pub fn current(&self) -> Option<&Value> {
        self.value.as_ref().or(self.default.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Param;
    use crate::property::Property;

    #[test]
    fn property_record_yaml_round_trip() {
        let record = Property::new("req")
            .typed(ValueType::Float)
            .required(true)
            .with_format("%.1f")
            .with_help("A required parameter")
            .to_record();
        let yaml = serde_yaml_ng::to_string(&record).unwrap();
        let parsed: FieldRecord = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(record, parsed);
        // numeric attributes are absent from a plain property record
        assert!(!yaml.contains("bounds"));
        assert!(!yaml.contains("free"));
    }

    #[test]
    fn param_record_yaml_round_trip() {
        let record = Param::new("y")
            .with_value(2)
            .with_bounds(0.0, 10.0)
            .with_errors(ParamErrors::Asymmetric(0.25, 0.75))
            .free(true)
            .with_help("variable y")
            .to_record();
        let yaml = serde_yaml_ng::to_string(&record).unwrap();
        let parsed: FieldRecord = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(record, parsed);
        assert_eq!(parsed.bounds, Some((0.0, 10.0)));
        assert_eq!(parsed.free, Some(true));
        assert_eq!(parsed.current(), Some(&Value::Int(2)));
    }

    #[test]
    fn type_serializes_under_its_own_key() {
        let record = Property::new("req").typed(ValueType::Float).to_record();
        let yaml = serde_yaml_ng::to_string(&record).unwrap();
        assert!(yaml.contains("type: float"));
        assert!(!yaml.contains("value_type"));
    }

    #[test]
    fn symmetric_errors_round_trip_as_a_scalar() {
        let record = Param::new("p")
            .with_errors(ParamErrors::Symmetric(0.5))
            .to_record();
        let yaml = serde_yaml_ng::to_string(&record).unwrap();
        let parsed: FieldRecord = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed.errors, Some(ParamErrors::Symmetric(0.5)));
    }

    #[test]
    fn current_prefers_value_over_default() {
        let record = Property::new("opt")
            .with_value(2.0)
            .with_default(1.0)
            .to_record();
        assert_eq!(record.current(), Some(&Value::Float(2.0)));
    }
}
