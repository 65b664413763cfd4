//! Base field descriptor: a named, optionally typed, optionally required
//! value slot with a default and help text.
//!
//! Every write goes through the validate-then-set contract: a declared type
//! is matched exactly, and a failed write leaves the previous value intact.

use crate::error::{ParamError, Result};
use crate::record::FieldRecord;
use crate::value::{Value, ValueType};

/// The base field descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    value: Option<Value>,
    default: Option<Value>,
    value_type: Option<ValueType>,
    required: bool,
    help: String,
    format: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            default: None,
            value_type: None,
            required: false,
            help: String::new(),
            format: None,
        }
    }

    // --- Builder methods ---

    /// Set an initial value. Checked against the declared type when the
    /// prototype is assembled into a schema (see `validate`).
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the default returned by reads while no value is set.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Declare the exact type every write must match.
    pub fn typed(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Mark the field as required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Set the display format hint (e.g. `"%.1f"`).
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    // --- Accessors ---

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current value: the set value if any, else the default.
    pub fn current(&self) -> Option<&Value> {
        self.value.as_ref().or(self.default.as_ref())
    }

    /// Whether a value (not just a default) is set.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// The type tag of the current value, when one is present.
    pub fn value_kind(&self) -> Option<ValueType> {
        self.current().map(Value::kind)
    }

    // --- Mutation ---

    /// Validate `value` against the declared type and store it.
    /// On failure nothing changes.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.check_type(&value)?;
        self.value = Some(value);
        Ok(())
    }

    /// Reset the value to unset. The default is untouched.
    pub fn clear_value(&mut self) {
        self.value = None;
    }

    pub(crate) fn check_type(&self, value: &Value) -> Result<()> {
        if let Some(expected) = self.value_type {
            if value.kind() != expected {
                return Err(ParamError::TypeMismatch {
                    name: self.name.clone(),
                    expected: expected.as_str().to_string(),
                    actual: value.kind().as_str().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check that the stored value and default agree with the declared type.
    /// Run once when a prototype is assembled into a schema.
    pub fn validate(&self) -> Result<()> {
        if let Some(value) = &self.value {
            self.check_type(value)?;
        }
        if let Some(default) = &self.default {
            self.check_type(default)?;
        }
        Ok(())
    }

    /// Ordered attribute record for structured serialization.
    pub fn to_record(&self) -> FieldRecord {
        FieldRecord {
            value: self.value.clone(),
            default: self.default.clone(),
            value_type: self.value_type,
            required: self.required,
            help: self.help.clone(),
            format: self.format.clone(),
            bounds: None,
            errors: None,
            free: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_property_rejects_other_types() {
        let mut prop = Property::new("count")
            .with_default(10)
            .typed(ValueType::Int)
            .with_help("an int property");
        prop.set_value(3).unwrap();
        assert_eq!(prop.current(), Some(&Value::Int(3)));

        let err = prop.set_value(3.2).unwrap_err();
        assert!(matches!(err, ParamError::TypeMismatch { .. }));
        // failed write leaves the previous value in place
        assert_eq!(prop.current(), Some(&Value::Int(3)));
    }

    #[test]
    fn bool_type_only_accepts_bools() {
        let mut prop = Property::new("flag").typed(ValueType::Bool);
        assert!(prop.set_value(1).is_err());
        assert!(prop.set_value(true).is_ok());
    }

    #[test]
    fn value_takes_precedence_over_default() {
        let prop = Property::new("greeting")
            .with_value("hello")
            .with_default("world");
        assert_eq!(prop.current(), Some(&Value::Str("hello".into())));
        assert_eq!(prop.value_kind(), Some(ValueType::Str));
    }

    #[test]
    fn clear_value_resets_to_unset() {
        let mut prop = Property::new("x").with_value(1.3e6);
        prop.set_value(0.0).unwrap();
        prop.clear_value();
        assert_eq!(prop.current(), None);
        assert!(!prop.is_set());
    }

    #[test]
    fn default_answers_reads_when_unset() {
        let prop = Property::new("opt").with_default(1.0);
        assert!(!prop.is_set());
        assert_eq!(prop.current(), Some(&Value::Float(1.0)));
    }

    #[test]
    fn validate_catches_prototype_mismatch() {
        let prop = Property::new("bad").typed(ValueType::Int).with_default(1.5);
        assert!(matches!(
            prop.validate(),
            Err(ParamError::TypeMismatch { .. })
        ));
    }
}
