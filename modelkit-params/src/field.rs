//! The closed sum of the three field descriptors, with the accessors shared
//! across variants. A model stores its schema as a collection of `Field`s.

use crate::derived::Derived;
use crate::error::{ParamError, Result};
use crate::param::{Param, ParamUpdate};
use crate::property::Property;
use crate::record::FieldRecord;
use crate::value::{Value, ValueType};

/// Any field a schema can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Property(Property),
    Param(Param),
    Derived(Derived),
}

impl Field {
    pub fn name(&self) -> &str {
        match self {
            Field::Property(p) => p.name(),
            Field::Param(p) => p.name(),
            Field::Derived(d) => d.name(),
        }
    }

    /// The current value: the set (or cached) value if any, else the default.
    pub fn current(&self) -> Option<&Value> {
        match self {
            Field::Property(p) => p.current(),
            Field::Param(p) => p.current(),
            Field::Derived(d) => d.current(),
        }
    }

    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Field::Property(p) => p.value_type(),
            Field::Param(p) => p.value_type(),
            Field::Derived(d) => d.value_type(),
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            Field::Property(p) => p.is_required(),
            Field::Param(p) => p.is_required(),
            // a derived value is computed, never demanded from the caller
            Field::Derived(_) => false,
        }
    }

    pub fn help(&self) -> &str {
        match self {
            Field::Property(p) => p.help(),
            Field::Param(p) => p.help(),
            Field::Derived(d) => d.help(),
        }
    }

    /// Apply an update. Only numeric parameters accept bounds/errors/free;
    /// for the other variants a structural update fails with `NotNumeric`.
    pub fn set(&mut self, update: ParamUpdate) -> Result<()> {
        match self {
            Field::Param(p) => p.set(update),
            Field::Property(p) => {
                if update.is_structural() {
                    return Err(ParamError::NotNumeric {
                        name: p.name().to_string(),
                    });
                }
                match update.value {
                    Some(value) => p.set_value(value),
                    None => Ok(()),
                }
            }
            Field::Derived(d) => {
                if update.is_structural() {
                    return Err(ParamError::NotNumeric {
                        name: d.name().to_string(),
                    });
                }
                match update.value {
                    Some(value) => d.cache(value),
                    None => Ok(()),
                }
            }
        }
    }

    /// Validate and store a plain value.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<()> {
        self.set(ParamUpdate::new().value(value))
    }

    pub fn clear_value(&mut self) {
        match self {
            Field::Property(p) => p.clear_value(),
            Field::Param(p) => p.clear_value(),
            Field::Derived(d) => d.clear_value(),
        }
    }

    /// The scalar error of a numeric parameter; 0 for everything else.
    pub fn symmetric_error(&self) -> f64 {
        match self {
            Field::Param(p) => p.symmetric_error(),
            _ => 0.0,
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, Field::Derived(_))
    }

    pub fn as_param(&self) -> Option<&Param> {
        match self {
            Field::Param(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_derived(&self) -> Option<&Derived> {
        match self {
            Field::Derived(d) => Some(d),
            _ => None,
        }
    }

    pub fn to_record(&self) -> FieldRecord {
        match self {
            Field::Property(p) => p.to_record(),
            Field::Param(p) => p.to_record(),
            Field::Derived(d) => d.to_record(),
        }
    }

    /// Check the prototype's stored state. Run once at schema assembly.
    pub fn validate(&self) -> Result<()> {
        match self {
            Field::Property(p) => p.validate(),
            Field::Param(p) => p.validate(),
            Field::Derived(d) => d.validate(),
        }
    }
}

impl From<Property> for Field {
    fn from(p: Property) -> Self {
        Field::Property(p)
    }
}

impl From<Param> for Field {
    fn from(p: Param) -> Self {
        Field::Param(p)
    }
}

impl From<Derived> for Field {
    fn from(d: Derived) -> Self {
        Field::Derived(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_update_on_a_property_is_refused() {
        let mut field = Field::from(Property::new("label").with_value("x"));
        let err = field
            .set(ParamUpdate::new().value("y").bounds(0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, ParamError::NotNumeric { .. }));
        // nothing was applied
        assert_eq!(field.current(), Some(&Value::Str("x".into())));
    }

    #[test]
    fn plain_value_update_reaches_every_variant() {
        let mut property = Field::from(Property::new("a"));
        property.set_value("text").unwrap();
        assert_eq!(property.current(), Some(&Value::Str("text".into())));

        let mut param = Field::from(Param::new("b"));
        param.set_value(2.0).unwrap();
        assert_eq!(param.current(), Some(&Value::Float(2.0)));

        let mut derived = Field::from(Derived::new("c"));
        derived.set_value(3.0).unwrap();
        assert_eq!(derived.current(), Some(&Value::Float(3.0)));
        assert!(!derived.as_derived().unwrap().is_stale());
    }

    #[test]
    fn symmetric_error_is_zero_off_params() {
        assert_eq!(Field::from(Property::new("a")).symmetric_error(), 0.0);
        assert_eq!(Field::from(Derived::new("c")).symmetric_error(), 0.0);
    }

    #[test]
    fn derived_fields_are_never_required() {
        assert!(!Field::from(Derived::new("d")).is_required());
    }
}
