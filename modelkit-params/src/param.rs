//! Numeric parameter: a bounded, error-bearing field that behaves like a
//! bare number in arithmetic and comparison expressions.
//!
//! Operator reads never mutate stored state; every mutation goes through
//! `set`, which validates type and bounds before committing anything.

use crate::error::{ParamError, Result};
use crate::property::Property;
use crate::record::FieldRecord;
use crate::value::{Value, ValueType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops;

/// Error bars on a parameter value.
///
/// Serializes untagged: a scalar for symmetric errors, a two-element
/// sequence for asymmetric ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamErrors {
    Symmetric(f64),
    Asymmetric(f64, f64),
}

/// A batched update applied through the validate-then-set contract.
///
/// Any subset of value/bounds/free/errors; omitted parts are untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamUpdate {
    pub value: Option<Value>,
    pub bounds: Option<(f64, f64)>,
    pub free: Option<bool>,
    pub errors: Option<ParamErrors>,
}

impl ParamUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn bounds(mut self, low: f64, high: f64) -> Self {
        self.bounds = Some((low, high));
        self
    }

    pub fn free(mut self, free: bool) -> Self {
        self.free = Some(free);
        self
    }

    pub fn errors(mut self, errors: ParamErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Whether the update carries anything beyond a plain value.
    pub fn is_structural(&self) -> bool {
        self.bounds.is_some() || self.free.is_some() || self.errors.is_some()
    }
}

macro_rules! impl_update_from {
    ($($ty:ty),*) => {$(
        impl From<$ty> for ParamUpdate {
            fn from(value: $ty) -> Self {
                ParamUpdate {
                    value: Some(value.into()),
                    ..Default::default()
                }
            }
        }
    )*};
}

impl_update_from!(Value, bool, i32, i64, f64, &str, String);

/// A bounded numeric parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    prop: Property,
    bounds: Option<(f64, f64)>,
    errors: Option<ParamErrors>,
    free: bool,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            prop: Property::new(name),
            bounds: None,
            errors: None,
            free: false,
        }
    }

    // --- Builder methods ---

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.prop = self.prop.with_value(value);
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.prop = self.prop.with_default(default);
        self
    }

    pub fn typed(mut self, value_type: ValueType) -> Self {
        self.prop = self.prop.typed(value_type);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.prop = self.prop.required(required);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.prop = self.prop.with_help(help);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.prop = self.prop.with_format(format);
        self
    }

    /// Inclusive bounds every write must satisfy.
    pub fn with_bounds(mut self, low: f64, high: f64) -> Self {
        self.bounds = Some((low, high));
        self
    }

    pub fn with_errors(mut self, errors: ParamErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Mark the parameter free for an external fitting process.
    pub fn free(mut self, free: bool) -> Self {
        self.free = free;
        self
    }

    // --- Accessors ---

    pub fn name(&self) -> &str {
        self.prop.name()
    }

    pub fn current(&self) -> Option<&Value> {
        self.prop.current()
    }

    pub fn is_set(&self) -> bool {
        self.prop.is_set()
    }

    pub fn default(&self) -> Option<&Value> {
        self.prop.default()
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.prop.value_type()
    }

    pub fn is_required(&self) -> bool {
        self.prop.is_required()
    }

    pub fn help(&self) -> &str {
        self.prop.help()
    }

    pub fn format(&self) -> Option<&str> {
        self.prop.format()
    }

    pub fn value_kind(&self) -> Option<ValueType> {
        self.prop.value_kind()
    }

    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.bounds
    }

    pub fn errors(&self) -> Option<ParamErrors> {
        self.errors
    }

    pub fn is_free(&self) -> bool {
        self.free
    }

    /// The scalar error: the symmetric error if one is set, the mean of an
    /// asymmetric pair, else 0.
    pub fn symmetric_error(&self) -> f64 {
        match self.errors {
            Some(ParamErrors::Symmetric(e)) => e,
            Some(ParamErrors::Asymmetric(low, high)) => 0.5 * (low + high),
            None => 0.0,
        }
    }

    // --- Mutation ---

    /// Apply an update: bounds first, then the value validated against the
    /// declared type and the (possibly updated) bounds, then errors/free.
    /// Any failure commits nothing.
    pub fn set(&mut self, update: ParamUpdate) -> Result<()> {
        let bounds = update.bounds.or(self.bounds);
        if let Some(value) = &update.value {
            self.check_numeric(value)?;
            if let (Some((low, high)), Some(x)) = (bounds, value.as_f64()) {
                if x < low || x > high {
                    return Err(ParamError::OutOfBounds {
                        name: self.prop.name().to_string(),
                        value: x,
                        low,
                        high,
                    });
                }
            }
        }
        if let Some(bounds) = update.bounds {
            self.bounds = Some(bounds);
        }
        if let Some(errors) = update.errors {
            self.errors = Some(errors);
        }
        if let Some(free) = update.free {
            self.free = free;
        }
        if let Some(value) = update.value {
            self.prop.set_value(value)?;
        }
        Ok(())
    }

    /// Validate and store a plain value.
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<()> {
        self.set(ParamUpdate::new().value(value))
    }

    pub fn clear_value(&mut self) {
        self.prop.clear_value();
    }

    /// With no declared type, only numeric (and, separately, strictly
    /// boolean) values are accepted.
    fn check_numeric(&self, value: &Value) -> Result<()> {
        if self.prop.value_type().is_some() {
            return self.prop.check_type(value);
        }
        match value {
            Value::Int(_) | Value::Float(_) | Value::Bool(_) => Ok(()),
            other => Err(ParamError::TypeMismatch {
                name: self.prop.name().to_string(),
                expected: "a numeric value".to_string(),
                actual: other.kind().as_str().to_string(),
            }),
        }
    }

    /// Check the prototype's stored value and default against the declared
    /// type and bounds. Run once when assembled into a schema.
    pub fn validate(&self) -> Result<()> {
        for stored in [self.prop.current(), self.prop.default()].into_iter().flatten() {
            self.check_numeric(stored)?;
            if let (Some((low, high)), Some(x)) = (self.bounds, stored.as_f64()) {
                if x < low || x > high {
                    return Err(ParamError::OutOfBounds {
                        name: self.prop.name().to_string(),
                        value: x,
                        low,
                        high,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn to_record(&self) -> FieldRecord {
        let mut record = self.prop.to_record();
        record.bounds = self.bounds;
        record.errors = self.errors;
        record.free = Some(self.free);
        record
    }

    // --- Numeric transparency ---

    /// Float conversion of the current value.
    pub fn as_f64(&self) -> Option<f64> {
        self.current().and_then(Value::as_f64)
    }

    /// Integer conversion of the current value.
    pub fn as_i64(&self) -> Option<i64> {
        self.current().and_then(Value::as_i64)
    }

    /// Boolean conversion of the current value.
    pub fn as_bool(&self) -> Option<bool> {
        self.current().and_then(Value::as_bool)
    }

    /// Floor division, like `//`.
    pub fn floordiv(&self, rhs: f64) -> f64 {
        (self.number() / rhs).floor()
    }

    /// Quotient and remainder of floor division.
    pub fn divmod(&self, rhs: f64) -> (f64, f64) {
        let q = (self.number() / rhs).floor();
        (q, self.number() - q * rhs)
    }

    /// The current value raised to `exp`.
    pub fn pow(&self, exp: f64) -> f64 {
        self.number().powf(exp)
    }

    pub fn abs(&self) -> f64 {
        self.number().abs()
    }

    /// The current value truncated toward zero.
    pub fn trunc(&self) -> i64 {
        self.number().trunc() as i64
    }

    /// The numeric current value. Panics on an unset or non-numeric value,
    /// like `Index` does on a missing key.
    fn number(&self) -> f64 {
        match self.as_f64() {
            Some(x) => x,
            None => panic!(
                "arithmetic on unset or non-numeric parameter '{}'",
                self.prop.name()
            ),
        }
    }

    /// The integer current value. Panics on anything but an `Int` value.
    fn int_value(&self) -> i64 {
        match self.as_i64() {
            Some(i) => i,
            None => panic!(
                "bitwise arithmetic on non-integer parameter '{}'",
                self.prop.name()
            ),
        }
    }
}

impl PartialEq<f64> for Param {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == Some(*other)
    }
}

impl PartialEq<i64> for Param {
    fn eq(&self, other: &i64) -> bool {
        self.as_f64() == Some(*other as f64)
    }
}

impl PartialOrd<f64> for Param {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.as_f64()?.partial_cmp(other)
    }
}

impl PartialOrd<i64> for Param {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        self.as_f64()?.partial_cmp(&(*other as f64))
    }
}

macro_rules! impl_param_binop {
    ($($trait:ident :: $method:ident => $op:tt),*) => {$(
        impl ops::$trait<f64> for &Param {
            type Output = f64;
            fn $method(self, rhs: f64) -> f64 {
                self.number() $op rhs
            }
        }

        impl ops::$trait<&Param> for f64 {
            type Output = f64;
            fn $method(self, rhs: &Param) -> f64 {
                self $op rhs.number()
            }
        }

        impl ops::$trait<&Param> for &Param {
            type Output = f64;
            fn $method(self, rhs: &Param) -> f64 {
                self.number() $op rhs.number()
            }
        }
    )*};
}

impl_param_binop!(
    Add::add => +,
    Sub::sub => -,
    Mul::mul => *,
    Div::div => /,
    Rem::rem => %
);

macro_rules! impl_param_bitop {
    ($($trait:ident :: $method:ident => $op:tt),*) => {$(
        impl ops::$trait<i64> for &Param {
            type Output = i64;
            fn $method(self, rhs: i64) -> i64 {
                self.int_value() $op rhs
            }
        }

        impl ops::$trait<&Param> for i64 {
            type Output = i64;
            fn $method(self, rhs: &Param) -> i64 {
                self $op rhs.int_value()
            }
        }
    )*};
}

impl_param_bitop!(
    BitAnd::bitand => &,
    BitOr::bitor => |,
    BitXor::bitxor => ^,
    Shl::shl => <<,
    Shr::shr => >>
);

impl ops::Neg for &Param {
    type Output = f64;
    fn neg(self) -> f64 {
        -self.number()
    }
}

impl ops::Not for &Param {
    type Output = i64;
    fn not(self) -> i64 {
        !self.int_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn untyped_param_accepts_numeric_rewrites() {
        let mut param = Param::new("p").with_value(10);
        assert_eq!(param, 10.0);
        param.set_value(100.0).unwrap();
        assert_eq!(param, 100.0);
        param.set_value(1.0).unwrap();
        assert_eq!(param.current(), Some(&Value::Float(1.0)));
    }

    #[test]
    fn untyped_param_rejects_strings() {
        let mut param = Param::new("p").with_value(10);
        let err = param.set_value("hello").unwrap_err();
        assert!(matches!(err, ParamError::TypeMismatch { .. }));
        assert_eq!(param, 10.0);
    }

    #[test]
    fn booleans_are_accepted_but_not_bounded() {
        let mut param = Param::new("switch").with_bounds(1.0, 10.0);
        param.set_value(true).unwrap();
        assert_eq!(param.as_bool(), Some(true));
    }

    #[rstest]
    #[case(1.0, true)]
    #[case(5.5, true)]
    #[case(10.0, true)]
    #[case(0.999, false)]
    #[case(11.0, false)]
    fn bounds_are_inclusive(#[case] value: f64, #[case] ok: bool) {
        let mut param = Param::new("p").with_bounds(1.0, 10.0);
        assert_eq!(param.set_value(value).is_ok(), ok);
    }

    #[test]
    fn out_of_bounds_write_leaves_value_intact() {
        let mut param = Param::new("p").with_bounds(1.0, 10.0).with_value(1);
        let err = param.set_value(11).unwrap_err();
        assert!(matches!(err, ParamError::OutOfBounds { value, .. } if value == 11.0));
        assert_eq!(param, 1.0);
    }

    #[test]
    fn rejected_update_commits_nothing() {
        let mut param = Param::new("p").with_bounds(0.0, 100.0).with_value(50);
        // value fails against the incoming bounds, so the bounds must not move
        let err = param
            .set(ParamUpdate::new().value(50).bounds(0.0, 10.0).free(true))
            .unwrap_err();
        assert!(matches!(err, ParamError::OutOfBounds { .. }));
        assert_eq!(param.bounds(), Some((0.0, 100.0)));
        assert!(!param.is_free());
    }

    #[test]
    fn typed_param_with_bounds_and_errors() {
        let param = Param::new("n")
            .with_value(1)
            .with_bounds(1.0, 10.0)
            .with_errors(ParamErrors::Asymmetric(0.5, 0.5))
            .typed(ValueType::Int);
        param.validate().unwrap();
        assert_eq!(param.symmetric_error(), 0.5);

        let mut param = param;
        assert!(param.set_value(2.5).is_err());
        assert!(param.set_value(2).is_ok());
    }

    #[test]
    fn symmetric_error_fallbacks() {
        let param = Param::new("p");
        assert_eq!(param.symmetric_error(), 0.0);
        let param = param.with_errors(ParamErrors::Symmetric(0.25));
        assert_eq!(param.symmetric_error(), 0.25);
        let param = param.with_errors(ParamErrors::Asymmetric(0.1, 0.3));
        assert!((param.symmetric_error() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn update_can_retune_bounds_and_freeze() {
        let mut param = Param::new("p").with_value(5.0);
        param
            .set(
                ParamUpdate::new()
                    .bounds(0.0, 10.0)
                    .free(true)
                    .errors(ParamErrors::Symmetric(0.5)),
            )
            .unwrap();
        assert_eq!(param.bounds(), Some((0.0, 10.0)));
        assert!(param.is_free());
        assert_eq!(param.symmetric_error(), 0.5);
        // value untouched by a structural-only update
        assert_eq!(param, 5.0);
    }

    #[test]
    fn arithmetic_delegates_to_the_value() {
        let param = Param::new("x").with_value(6.0);
        assert_eq!(&param + 2.0, 8.0);
        assert_eq!(2.0 + &param, 8.0);
        assert_eq!(&param - 1.0, 5.0);
        assert_eq!(&param * 2.0, 12.0);
        assert_eq!(&param / 4.0, 1.5);
        assert_eq!(&param % 4.0, 2.0);
        assert_eq!(-&param, -6.0);

        let other = Param::new("y").with_value(3.0);
        assert_eq!(&param * &other, 18.0);
    }

    #[test]
    fn comparisons_delegate_to_the_value() {
        let param = Param::new("x").with_value(7);
        assert_eq!(param, 7.0);
        assert_eq!(param, 7i64);
        assert!(param > 6.5);
        assert!(param < 8i64);
        // unset parameters are not comparable
        let unset = Param::new("u");
        assert!(unset.partial_cmp(&1.0).is_none());
    }

    #[test]
    fn integer_transparency() {
        let param = Param::new("mask").with_value(0b1100);
        assert_eq!(&param & 0b1010, 0b1000);
        assert_eq!(&param | 0b0011, 0b1111);
        assert_eq!(&param ^ 0b1111, 0b0011);
        assert_eq!(&param << 1, 0b11000);
        assert_eq!(&param >> 2, 0b11);
        assert_eq!(!&param, !0b1100);
    }

    #[test]
    fn float_helpers() {
        let param = Param::new("x").with_value(7.5);
        assert_eq!(param.floordiv(2.0), 3.0);
        assert_eq!(param.divmod(2.0), (3.0, 1.5));
        assert_eq!(param.pow(2.0), 56.25);
        assert_eq!(param.trunc(), 7);
        let negative = Param::new("n").with_value(-3.25);
        assert_eq!(negative.abs(), 3.25);
    }

    #[test]
    #[should_panic(expected = "arithmetic on unset or non-numeric parameter")]
    fn arithmetic_on_unset_panics() {
        let param = Param::new("u");
        let _ = &param + 1.0;
    }

    #[test]
    fn prototype_validation_checks_bounds() {
        let param = Param::new("p").with_default(20.0).with_bounds(0.0, 10.0);
        assert!(matches!(
            param.validate(),
            Err(ParamError::OutOfBounds { .. })
        ));
    }
}
