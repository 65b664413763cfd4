//! Typed parameter descriptors for schema-driven models
//!
//! `modelkit-params` is a standalone descriptor crate: it owns the field
//! types and their validation contracts, and knows nothing about model
//! containers, loaders, or invalidation; consumers wire those up.
//!
//! # Architecture
//!
//! - **Validate-then-set**: every write checks the declared type (and, for
//!   numeric parameters, the bounds) before mutating anything
//! - **Exact typing**: `int` never matches `float`, `bool` never matches `int`
//! - **Numeric transparency**: a `Param` drops into arithmetic and comparison
//!   expressions as if it were the bare number it wraps
//! - **Records, not objects**: serialization goes through `FieldRecord`, an
//!   ordered attribute view with optional entries omitted

pub mod derived;
pub mod error;
pub mod field;
pub mod param;
pub mod property;
pub mod record;
pub mod value;

pub use derived::Derived;
pub use error::{ParamError, Result};
pub use field::Field;
pub use param::{Param, ParamErrors, ParamUpdate};
pub use property::Property;
pub use record::FieldRecord;
pub use value::{Value, ValueType};
