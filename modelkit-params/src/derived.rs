//! Derived field: a lazily computed, memoized value slot.
//!
//! The descriptor only tracks the cache and its staleness; the loader that
//! recomputes the value is registered on the owning model at construction
//! and invoked from there.

use crate::error::Result;
use crate::property::Property;
use crate::record::FieldRecord;
use crate::value::{Value, ValueType};

/// A field whose value is computed on demand and invalidated whenever a
/// sibling field changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    prop: Property,
    stale: bool,
}

impl Derived {
    /// A new derived field, stale until first computed.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            prop: Property::new(name),
            stale: true,
        }
    }

    // --- Builder methods ---

    /// Supply an initial value. The field then counts as already cached and
    /// the loader is not consulted until the cache is cleared.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.prop = self.prop.with_value(value);
        self.stale = false;
        self
    }

    /// Supply a default. Like an initial value, this counts as cached.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.prop = self.prop.with_default(default);
        self.stale = false;
        self
    }

    pub fn typed(mut self, value_type: ValueType) -> Self {
        self.prop = self.prop.typed(value_type);
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

    // --- Accessors ---

    pub fn name(&self) -> &str {
        self.prop.name()
    }

    /// The cached value (or construction-time default). Recomputation is the
    /// owning model's job; check `is_stale` before trusting this.
    pub fn current(&self) -> Option<&Value> {
        self.prop.current()
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.prop.value_type()
    }

    pub fn help(&self) -> &str {
        self.prop.help()
    }

    pub fn format(&self) -> Option<&str> {
        self.prop.format()
    }

    /// Whether the cache must be recomputed before the next read.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    // --- Mutation ---

    /// Store a computed value, validated like any write, and clear staleness.
    /// A failed validation leaves the field stale.
    pub fn cache(&mut self, value: impl Into<Value>) -> Result<()> {
        self.prop.set_value(value)?;
        self.stale = false;
        Ok(())
    }

    /// Invalidate: drop the cached value and mark the field stale.
    pub fn clear_value(&mut self) {
        self.prop.clear_value();
        self.stale = true;
    }

    pub fn to_record(&self) -> FieldRecord {
        self.prop.to_record()
    }

    pub fn validate(&self) -> Result<()> {
        self.prop.validate()
    }
}
