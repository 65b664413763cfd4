//! The per-instance model container.
//!
//! A `Model` owns a deep copy of its schema's fields and virtualizes named
//! access over them: aliases resolve before lookup, unknown names fall
//! through to an ordinary attribute bag, and every committed mutation marks
//! all derived fields stale before the commit hook runs.

use std::fmt;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use modelkit_params::{Field, ParamError, ParamUpdate, Value};
use tracing::{debug, warn};

use crate::error::{ModelError, Result};

/// A derived-field loader: computes a fresh value from the owning model.
///
/// Loaders are registered on the `ModelBuilder` and never rebound afterwards.
pub type Loader = Rc<dyn Fn(&Model) -> Result<Value>>;

/// Commit-time extension point.
///
/// `on_commit` runs after every committed mutation with the mutated field's
/// name, and once at the end of construction with `None`, so auxiliary
/// caches held by the hook are always initialized. While the hook runs it is
/// detached from the model, so mutations it performs do not re-enter it.
pub trait ModelHook {
    fn on_commit(&mut self, model: &mut Model, changed: Option<&str>) {
        let _ = (model, changed);
    }
}

/// A named, ordered collection of fields with attribute-style access.
pub struct Model {
    pub(crate) name: String,
    pub(crate) params: IndexMap<String, Field>,
    aliases: IndexMap<String, String>,
    loaders: IndexMap<String, Loader>,
    missing: IndexSet<String>,
    extras: IndexMap<String, Value>,
    hook: Option<Box<dyn ModelHook>>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("missing", &self.missing)
            .field("extras", &self.extras)
            .finish_non_exhaustive()
    }
}

impl Model {
    // --- Lookup ---

    /// The model type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fields, in schema order.
    pub fn params(&self) -> &IndexMap<String, Field> {
        &self.params
    }

    /// The alias table. Read-only.
    pub fn mappings(&self) -> &IndexMap<String, String> {
        &self.aliases
    }

    /// Required fields that are still unset.
    pub fn missing(&self) -> &IndexSet<String> {
        &self.missing
    }

    /// Ordinary (non-schema) attributes stored on this instance.
    pub fn extras(&self) -> &IndexMap<String, Value> {
        &self.extras
    }

    /// Resolve a name through the alias table to a canonical field name.
    fn resolve(&self, name: &str) -> Option<String> {
        let canonical = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        if self.params.contains_key(canonical) {
            Some(canonical.to_string())
        } else {
            None
        }
    }

    /// Get the named field object, recomputing a stale derived value first.
    pub fn getp(&mut self, name: &str) -> Result<&Field> {
        let canonical = self
            .resolve(name)
            .ok_or_else(|| ModelError::UnknownParameter {
                name: name.to_string(),
            })?;
        self.refresh_derived(&canonical)?;
        self.params
            .get(&canonical)
            .ok_or_else(|| ModelError::UnknownParameter { name: canonical })
    }

    // --- Attribute reads ---

    /// Read an attribute: schema fields first (recomputing derived values),
    /// then the ordinary attribute bag.
    pub fn get(&mut self, name: &str) -> Result<Option<Value>> {
        if self.resolve(name).is_some() {
            return Ok(self.getp(name)?.current().cloned());
        }
        if let Some(value) = self.extras.get(name) {
            return Ok(Some(value.clone()));
        }
        Err(ModelError::UnknownAttribute {
            name: name.to_string(),
        })
    }

    /// Read an attribute without recomputing derived values.
    pub fn peek(&self, name: &str) -> Result<Option<&Value>> {
        if let Some(canonical) = self.resolve(name) {
            let field = self
                .params
                .get(&canonical)
                .ok_or(ModelError::UnknownParameter { name: canonical })?;
            return Ok(field.current());
        }
        if let Some(value) = self.extras.get(name) {
            return Ok(Some(value));
        }
        Err(ModelError::UnknownAttribute {
            name: name.to_string(),
        })
    }

    /// The current numeric value of a field. Does not recompute.
    pub fn number(&self, name: &str) -> Result<f64> {
        match self.peek(name)? {
            Some(value) => value.as_f64().ok_or_else(|| {
                ParamError::TypeMismatch {
                    name: name.to_string(),
                    expected: "a numeric value".to_string(),
                    actual: value.kind().as_str().to_string(),
                }
                .into()
            }),
            None => Err(ModelError::Unset {
                name: name.to_string(),
            }),
        }
    }

    /// The current integer value of a field. Does not recompute.
    pub fn integer(&self, name: &str) -> Result<i64> {
        match self.peek(name)? {
            Some(value) => value.as_i64().ok_or_else(|| {
                ParamError::TypeMismatch {
                    name: name.to_string(),
                    expected: "int".to_string(),
                    actual: value.kind().as_str().to_string(),
                }
                .into()
            }),
            None => Err(ModelError::Unset {
                name: name.to_string(),
            }),
        }
    }

    /// The current boolean value of a field. Does not recompute.
    pub fn boolean(&self, name: &str) -> Result<bool> {
        match self.peek(name)? {
            Some(value) => value.as_bool().ok_or_else(|| {
                ParamError::TypeMismatch {
                    name: name.to_string(),
                    expected: "bool".to_string(),
                    actual: value.kind().as_str().to_string(),
                }
                .into()
            }),
            None => Err(ModelError::Unset {
                name: name.to_string(),
            }),
        }
    }

    /// The current string value of a field. Does not recompute.
    pub fn text(&self, name: &str) -> Result<String> {
        match self.peek(name)? {
            Some(Value::Str(s)) => Ok(s.clone()),
            Some(value) => Err(ParamError::TypeMismatch {
                name: name.to_string(),
                expected: "str".to_string(),
                actual: value.kind().as_str().to_string(),
            }
            .into()),
            None => Err(ModelError::Unset {
                name: name.to_string(),
            }),
        }
    }

    // --- Attribute writes ---

    /// Write an attribute: schema fields route through the commit protocol,
    /// anything else lands in the ordinary attribute bag with no
    /// invalidation.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if self.resolve(name).is_some() {
            return self.setp(name, value.into());
        }
        self.extras.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Set the named field, then invalidate derived values and run the
    /// commit hook.
    pub fn setp(&mut self, name: &str, update: impl Into<ParamUpdate>) -> Result<()> {
        self.setp_inner(name, update.into(), true)
    }

    /// Set the named field but leave derived caches alone. The commit hook
    /// still runs.
    pub fn setp_no_invalidate(&mut self, name: &str, update: impl Into<ParamUpdate>) -> Result<()> {
        self.setp_inner(name, update.into(), false)
    }

    fn setp_inner(&mut self, name: &str, update: ParamUpdate, invalidate: bool) -> Result<()> {
        let canonical = self
            .resolve(name)
            .ok_or_else(|| ModelError::UnknownParameter {
                name: name.to_string(),
            })?;
        let field = self
            .params
            .get_mut(&canonical)
            .ok_or_else(|| ModelError::UnknownParameter {
                name: canonical.clone(),
            })?;
        field.set(update)?;
        if invalidate {
            self.clear_derived();
        }
        self.run_hook(Some(canonical.as_str()));
        Ok(())
    }

    /// Apply a batch of attributes.
    ///
    /// Unresolvable names are logged and stored as ordinary attributes, so a
    /// caller can pass along optional extras. Structured updates that do not
    /// fit the target field fall back to their raw value. Derived caches are
    /// invalidated once for the whole batch; the commit hook still runs per
    /// entry. Required fields left unset after the batch fail the call.
    pub fn set_attributes<I, N, U>(&mut self, attrs: I) -> Result<()>
    where
        I: IntoIterator<Item = (N, U)>,
        N: Into<String>,
        U: Into<ParamUpdate>,
    {
        let attrs: Vec<(String, ParamUpdate)> = attrs
            .into_iter()
            .map(|(name, update)| (name.into(), update.into()))
            .collect();
        if !attrs.is_empty() {
            self.clear_derived();
        }
        for (name, update) in attrs {
            match self.resolve(&name) {
                Some(canonical) => {
                    self.apply(&canonical, update)?;
                    self.missing.shift_remove(&canonical);
                    self.run_hook(Some(canonical.as_str()));
                }
                None => {
                    warn!(model = %self.name, attribute = %name, "ignoring unknown attribute");
                    if let Some(value) = update.value {
                        self.extras.insert(name, value);
                    }
                }
            }
        }
        if !self.missing.is_empty() {
            return Err(ModelError::MissingRequired {
                names: self.missing.iter().cloned().collect(),
            });
        }
        Ok(())
    }

    /// Apply one bulk-configuration entry, falling back from a structured
    /// update to its raw value when the field takes no structure.
    fn apply(&mut self, canonical: &str, update: ParamUpdate) -> Result<()> {
        let field = self
            .params
            .get_mut(canonical)
            .ok_or_else(|| ModelError::UnknownParameter {
                name: canonical.to_string(),
            })?;
        let fallback = update.value.clone();
        match field.set(update) {
            Err(ParamError::NotNumeric { .. }) => match fallback {
                Some(value) => field.set_value(value).map_err(ModelError::from),
                None => Err(ParamError::NotNumeric {
                    name: canonical.to_string(),
                }
                .into()),
            },
            other => other.map_err(ModelError::from),
        }
    }

    // --- Invalidation ---

    /// Mark every derived field stale. Recomputation waits for the next read.
    pub fn clear_derived(&mut self) {
        for field in self.params.values_mut() {
            if let Field::Derived(derived) = field {
                derived.clear_value();
            }
        }
    }

    fn refresh_derived(&mut self, canonical: &str) -> Result<()> {
        let stale = matches!(
            self.params.get(canonical),
            Some(Field::Derived(derived)) if derived.is_stale()
        );
        if !stale {
            return Ok(());
        }
        let loader = self
            .loaders
            .get(canonical)
            .cloned()
            .ok_or_else(|| ModelError::NoLoader {
                name: canonical.to_string(),
            })?;
        let value = loader(&*self)?;
        if let Some(Field::Derived(derived)) = self.params.get_mut(canonical) {
            derived.cache(value)?;
        }
        Ok(())
    }

    fn run_hook(&mut self, changed: Option<&str>) {
        if let Some(mut hook) = self.hook.take() {
            hook.on_commit(self, changed);
            self.hook = Some(hook);
        }
    }

    // --- Introspection ---

    /// The field objects, in schema order, optionally filtered to `names`.
    pub fn get_fields(&self, names: Option<&[&str]>) -> Result<Vec<&Field>> {
        let Some(names) = names else {
            return Ok(self.params.values().collect());
        };
        let mut wanted: IndexSet<String> = IndexSet::new();
        for name in names {
            let canonical = self
                .resolve(name)
                .ok_or_else(|| ModelError::UnknownParameter {
                    name: (*name).to_string(),
                })?;
            wanted.insert(canonical);
        }
        Ok(self
            .params
            .iter()
            .filter(|(name, _)| wanted.contains(name.as_str()))
            .map(|(_, field)| field)
            .collect())
    }

    /// Current values, parallel to `get_fields`.
    pub fn field_values(&self, names: Option<&[&str]>) -> Result<Vec<Option<Value>>> {
        Ok(self
            .get_fields(names)?
            .into_iter()
            .map(|field| field.current().cloned())
            .collect())
    }

    /// Symmetric errors, parallel to `get_fields`.
    pub fn field_errors(&self, names: Option<&[&str]>) -> Result<Vec<f64>> {
        Ok(self
            .get_fields(names)?
            .into_iter()
            .map(Field::symmetric_error)
            .collect())
    }
}

/// Builder for `Model`. Created by `Schema::instantiate()`.
///
/// Loaders and the commit hook are registered here and never rebound after
/// `build`.
pub struct ModelBuilder {
    name: String,
    params: IndexMap<String, Field>,
    aliases: IndexMap<String, String>,
    loaders: Vec<(String, Loader)>,
    hook: Option<Box<dyn ModelHook>>,
}

impl ModelBuilder {
    pub(crate) fn new(
        name: String,
        params: IndexMap<String, Field>,
        aliases: IndexMap<String, String>,
    ) -> Self {
        Self {
            name,
            params,
            aliases,
            loaders: Vec::new(),
            hook: None,
        }
    }

    /// Register the loader computing the named derived field.
    pub fn loader<F>(mut self, name: impl Into<String>, loader: F) -> Self
    where
        F: Fn(&Model) -> Result<Value> + 'static,
    {
        self.loaders.push((name.into(), Rc::new(loader)));
        self
    }

    /// Install the commit hook.
    pub fn hook(mut self, hook: impl ModelHook + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Build with no constructor attributes.
    pub fn build(self) -> Result<Model> {
        self.build_with(Vec::<(String, ParamUpdate)>::new())
    }

    /// Wire the loaders, apply the constructor attributes, verify nothing
    /// required is missing, and run the commit hook once.
    pub fn build_with<I, N, U>(self, attrs: I) -> Result<Model>
    where
        I: IntoIterator<Item = (N, U)>,
        N: Into<String>,
        U: Into<ParamUpdate>,
    {
        let mut loaders: IndexMap<String, Loader> = IndexMap::new();
        for (name, loader) in self.loaders {
            let canonical = self.aliases.get(&name).cloned().unwrap_or(name);
            match self.params.get(&canonical) {
                None => return Err(ModelError::UnknownParameter { name: canonical }),
                Some(Field::Derived(_)) => {}
                Some(_) => return Err(ModelError::NotDerived { name: canonical }),
            }
            if loaders.insert(canonical.clone(), loader).is_some() {
                return Err(ModelError::DuplicateName { name: canonical });
            }
        }

        let missing: IndexSet<String> = self
            .params
            .iter()
            .filter(|(_, field)| field.is_required() && field.current().is_none())
            .map(|(name, _)| name.clone())
            .collect();

        let mut model = Model {
            name: self.name,
            params: self.params,
            aliases: self.aliases,
            loaders,
            missing,
            extras: IndexMap::new(),
            hook: self.hook,
        };
        model.set_attributes(attrs)?;
        // run the hook even when nothing was supplied, so subclass caches
        // are always initialized
        model.run_hook(None);
        debug!(model = %model.name, params = model.params.len(), "model constructed");
        Ok(model)
    }
}
