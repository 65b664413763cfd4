//! The immutable schema template a model type is defined by.
//!
//! A `Schema` is built once per model type and never mutated; every instance
//! deep-copies its fields at construction so no value cell is ever shared
//! between instances (or with the template itself).

use indexmap::IndexMap;
use modelkit_params::Field;
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::model::ModelBuilder;

/// An ordered collection of field prototypes plus an alias table.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: IndexMap<String, Field>,
    aliases: IndexMap<String, String>,
}

impl Schema {
    /// Start assembling a schema for the named model type.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            aliases: Vec::new(),
        }
    }

    /// The model type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field prototypes, in declaration order.
    pub fn fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    /// The alias table, `alias → canonical name`. Read-only.
    pub fn aliases(&self) -> &IndexMap<String, String> {
        &self.aliases
    }

    /// An independent copy of the prototype fields.
    pub fn defaults(&self) -> IndexMap<String, Field> {
        self.fields.clone()
    }

    /// Begin constructing an instance: deep-copies the fields so the
    /// template stays pristine.
    pub fn instantiate(&self) -> ModelBuilder {
        ModelBuilder::new(
            self.name.clone(),
            self.fields.clone(),
            self.aliases.clone(),
        )
    }
}

/// Builder for `Schema`. Created by `Schema::builder()`.
pub struct SchemaBuilder {
    name: String,
    fields: Vec<Field>,
    aliases: Vec<(String, String)>,
}

impl SchemaBuilder {
    /// Add a field prototype. Declaration order is significant.
    pub fn field(mut self, field: impl Into<Field>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Map an alternative name onto a canonical field name.
    pub fn alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.push((alias.into(), canonical.into()));
        self
    }

    /// Validate the prototypes and assemble the schema.
    pub fn build(self) -> Result<Schema> {
        let mut fields: IndexMap<String, Field> = IndexMap::new();
        for field in self.fields {
            field.validate()?;
            let name = field.name().to_string();
            if fields.insert(name.clone(), field).is_some() {
                return Err(ModelError::DuplicateName { name });
            }
        }

        let mut aliases: IndexMap<String, String> = IndexMap::new();
        for (alias, canonical) in self.aliases {
            if !fields.contains_key(&canonical) {
                return Err(ModelError::UnknownParameter { name: canonical });
            }
            if fields.contains_key(&alias) || aliases.insert(alias.clone(), canonical).is_some() {
                return Err(ModelError::DuplicateName { name: alias });
            }
        }

        debug!(
            model = %self.name,
            fields = fields.len(),
            aliases = aliases.len(),
            "schema built"
        );

        Ok(Schema {
            name: self.name,
            fields,
            aliases,
        })
    }
}
