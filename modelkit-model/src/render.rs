//! Serialization and human-readable rendering of a model.
//!
//! `ModelRecord` is the ordered wire view (a synthetic `name` entry followed
//! by one attribute record per field) and round-trips through YAML.
//! `render_text` produces the aligned multi-line summary block.

use std::fmt;
use std::fmt::Write;

use indexmap::IndexMap;
use modelkit_params::FieldRecord;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Model;

/// The ordered record of a model: its type name, then every field's
/// attribute record in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub name: String,
    #[serde(flatten)]
    pub params: IndexMap<String, FieldRecord>,
}

impl Model {
    /// The ordered record of this model.
    pub fn to_record(&self) -> ModelRecord {
        ModelRecord {
            name: self.name.clone(),
            params: self
                .params
                .iter()
                .map(|(name, field)| (name.clone(), field.to_record()))
                .collect(),
        }
    }

    /// Dump this model's record as a YAML string.
    pub fn dump(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(&self.to_record())?)
    }

    /// A multi-line summary: the type name at `indent`, then one aligned
    /// `name : value` line per field. A model with no fields renders as just
    /// the header line.
    pub fn render_text(&self, indent: usize) -> String {
        let mut out = String::new();
        let _ = write!(out, "{:indent$}{}", "", self.name, indent = indent);
        if self.params.is_empty() {
            return out;
        }
        let _ = write!(out, "\n{:pad$}Parameters:", "", pad = indent + 2);
        let width = self.params.keys().map(String::len).max().unwrap_or(0);
        for (name, field) in &self.params {
            let value = match field.current() {
                Some(value) => value.to_string(),
                None => "~".to_string(),
            };
            let _ = write!(out, "\n{:pad$}{name:<width$} : {value}", "", pad = indent + 4);
        }
        out
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_text(0))
    }
}
