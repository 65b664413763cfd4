//! Schema-driven model container
//!
//! `modelkit-model` owns the container side of the parameter system: the
//! immutable `Schema` template, the per-instance `Model` with attribute-style
//! access, loader registration for derived fields, required-field tracking,
//! and the commit protocol that invalidates derived caches on every write.
//!
//! # Architecture
//!
//! - **Template and instance**: a `Schema` is built once per model type;
//!   every `Model` deep-copies it, so no value cell is shared
//! - **Explicit wiring**: derived-field loaders and the commit hook are
//!   registered on the `ModelBuilder` and never rebound afterwards
//! - **Invalidate, don't recompute**: a committed write marks every derived
//!   field stale; recomputation waits for the next read
//! - **Tolerant bulk configuration**: unknown names are logged and kept as
//!   ordinary attributes, but missing required fields fail loudly

pub mod error;
pub mod model;
pub mod render;
pub mod schema;

pub use error::{ModelError, Result};
pub use model::{Loader, Model, ModelBuilder, ModelHook};
pub use render::ModelRecord;
pub use schema::{Schema, SchemaBuilder};
