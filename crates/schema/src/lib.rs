//! # CrudForge Schema
//!
//! The schema model: the in-memory representation of a declared backend.
//! A schema file names entities, their fields, and the relations between
//! them; this crate parses, validates, and exposes that document to the
//! code generators.
//!
//! ## Structure
//!
//! - [`registry`] - The root [`Schema`] document and entity lookup
//! - [`entity`] - [`Entity`] declarations with fields and auth
//! - [`field`] - [`Field`] column declarations
//! - [`relation`] - [`RelationRef`] and the four relation kinds
//! - [`naming`] - Identifier derivation (table case, dash case)

pub mod entity;
pub mod field;
pub mod naming;
pub mod registry;
pub mod relation;

pub use entity::{AuthSpec, Entity, DEFAULT_SEED_AMOUNT};
pub use field::{Field, DEFAULT_LENGTH, DEFAULT_PRECISION, DEFAULT_SCALE};
pub use registry::{ProjectMeta, Schema};
pub use relation::{RelationDetail, RelationKind, RelationRef, Relations};

/// Commonly used imports
pub mod prelude {
    pub use crate::entity::{AuthSpec, Entity};
    pub use crate::field::Field;
    pub use crate::registry::{ProjectMeta, Schema};
    pub use crate::relation::{RelationDetail, RelationKind, RelationRef, Relations};
    pub use crudforge_core::{FieldType, ForgeError, ForgeResult, Validatable};
}
