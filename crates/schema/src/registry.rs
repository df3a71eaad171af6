//! Schema registry
//!
//! The schema is the root document: project metadata plus the ordered
//! list of entities. Order is preserved from the source file because
//! migration timestamps and seed prefixes follow declaration order.

use crate::entity::Entity;
use crate::relation::RelationRef;
use crudforge_core::{ForgeError, ForgeResult, Persistable, Validatable};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project-level metadata emitted into package manifests and docs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    /// Application display name
    #[serde(default)]
    pub app: String,

    /// Package name (npm-style, dash-case)
    #[serde(default)]
    pub package: String,

    /// One-line project description
    #[serde(default)]
    pub description: String,

    /// Author string
    #[serde(default)]
    pub author: String,
}

/// A full schema: metadata plus entities in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Project metadata
    #[serde(default)]
    pub meta: ProjectMeta,

    /// Entities in declaration order
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Persistable for Schema {}

impl Schema {
    /// Create an empty schema with the given metadata.
    pub fn new(meta: ProjectMeta) -> Self {
        Self {
            meta,
            entities: Vec::new(),
        }
    }

    /// Add an entity, rejecting duplicate names.
    pub fn add_entity(&mut self, entity: Entity) -> ForgeResult<()> {
        if self.get(&entity.name).is_some() {
            return Err(ForgeError::DuplicateEntity(entity.name));
        }
        self.entities.push(entity);
        Ok(())
    }

    /// Look up an entity by name.
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Resolve a relation reference to its target entity.
    pub fn lookup(&self, reference: &RelationRef) -> ForgeResult<&Entity> {
        self.get(reference.entity())
            .ok_or_else(|| ForgeError::entity_not_found(reference.entity()))
    }

    /// The entity backing authentication, if one is declared.
    pub fn auth_entity(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_auth())
    }

    /// Load and validate a schema from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let schema = Self::load_from_file(path)?;
        schema.validate()?;
        Ok(schema)
    }
}

impl Validatable for Schema {
    fn validate(&self) -> ForgeResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for entity in &self.entities {
            entity.validate()?;
            if !seen.insert(entity.name.as_str()) {
                return Err(ForgeError::DuplicateEntity(entity.name.clone()));
            }
        }

        // Every relation target must be a declared entity.
        for entity in &self.entities {
            for (_, reference) in entity.relations.iter_all() {
                self.lookup(reference)?;
            }
        }

        let auth_count = self.entities.iter().filter(|e| e.is_auth()).count();
        if auth_count > 1 {
            return Err(ForgeError::InvalidSchema(format!(
                "at most one entity may declare auth, found {}",
                auth_count
            )));
        }

        Ok(())
    }
}
