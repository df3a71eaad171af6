//! Error types for CrudForge
//!
//! This module provides unified error handling across the generator:
//! schema defects, relation conflicts, sequencing overflows, and
//! emitter (template/filesystem) failures. Every error is fatal to the
//! generation run — nothing is retried, the schema author fixes the
//! defect and re-runs from scratch.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for CrudForge
#[derive(Debug, Error)]
pub enum ForgeError {
    // ========================================================================
    // Schema Errors — raised before any file is written
    // ========================================================================
    /// Duplicate entity name in the loaded schema
    #[error("Duplicate entity name: '{0}' already exists")]
    DuplicateEntity(String),

    /// A relation references an entity that was never loaded
    #[error("Entity with name {0} is not defined")]
    EntityNotFound(String),

    /// Entity-level schema defect (missing fields, bad auth descriptor, …)
    #[error("Invalid entity '{entity}': {message}")]
    InvalidEntity { entity: String, message: String },

    /// General schema defect not tied to a single entity
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    // ========================================================================
    // Relation Conflicts
    // ========================================================================
    /// A many-to-many pair declared incompatible overrides from its two sides
    #[error("Conflicting many-to-many declarations between '{left}' and '{right}': {message}")]
    RelationConflict {
        left: String,
        right: String,
        message: String,
    },

    // ========================================================================
    // Sequencing Errors
    // ========================================================================
    /// More artifacts than the fixed-width seed counter can order
    #[error("Artifact count {count} exceeds the {width}-digit seed counter")]
    SequencingOverflow { count: usize, width: usize },

    // ========================================================================
    // Emitter Errors
    // ========================================================================
    /// Template rendering failed
    #[error("Template rendering failed for '{template}': {message}")]
    TemplateRender { template: String, message: String },

    /// Unknown template id passed to the renderer
    #[error("Unknown template: {0}")]
    TemplateNotFound(String),

    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl ForgeError {
    /// Create an entity-not-found error
    pub fn entity_not_found(name: impl Into<String>) -> Self {
        ForgeError::EntityNotFound(name.into())
    }

    /// Create an invalid-entity error
    pub fn invalid_entity(entity: impl Into<String>, msg: impl Into<String>) -> Self {
        ForgeError::InvalidEntity {
            entity: entity.into(),
            message: msg.into(),
        }
    }

    /// Create a relation-conflict error
    pub fn relation_conflict(
        left: impl Into<String>,
        right: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        ForgeError::RelationConflict {
            left: left.into(),
            right: right.into(),
            message: msg.into(),
        }
    }

    /// Create a template-render error
    pub fn template_render(template: impl Into<String>, msg: impl Into<String>) -> Self {
        ForgeError::TemplateRender {
            template: template.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a schema defect (as opposed to an emitter failure)
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            ForgeError::DuplicateEntity(_)
                | ForgeError::EntityNotFound(_)
                | ForgeError::InvalidEntity { .. }
                | ForgeError::InvalidSchema(_)
                | ForgeError::RelationConflict { .. }
        )
    }

    /// Check if this error happened while emitting files. Partial output may
    /// exist on disk and must be treated as untrusted.
    pub fn is_emitter(&self) -> bool {
        matches!(
            self,
            ForgeError::TemplateRender { .. }
                | ForgeError::TemplateNotFound(_)
                | ForgeError::Io(_)
                | ForgeError::FileWrite { .. }
                | ForgeError::DirectoryCreate { .. }
        )
    }
}

/// Result type alias using ForgeError
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> ForgeResult<T>;
}

impl<T, E: Into<ForgeError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> ForgeResult<T> {
        self.map_err(|e| {
            let err: ForgeError = e.into();
            ForgeError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
