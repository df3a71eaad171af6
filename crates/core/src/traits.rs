//! Core traits for CrudForge
//!
//! This module defines the fundamental traits that components throughout
//! the generator implement to provide consistent behavior for validation
//! and persistence.

use crate::error::{ForgeError, ForgeResult};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return a [`ForgeError`] if the state is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use crudforge_core::{Validatable, ForgeResult, ForgeError};
///
/// struct Entity {
///     name: String,
/// }
///
/// impl Validatable for Entity {
///     fn validate(&self) -> ForgeResult<()> {
///         if self.name.is_empty() {
///             return Err(ForgeError::InvalidSchema("entity name cannot be empty".into()));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or a `ForgeError` describing the problem.
    fn validate(&self) -> ForgeResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

// ============================================================================
// Persistable Trait
// ============================================================================

/// Trait for types that can be serialized to and deserialized from files
///
/// Schema descriptors are stored as JSON on disk; this trait provides the
/// shared load/save machinery for them.
pub trait Persistable: Serialize + DeserializeOwned + Sized {
    /// Load the value from a JSON file
    fn load_from_file(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let value = serde_json::from_str(&content)?;
        Ok(value)
    }

    /// Save the value as pretty-printed JSON
    fn save_to_file(&self, path: impl AsRef<Path>) -> ForgeResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content).map_err(|e| ForgeError::FileWrite {
            path: path.as_ref().to_path_buf(),
            message: e.to_string(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
