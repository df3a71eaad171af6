//! # CrudForge Core
//!
//! Core types, traits, and error handling for CrudForge.
//!
//! This crate provides the foundational building blocks used throughout
//! the CrudForge ecosystem, including:
//!
//! - **Types**: Column data types and their fabricated-value classes
//! - **Traits**: Common behaviors like `Validatable`
//! - **Errors**: Unified error handling with `ForgeError` and `ForgeResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ForgeError, ForgeResult, ResultExt};
pub use traits::{Persistable, Validatable};
pub use types::{DefaultValue, FieldType, ValueClass};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
