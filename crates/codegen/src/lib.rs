//! # CrudForge Codegen
//!
//! Turns a validated schema into a complete backend artifact set:
//! migrations, seed scripts, models, controllers, routes, and API docs.
//!
//! ## Pipeline
//!
//! ```text
//! Schema -> resolver -> sequencer -> context -> templates -> emit
//! ```
//!
//! - [`resolver`] - Relation resolution and pivot deduplication
//! - [`sequencer`] - Emission ordering, timestamps, seed key sources
//! - [`context`] - Resolved facts to template substitution values
//! - [`templates`] - The renderer contract and embedded templates
//! - [`emit`] - Per-artifact emitters
//! - [`generator`] - Orchestration of a full generation run

pub mod context;
pub mod emit;
pub mod generator;
pub mod resolver;
pub mod sequencer;
pub mod templates;

pub use generator::{GenerationSummary, Generator};

use crudforge_core::{ForgeError, ForgeResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for a generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory the artifact tree is written into
    pub output_dir: PathBuf,
    /// Emit seed scripts
    pub generate_seeds: bool,
    /// Emit API documentation artifacts
    pub generate_docs: bool,
    /// Allow overwriting files that already exist
    pub overwrite: bool,
    /// Fixed start date for migration timestamps; today when unset
    pub start_date: Option<chrono::NaiveDate>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./generated"),
            generate_seeds: true,
            generate_docs: true,
            overwrite: false,
            start_date: None,
        }
    }
}

impl GeneratorConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_start_date(mut self, date: chrono::NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn without_seeds(mut self) -> Self {
        self.generate_seeds = false;
        self
    }

    pub fn without_docs(mut self) -> Self {
        self.generate_docs = false;
        self
    }
}

// ============================================================================
// Generated Files
// ============================================================================

/// Kind of generated file, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    JavaScript,
    Json,
    Markdown,
    Other,
}

impl FileType {
    fn from_path(path: &str) -> Self {
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some("js") => FileType::JavaScript,
            Some("json") => FileType::Json,
            Some("md") => FileType::Markdown,
            _ => FileType::Other,
        }
    }
}

/// A single generated file, path relative to the output root.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
    pub file_type: FileType,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let file_type = FileType::from_path(&path);
        Self {
            path,
            content: content.into(),
            file_type,
        }
    }
}

/// The complete artifact set of one run.
#[derive(Debug, Clone, Default)]
pub struct GeneratedProject {
    pub files: Vec<GeneratedFile>,
}

impl GeneratedProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Find a generated file by its relative path.
    pub fn get(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Write the artifact tree under `root`, creating directories as
    /// needed. Existing files are only replaced when `overwrite` is set.
    pub fn write_to_disk(&self, root: &Path, overwrite: bool) -> ForgeResult<()> {
        for file in &self.files {
            let target = root.join(&file.path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ForgeError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }
            if target.exists() && !overwrite {
                debug!(path = %target.display(), "skipping existing file");
                continue;
            }
            std::fs::write(&target, &file.content).map_err(|e| ForgeError::FileWrite {
                path: target.clone(),
                message: e.to_string(),
            })?;
        }
        info!(files = self.files.len(), root = %root.display(), "wrote generated project");
        Ok(())
    }
}
