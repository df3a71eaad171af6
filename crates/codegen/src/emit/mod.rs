//! Artifact emitters
//!
//! Each submodule owns one artifact family. Emitters are pure: resolved
//! facts plus a renderer in, [`GeneratedFile`](crate::GeneratedFile)s out.
//! The directory layout below is a fixed contract of the generated
//! project, not configuration.

pub mod controllers;
pub mod docs;
pub mod migrations;
pub mod models;
pub mod routes;
pub mod seeds;

pub const MIGRATIONS_DIR: &str = "database/migrations";
pub const SEEDS_DIR: &str = "database/seeds";
pub const MODELS_DIR: &str = "server/models";
pub const CONTROLLERS_DIR: &str = "server/controllers/v1";
pub const SWAGGER_DIR: &str = "server/controllers/v1/swagger";
pub const MIDDLEWARE_DIR: &str = "server/middleware";
pub const ROUTES_FILE: &str = "server/routes/api/v1/index.js";

/// Indent of a line inside the createTable callback.
pub(crate) const TABLE_INDENT: &str = "    ";
/// Indent of a property inside a seeded row literal.
pub(crate) const ROW_INDENT: &str = "          ";
