//! CrudForge
//!
//! Command-line entry point: turn a declarative entity schema into a
//! complete backend project (migrations, seeds, models, controllers,
//! routes, and API docs).

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use crudforge_codegen::{Generator, GeneratorConfig};
use crudforge_schema::Schema;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crudforge", version, about = "Generate a backend from an entity schema")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the full artifact set from a schema file
    Generate {
        /// Path to the schema JSON file
        #[arg(short, long)]
        schema: PathBuf,

        /// Output directory for the generated project
        #[arg(short, long, default_value = "./generated")]
        out: PathBuf,

        /// Fixed start date (YYYY-MM-DD) for migration timestamps;
        /// defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Overwrite files that already exist
        #[arg(long)]
        overwrite: bool,

        /// Skip seed scripts
        #[arg(long)]
        no_seeds: bool,

        /// Skip API documentation artifacts
        #[arg(long)]
        no_docs: bool,
    },

    /// Validate a schema file without generating anything
    Validate {
        /// Path to the schema JSON file
        #[arg(short, long)]
        schema: PathBuf,
    },

    /// Show what a schema would generate
    Info {
        /// Path to the schema JSON file
        #[arg(short, long)]
        schema: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            schema,
            out,
            date,
            overwrite,
            no_seeds,
            no_docs,
        } => generate(schema, out, date, overwrite, no_seeds, no_docs),
        Command::Validate { schema } => validate(schema),
        Command::Info { schema } => info(schema),
    }
}

fn load(path: &PathBuf) -> anyhow::Result<Schema> {
    Schema::load(path).with_context(|| format!("failed to load schema from {}", path.display()))
}

fn generate(
    schema_path: PathBuf,
    out: PathBuf,
    date: Option<NaiveDate>,
    overwrite: bool,
    no_seeds: bool,
    no_docs: bool,
) -> anyhow::Result<()> {
    let schema = load(&schema_path)?;

    let mut config = GeneratorConfig::new(&out).with_overwrite(overwrite);
    if let Some(date) = date {
        config = config.with_start_date(date);
    }
    if no_seeds {
        config = config.without_seeds();
    }
    if no_docs {
        config = config.without_docs();
    }

    let summary = Generator::new(config).run(&schema)?;

    for warning in &summary.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
    println!(
        "{} {} files for {} entities ({} join tables) in {}",
        "Generated".green().bold(),
        summary.files,
        summary.entities,
        summary.pivots,
        out.display()
    );
    Ok(())
}

fn validate(schema_path: PathBuf) -> anyhow::Result<()> {
    let schema = load(&schema_path)?;
    println!(
        "{} {} ({} entities)",
        "Valid:".green().bold(),
        schema_path.display(),
        schema.entities.len()
    );
    Ok(())
}

fn info(schema_path: PathBuf) -> anyhow::Result<()> {
    let schema = load(&schema_path)?;
    let graph = crudforge_codegen::resolver::resolve(&schema)?;

    println!("{} {}", "App:".bold(), schema.meta.app);
    println!("{}", "Entities:".bold());
    for (i, entity) in schema.entities.iter().enumerate() {
        let resolved = graph.entity(i);
        println!(
            "  {} -> table '{}', {} fields, {} relations, {} seed rows",
            entity.name,
            entity.table_name(),
            entity.fields.len(),
            resolved.belongs_to.len()
                + resolved.has_one.len()
                + resolved.has_many.len()
                + resolved.many_to_many.len(),
            entity.seed_amount
        );
    }
    if !graph.pivots.is_empty() {
        println!("{}", "Join tables:".bold());
        for pivot in &graph.pivots {
            println!(
                "  {} ({} <-> {}), {} seed rows",
                pivot.table, pivot.left.entity, pivot.right.entity, pivot.seed_amount
            );
        }
    }
    if let Some(auth) = schema.auth_entity() {
        println!("{} {}", "Auth entity:".bold(), auth.name);
    }
    Ok(())
}
