//! Generation orchestration
//!
//! Drives one full run: validate, resolve, sequence, emit. Every piece
//! of run state (resolved graph, cursors, pivot registry) is constructed
//! inside [`Generator::generate`] and dropped when it returns; two runs
//! over the same schema and start date produce identical output.

use crate::emit::{controllers, docs, migrations, models, routes, seeds};
use crate::resolver::resolve;
use crate::sequencer::{plan, Artifact, TimestampCursor};
use crate::templates::{EmbeddedRenderer, Renderer};
use crate::{GeneratedProject, GeneratorConfig};
use crudforge_core::{ForgeResult, Validatable};
use crudforge_schema::Schema;
use tracing::{info, warn};

/// Statistics and warnings from one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationSummary {
    pub entities: usize,
    pub pivots: usize,
    pub files: usize,
    pub warnings: Vec<String>,
}

/// The generation entry point.
pub struct Generator {
    config: GeneratorConfig,
    renderer: Box<dyn Renderer>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            renderer: Box::new(EmbeddedRenderer::new()),
        }
    }

    /// Use a different renderer, e.g. a recording one in tests.
    pub fn with_renderer(config: GeneratorConfig, renderer: Box<dyn Renderer>) -> Self {
        Self { config, renderer }
    }

    /// Generate the full artifact set in memory.
    pub fn generate(&self, schema: &Schema) -> ForgeResult<(GeneratedProject, GenerationSummary)> {
        schema.validate()?;
        let graph = resolve(schema)?;

        let mut cursor = match self.config.start_date {
            Some(date) => TimestampCursor::new(date),
            None => TimestampCursor::for_today(),
        };
        let emission = plan(schema, &graph, &mut cursor)?;

        let mut project = GeneratedProject::new();
        let mut warnings = self.collect_warnings(schema, &graph);
        let renderer = self.renderer.as_ref();

        for planned in &emission.migrations {
            let file = match planned.artifact {
                Artifact::Entity(i) => migrations::emit_entity_migration(
                    schema,
                    &schema.entities[i],
                    graph.entity(i),
                    planned,
                    renderer,
                )?,
                Artifact::Pivot(i) => {
                    migrations::emit_pivot_migration(&graph.pivots[i], planned, renderer)?
                }
            };
            project.add_file(file);
        }

        if self.config.generate_seeds {
            for planned in &emission.seeds {
                let file = match planned.artifact {
                    Artifact::Entity(i) => seeds::emit_entity_seed(
                        schema,
                        &schema.entities[i],
                        graph.entity(i),
                        planned,
                        renderer,
                    )?,
                    Artifact::Pivot(i) => {
                        seeds::emit_pivot_seed(&graph.pivots[i], planned, renderer)?
                    }
                };
                project.add_file(file);
            }
        }

        for (i, entity) in schema.entities.iter().enumerate() {
            project.add_file(models::emit_model(entity, graph.entity(i), renderer)?);
            project.add_file(controllers::emit_controller(
                entity,
                graph.entity(i),
                renderer,
            )?);
        }

        if let Some(auth_entity) = schema.auth_entity() {
            project.add_file(controllers::emit_auth_controller(auth_entity, renderer)?);
            project.add_file(controllers::emit_auth_middleware(renderer)?);
        }

        project.add_file(routes::emit_routes(schema, renderer)?);

        if self.config.generate_docs {
            for (i, entity) in schema.entities.iter().enumerate() {
                project.add_file(docs::emit_entity_doc(entity, graph.entity(i), renderer)?);
            }
            project.add_file(docs::emit_doc_index(schema, renderer)?);
        }

        for warning in &warnings {
            warn!("{}", warning);
        }
        info!(
            entities = schema.entities.len(),
            pivots = graph.pivots.len(),
            files = project.file_count(),
            "generation complete"
        );

        let summary = GenerationSummary {
            entities: schema.entities.len(),
            pivots: graph.pivots.len(),
            files: project.file_count(),
            warnings: std::mem::take(&mut warnings),
        };
        Ok((project, summary))
    }

    /// Generate and write the artifact tree to the configured directory.
    pub fn run(&self, schema: &Schema) -> ForgeResult<GenerationSummary> {
        let (project, summary) = self.generate(schema)?;
        project.write_to_disk(&self.config.output_dir, self.config.overwrite)?;
        Ok(summary)
    }

    fn collect_warnings(
        &self,
        schema: &Schema,
        graph: &crate::resolver::ResolvedGraph,
    ) -> Vec<String> {
        let mut warnings = Vec::new();
        for (i, entity) in schema.entities.iter().enumerate() {
            if entity.fields.is_empty() && graph.entity(i).belongs_to.is_empty() {
                warnings.push(format!(
                    "Entity '{}' has no fields and no foreign keys; its table only carries id and timestamps",
                    entity.name
                ));
            }
            if entity.seed_amount == 0 {
                warnings.push(format!("Entity '{}' seeds zero rows", entity.name));
            }
            for edge in &graph.entity(i).belongs_to {
                if edge.self_reference && !edge.nullable {
                    warnings.push(format!(
                        "Entity '{}': self-referencing column '{}' is NOT NULL, but the first seeded row has nothing to reference",
                        entity.name, edge.fk
                    ));
                }
            }
        }
        warnings
    }
}

// ============================================================================
// Tests
// ============================================================================
