//! Sequencer
//!
//! Turns a resolved graph into an ordered emission plan: migration
//! timestamps, seed file prefixes, and the key source each fabricated
//! foreign key value draws from.
//!
//! Both cursors are explicit values owned by the plan construction, not
//! wall-clock reads, so the same schema and start date always produce
//! byte-identical filenames.

use crate::resolver::{ResolvedBelongsTo, ResolvedGraph};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use crudforge_core::{ForgeError, ForgeResult};
use crudforge_schema::Schema;

/// Digits in a seed file prefix. Prefixes step by 100, so this width
/// caps a run at 999 seed artifacts.
pub const SEED_PREFIX_WIDTH: usize = 5;
/// Step between consecutive seed prefixes
pub const SEED_PREFIX_STEP: u32 = 100;

// ============================================================================
// Cursors
// ============================================================================

/// Monotonic timestamp source for migration filenames.
///
/// Starts at the start-of-day instant of the given date and advances one
/// second per artifact, so lexical filename order equals emission order.
#[derive(Debug, Clone)]
pub struct TimestampCursor {
    current: NaiveDateTime,
}

impl TimestampCursor {
    /// Cursor starting at midnight of the given date.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            current: date.and_hms_opt(0, 0, 0).unwrap_or_default(),
        }
    }

    /// Cursor starting at midnight of the current local date.
    pub fn for_today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    /// Return the current timestamp string and step one second forward.
    pub fn advance(&mut self) -> String {
        let stamp = self.current.format("%Y%m%d%H%M%S").to_string();
        self.current += Duration::seconds(1);
        stamp
    }
}

/// Fixed-width counter for seed filename prefixes.
#[derive(Debug, Clone, Default)]
pub struct SeedCounter {
    issued: u32,
}

impl SeedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next zero-padded prefix, failing instead of colliding
    /// once the width is exhausted.
    pub fn advance(&mut self) -> ForgeResult<String> {
        self.issued += 1;
        let value = self.issued * SEED_PREFIX_STEP;
        if value >= 10u32.pow(SEED_PREFIX_WIDTH as u32) {
            return Err(ForgeError::SequencingOverflow {
                count: self.issued as usize,
                width: SEED_PREFIX_WIDTH,
            });
        }
        Ok(format!("{:0width$}", value, width = SEED_PREFIX_WIDTH))
    }
}

// ============================================================================
// Seed Key Sources
// ============================================================================

/// Where a fabricated foreign key value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKeySource {
    /// Uniform draw from `[1, max]` where max is the target's seed count
    Uniform { max: u32 },
    /// Draw from `[1, row - 1]`, null for the first row
    SelfReference,
    /// The row's 1-based index, shifted past any reserved rows
    Sequential { offset: u32 },
}

impl SeedKeySource {
    /// Classify a resolved owning reference.
    ///
    /// When an edge is both a self-reference and forced unique, uniqueness
    /// wins: sequential assignment also never points at a row that does
    /// not exist yet, while a random self-draw could repeat.
    pub fn classify(edge: &ResolvedBelongsTo, target_seed_amount: u32, reserved_rows: u32) -> Self {
        if edge.forces_unique {
            SeedKeySource::Sequential {
                offset: reserved_rows,
            }
        } else if edge.self_reference {
            SeedKeySource::SelfReference
        } else {
            SeedKeySource::Uniform {
                max: target_seed_amount,
            }
        }
    }
}

// ============================================================================
// Emission Plan
// ============================================================================

/// What a planned artifact is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Index into the schema's entity list
    Entity(usize),
    /// Index into the resolved graph's pivot list
    Pivot(usize),
}

/// One planned migration file.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMigration {
    pub artifact: Artifact,
    pub timestamp: String,
    pub filename: String,
}

/// One planned seed file.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSeed {
    pub artifact: Artifact,
    pub prefix: String,
    pub filename: String,
}

/// The full ordered plan for one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionPlan {
    pub migrations: Vec<PlannedMigration>,
    pub seeds: Vec<PlannedSeed>,
}

/// Build the emission plan: entities in declaration order, then pivots in
/// first-registration order, for both the migration and seed passes.
pub fn plan(
    schema: &Schema,
    graph: &ResolvedGraph,
    timestamps: &mut TimestampCursor,
) -> ForgeResult<EmissionPlan> {
    let mut counter = SeedCounter::new();
    let mut migrations = Vec::new();
    let mut seeds = Vec::new();

    let artifacts: Vec<(Artifact, String)> = schema
        .entities
        .iter()
        .enumerate()
        .map(|(i, e)| (Artifact::Entity(i), e.table_name()))
        .chain(
            graph
                .pivots
                .iter()
                .enumerate()
                .map(|(i, p)| (Artifact::Pivot(i), p.table.clone())),
        )
        .collect();

    for (artifact, table) in &artifacts {
        let timestamp = timestamps.advance();
        migrations.push(PlannedMigration {
            artifact: *artifact,
            filename: format!("{}_create_table_{}.js", timestamp, table),
            timestamp,
        });
    }

    for (artifact, table) in &artifacts {
        let prefix = counter.advance()?;
        seeds.push(PlannedSeed {
            artifact: *artifact,
            filename: format!("{}_{}.js", prefix, table),
            prefix,
        });
    }

    Ok(EmissionPlan { migrations, seeds })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crudforge_schema::{Entity, ProjectMeta, Relations};
    use pretty_assertions::assert_eq;

    fn sample_schema() -> Schema {
        let mut schema = Schema::new(ProjectMeta::default());
        let mut user = Entity::new("User");
        user.relations = Relations {
            belongs_to_many: vec!["Post".into()],
            ..Default::default()
        };
        let post = Entity::new("Post");
        schema.add_entity(user).unwrap();
        schema.add_entity(post).unwrap();
        schema
    }

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_timestamp_cursor_steps_one_second() {
        let mut cursor = TimestampCursor::new(start_date());
        assert_eq!(cursor.advance(), "20240301000000");
        assert_eq!(cursor.advance(), "20240301000001");
        assert_eq!(cursor.advance(), "20240301000002");
    }

    #[test]
    fn test_seed_counter_prefixes() {
        let mut counter = SeedCounter::new();
        assert_eq!(counter.advance().unwrap(), "00100");
        assert_eq!(counter.advance().unwrap(), "00200");
        assert_eq!(counter.advance().unwrap(), "00300");
    }

    #[test]
    fn test_seed_counter_overflow_is_fatal() {
        let mut counter = SeedCounter::new();
        for _ in 0..999 {
            counter.advance().unwrap();
        }
        let err = counter.advance().unwrap_err();
        assert!(matches!(err, ForgeError::SequencingOverflow { .. }));
    }

    #[test]
    fn test_plan_orders_entities_then_pivots() {
        let schema = sample_schema();
        let graph = resolve(&schema).unwrap();
        let mut cursor = TimestampCursor::new(start_date());
        let plan = plan(&schema, &graph, &mut cursor).unwrap();

        let filenames: Vec<_> = plan.migrations.iter().map(|m| m.filename.as_str()).collect();
        assert_eq!(
            filenames,
            vec![
                "20240301000000_create_table_users.js",
                "20240301000001_create_table_posts.js",
                "20240301000002_create_table_posts_users.js",
            ]
        );

        let seeds: Vec<_> = plan.seeds.iter().map(|s| s.filename.as_str()).collect();
        assert_eq!(
            seeds,
            vec![
                "00100_users.js",
                "00200_posts.js",
                "00300_posts_users.js",
            ]
        );
    }

    #[test]
    fn test_migration_filenames_sort_in_dependency_order() {
        let schema = sample_schema();
        let graph = resolve(&schema).unwrap();
        let mut cursor = TimestampCursor::new(start_date());
        let plan = plan(&schema, &graph, &mut cursor).unwrap();

        let mut sorted: Vec<_> = plan.migrations.iter().map(|m| m.filename.clone()).collect();
        let original = sorted.clone();
        sorted.sort();
        assert_eq!(sorted, original);
    }

    #[test]
    fn test_key_source_classification() {
        let edge = |self_ref, unique| ResolvedBelongsTo {
            target: "User".into(),
            relation_name: "user".into(),
            fk: "user_id".into(),
            nullable: true,
            self_reference: self_ref,
            forces_unique: unique,
        };

        assert_eq!(
            SeedKeySource::classify(&edge(false, false), 20, 0),
            SeedKeySource::Uniform { max: 20 }
        );
        assert_eq!(
            SeedKeySource::classify(&edge(true, false), 20, 0),
            SeedKeySource::SelfReference
        );
        assert_eq!(
            SeedKeySource::classify(&edge(false, true), 20, 1),
            SeedKeySource::Sequential { offset: 1 }
        );
        // uniqueness wins over self-reference
        assert_eq!(
            SeedKeySource::classify(&edge(true, true), 20, 0),
            SeedKeySource::Sequential { offset: 0 }
        );
    }
}
