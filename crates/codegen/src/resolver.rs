//! Relation resolver
//!
//! Walks every declared relation edge and produces a fully resolved graph:
//! concrete foreign key column names, self-reference and forced-uniqueness
//! flags, and a deduplicated list of many-to-many join tables whose
//! identity does not depend on which side declared the relation.
//!
//! All state here is constructed fresh per run. The pivot registry in
//! particular is threaded through resolution explicitly so repeated runs
//! are deterministic and isolated from each other.

use crudforge_core::{ForgeError, ForgeResult};
use crudforge_schema::naming::{foreign_key_for, to_lower_camel};
use crudforge_schema::{Entity, Field, RelationRef, Schema};
use std::collections::BTreeMap;
use tracing::debug;

// ============================================================================
// Resolved Edges
// ============================================================================

/// A resolved owning reference: this entity's table carries the foreign key.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBelongsTo {
    /// Target entity name
    pub target: String,
    /// Relation method name on the model
    pub relation_name: String,
    /// Foreign key column on this entity's table
    pub fk: String,
    /// Whether the column accepts NULL
    pub nullable: bool,
    /// Target is the declaring entity itself
    pub self_reference: bool,
    /// The target declares a singular reverse relation; the column gets a
    /// uniqueness constraint and seeds assign sequential values
    pub forces_unique: bool,
}

/// A resolved singular or plural owned relation: the target's table
/// carries the foreign key.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOwned {
    /// Target entity name
    pub target: String,
    /// Relation method name on the model
    pub relation_name: String,
    /// Foreign key column on the target's table, referencing this entity
    pub fk_on_target: String,
    /// At most one target row (hasOne) vs many (hasMany)
    pub singular: bool,
}

/// This entity's view of a many-to-many edge, for model emission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedManyToMany {
    /// Target entity name
    pub target: String,
    /// Relation method name on the model
    pub relation_name: String,
    /// Canonical join table name
    pub pivot_table: String,
    /// Join table column referencing this entity
    pub own_fk: String,
    /// Join table column referencing the target
    pub other_fk: String,
}

/// One side of a canonical pivot identity.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotSide {
    /// Entity name
    pub entity: String,
    /// Entity table name
    pub table: String,
    /// Join table column referencing this side
    pub fk: String,
    /// Seed row count of this side's entity
    pub seed_amount: u32,
}

/// A canonical pivot identity: identical no matter which side declared it.
///
/// Sides are ordered by table name so the declaration direction never
/// leaks into the emitted artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPivot {
    /// Join table name
    pub table: String,
    /// Side whose table name sorts first
    pub left: PivotSide,
    /// Side whose table name sorts second
    pub right: PivotSide,
    /// Seed row count for the join table
    pub seed_amount: u32,
    /// Payload columns carried on the join table
    pub fields: Vec<Field>,
}

/// Resolved relations of a single entity, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedEntity {
    pub belongs_to: Vec<ResolvedBelongsTo>,
    pub has_one: Vec<ResolvedOwned>,
    pub has_many: Vec<ResolvedOwned>,
    pub many_to_many: Vec<ResolvedManyToMany>,
}

/// The resolver's complete output for one run.
///
/// `entities` is parallel to the schema's entity list; `pivots` holds each
/// join table exactly once, in first-registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedGraph {
    pub entities: Vec<ResolvedEntity>,
    pub pivots: Vec<ResolvedPivot>,
}

impl ResolvedGraph {
    /// Resolved relations for the entity at schema position `index`.
    pub fn entity(&self, index: usize) -> &ResolvedEntity {
        &self.entities[index]
    }
}

// ============================================================================
// Pivot Registry
// ============================================================================

/// Per-run deduplication state for many-to-many join tables.
///
/// Keyed by the unordered entity name pair. A second declaration of the
/// same pair is skipped when its identity matches the registered one and
/// rejected when it conflicts.
#[derive(Debug, Default)]
pub struct PivotRegistry {
    entries: BTreeMap<(String, String), usize>,
    pivots: Vec<ResolvedPivot>,
}

impl PivotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn pair_key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    /// Register a pivot, returning its position in first-registration order.
    ///
    /// A matching re-registration from the reverse side is a no-op; an
    /// identity mismatch between the two declarations is fatal. Identity
    /// covers the join table name and its two column names only: seed count
    /// and payload fields follow the first declaration, and a later
    /// declaration's values for those are discarded.
    pub fn register(&mut self, pivot: ResolvedPivot) -> ForgeResult<usize> {
        let key = Self::pair_key(&pivot.left.entity, &pivot.right.entity);
        if let Some(&index) = self.entries.get(&key) {
            let existing = &self.pivots[index];
            if existing.table != pivot.table {
                return Err(ForgeError::relation_conflict(
                    &pivot.left.entity,
                    &pivot.right.entity,
                    format!(
                        "join table declared as both '{}' and '{}'",
                        existing.table, pivot.table
                    ),
                ));
            }
            if existing.left.fk != pivot.left.fk || existing.right.fk != pivot.right.fk {
                return Err(ForgeError::relation_conflict(
                    &pivot.left.entity,
                    &pivot.right.entity,
                    format!(
                        "join table '{}' declared with different column names",
                        existing.table
                    ),
                ));
            }
            debug!(table = %existing.table, "pivot already registered, skipping");
            return Ok(index);
        }

        let index = self.pivots.len();
        debug!(table = %pivot.table, "registering pivot");
        self.entries.insert(key, index);
        self.pivots.push(pivot);
        Ok(index)
    }

    /// Look up an already registered pivot for an entity pair.
    pub fn get(&self, a: &str, b: &str) -> Option<&ResolvedPivot> {
        self.entries
            .get(&Self::pair_key(a, b))
            .map(|&i| &self.pivots[i])
    }

    /// Consume the registry, yielding pivots in first-registration order.
    pub fn into_pivots(self) -> Vec<ResolvedPivot> {
        self.pivots
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the whole schema into a [`ResolvedGraph`].
///
/// Fails on unknown relation targets and on many-to-many pairs whose two
/// declarations disagree about the join table identity.
pub fn resolve(schema: &Schema) -> ForgeResult<ResolvedGraph> {
    let mut registry = PivotRegistry::new();
    let mut entities = Vec::with_capacity(schema.entities.len());

    for entity in &schema.entities {
        entities.push(resolve_entity(schema, entity, &mut registry)?);
    }

    Ok(ResolvedGraph {
        entities,
        pivots: registry.into_pivots(),
    })
}

fn resolve_entity(
    schema: &Schema,
    entity: &Entity,
    registry: &mut PivotRegistry,
) -> ForgeResult<ResolvedEntity> {
    let mut resolved = ResolvedEntity::default();

    for reference in &entity.relations.belongs_to {
        resolved
            .belongs_to
            .push(resolve_belongs_to(schema, entity, reference)?);
    }
    for reference in &entity.relations.has_one {
        resolved
            .has_one
            .push(resolve_owned(schema, entity, reference, true)?);
    }
    for reference in &entity.relations.has_many {
        resolved
            .has_many
            .push(resolve_owned(schema, entity, reference, false)?);
    }
    for reference in &entity.relations.belongs_to_many {
        let (view, pivot) = resolve_many_to_many(schema, entity, reference)?;
        registry.register(pivot)?;
        resolved.many_to_many.push(view);
    }

    Ok(resolved)
}

fn resolve_belongs_to(
    schema: &Schema,
    entity: &Entity,
    reference: &RelationRef,
) -> ForgeResult<ResolvedBelongsTo> {
    let target = schema.lookup(reference)?;
    let fk = reference
        .field_override()
        .map(str::to_string)
        .unwrap_or_else(|| foreign_key_for(&target.name));
    let relation_name = reference
        .relation_name()
        .map(str::to_string)
        .unwrap_or_else(|| to_lower_camel(&target.name));
    let nullable = reference
        .detail()
        .and_then(|d| d.nullable)
        .unwrap_or(true);
    let self_reference = target.name == entity.name;
    let forces_unique = declares_has_one_back(target, &entity.name);

    Ok(ResolvedBelongsTo {
        target: target.name.clone(),
        relation_name,
        fk,
        nullable,
        self_reference,
        forces_unique,
    })
}

/// True when `target` declares a hasOne relation back to `entity_name`.
fn declares_has_one_back(target: &Entity, entity_name: &str) -> bool {
    target
        .relations
        .has_one
        .iter()
        .any(|r| r.entity() == entity_name)
}

fn resolve_owned(
    schema: &Schema,
    entity: &Entity,
    reference: &RelationRef,
    singular: bool,
) -> ForgeResult<ResolvedOwned> {
    let target = schema.lookup(reference)?;
    let fk_on_target = reference
        .field_override()
        .map(str::to_string)
        .unwrap_or_else(|| foreign_key_for(&entity.name));
    let relation_name = reference.relation_name().map(str::to_string).unwrap_or_else(|| {
        if singular {
            to_lower_camel(&target.name)
        } else {
            to_lower_camel(&target.plural())
        }
    });

    Ok(ResolvedOwned {
        target: target.name.clone(),
        relation_name,
        fk_on_target,
        singular,
    })
}

fn resolve_many_to_many(
    schema: &Schema,
    entity: &Entity,
    reference: &RelationRef,
) -> ForgeResult<(ResolvedManyToMany, ResolvedPivot)> {
    let target = schema.lookup(reference)?;
    let detail = reference.detail();

    let own_fk = detail
        .and_then(|d| d.fk1.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| foreign_key_for(&entity.name));
    let other_fk = detail
        .and_then(|d| d.fk2.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| foreign_key_for(&target.name));

    // A self-referential pair would give both sides the same default
    // column; without distinct fk1/fk2 overrides the join table cannot
    // tell the two ends apart.
    if entity.name == target.name && own_fk == other_fk {
        return Err(ForgeError::relation_conflict(
            &entity.name,
            &target.name,
            format!(
                "self-referential join table needs distinct fk1/fk2 columns, got '{}' for both sides",
                own_fk
            ),
        ));
    }

    let own_table = entity.table_name();
    let other_table = target.table_name();

    // Canonical name: explicit override wins, otherwise the two table
    // names in lexicographic order joined with an underscore.
    let table = detail
        .and_then(|d| d.table.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| {
            if own_table <= other_table {
                format!("{}_{}", own_table, other_table)
            } else {
                format!("{}_{}", other_table, own_table)
            }
        });

    let own_side = PivotSide {
        entity: entity.name.clone(),
        table: own_table,
        fk: own_fk.clone(),
        seed_amount: entity.seed_amount,
    };
    let other_side = PivotSide {
        entity: target.name.clone(),
        table: other_table,
        fk: other_fk.clone(),
        seed_amount: target.seed_amount,
    };

    // Side order in the identity follows table order, not declaration order.
    let (left, right) = if own_side.table <= other_side.table {
        (own_side, other_side)
    } else {
        (other_side, own_side)
    };

    let seed_amount = detail
        .and_then(|d| d.seed_amount)
        .unwrap_or_else(|| left.seed_amount.min(right.seed_amount));
    let fields = detail.map(|d| d.fields.clone()).unwrap_or_default();

    let relation_name = reference
        .relation_name()
        .map(str::to_string)
        .unwrap_or_else(|| to_lower_camel(&target.plural()));

    let view = ResolvedManyToMany {
        target: target.name.clone(),
        relation_name,
        pivot_table: table.clone(),
        own_fk,
        other_fk,
    };
    let pivot = ResolvedPivot {
        table,
        left,
        right,
        seed_amount,
        fields,
    };

    Ok((view, pivot))
}

// ============================================================================
// Tests
// ============================================================================
