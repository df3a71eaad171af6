//! Seed emitter
//!
//! One seed script per table, fabricating rows whose foreign key values
//! stay inside the referenced table's seeded id range. An auth entity
//! reserves its first row for a known default identity so the generated
//! API is usable immediately after seeding.

use crate::context::{fake_value_expr, indent_block, seed_key_expr, Context};
use crate::emit::{ROW_INDENT, SEEDS_DIR};
use crate::resolver::{ResolvedEntity, ResolvedPivot};
use crate::sequencer::{PlannedSeed, SeedKeySource};
use crate::templates::Renderer;
use crate::GeneratedFile;
use crudforge_core::ForgeResult;
use crudforge_schema::{Entity, Field, Schema};

/// Rows reserved ahead of the fabricated ones. Only the default auth
/// identity reserves a row today.
pub fn reserved_rows(entity: &Entity) -> u32 {
    if entity.is_auth() { 1 } else { 0 }
}

/// Emit the seed script for one entity's table.
pub fn emit_entity_seed(
    schema: &Schema,
    entity: &Entity,
    resolved: &ResolvedEntity,
    planned: &PlannedSeed,
    renderer: &dyn Renderer,
) -> ForgeResult<GeneratedFile> {
    let mut lines = Vec::new();

    for edge in &resolved.belongs_to {
        let target_seed = schema
            .get(&edge.target)
            .map(|t| t.seed_amount)
            .unwrap_or_default();
        let reserved = schema
            .get(&edge.target)
            .map(reserved_rows)
            .unwrap_or_default();
        let source = SeedKeySource::classify(edge, target_seed, reserved);
        lines.push(format!("'{}': {},", edge.fk, seed_key_expr(source, "i")));
    }
    for field in &entity.fields {
        lines.push(format!("'{}': {},", field.name, field_value(entity, field)));
    }

    let mut ctx = Context::new();
    ctx.insert("tableName".to_string(), entity.table_name());
    ctx.insert("seedAmount".to_string(), entity.seed_amount.to_string());
    ctx.insert("fieldValues".to_string(), indent_block(&lines, ROW_INDENT));
    ctx.insert("requires".to_string(), requires(entity));
    ctx.insert("defaultRow".to_string(), default_row(entity));

    let content = renderer.render("seed", &ctx)?;
    Ok(GeneratedFile::new(
        format!("{}/{}", SEEDS_DIR, planned.filename),
        content,
    ))
}

/// Emit the seed script for one join table.
pub fn emit_pivot_seed(
    pivot: &ResolvedPivot,
    planned: &PlannedSeed,
    renderer: &dyn Renderer,
) -> ForgeResult<GeneratedFile> {
    let mut lines = vec![
        format!(
            "'{}': parseInt(Math.random() * {}) + 1,",
            pivot.left.fk, pivot.left.seed_amount
        ),
        format!(
            "'{}': parseInt(Math.random() * {}) + 1,",
            pivot.right.fk, pivot.right.seed_amount
        ),
    ];
    for field in &pivot.fields {
        lines.push(format!("'{}': {},", field.name, fake_value_expr(field)));
    }

    let mut ctx = Context::new();
    ctx.insert("tableName".to_string(), pivot.table.clone());
    ctx.insert("seedAmount".to_string(), pivot.seed_amount.to_string());
    ctx.insert("fieldValues".to_string(), indent_block(&lines, ROW_INDENT));
    ctx.insert("requires".to_string(), String::new());
    ctx.insert("defaultRow".to_string(), String::new());

    let content = renderer.render("seed", &ctx)?;
    Ok(GeneratedFile::new(
        format!("{}/{}", SEEDS_DIR, planned.filename),
        content,
    ))
}

/// Fake value for one column, hashing the auth secret.
fn field_value(entity: &Entity, field: &Field) -> String {
    let expr = fake_value_expr(field);
    match &entity.auth {
        Some(auth) if auth.secret == field.name => {
            format!("bcrypt.hashSync({}, 10)", expr)
        }
        _ => expr,
    }
}

fn requires(entity: &Entity) -> String {
    if entity.is_auth() {
        "const bcrypt = require('bcryptjs');\n".to_string()
    } else {
        String::new()
    }
}

/// The reserved first row for an auth entity, as a `rows.push` statement.
fn default_row(entity: &Entity) -> String {
    let Some(auth) = &entity.auth else {
        return String::new();
    };

    let mut parts = Vec::new();
    let mut has_identifier = false;
    let mut has_secret = false;
    for (key, value) in &auth.default_identity {
        if *key == auth.secret {
            has_secret = true;
            parts.push(format!("'{}': bcrypt.hashSync({}, 10)", key, value));
        } else {
            if *key == auth.identifier {
                has_identifier = true;
            }
            parts.push(format!("'{}': {}", key, value));
        }
    }
    if !has_identifier {
        parts.insert(0, format!("'{}': 'admin'", auth.identifier));
    }
    if !has_secret {
        parts.push(format!("'{}': bcrypt.hashSync('admin', 10)", auth.secret));
    }

    format!("      rows.push({{ {} }});\n", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::sequencer::{plan, TimestampCursor};
    use crate::templates::EmbeddedRenderer;
    use crudforge_core::FieldType;
    use crudforge_schema::{AuthSpec, ProjectMeta, RelationDetail, RelationRef, Relations};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn renderer() -> EmbeddedRenderer {
        EmbeddedRenderer::new()
    }

    fn planned(schema: &Schema) -> (crate::resolver::ResolvedGraph, crate::sequencer::EmissionPlan) {
        let graph = resolve(schema).unwrap();
        let mut cursor = TimestampCursor::new(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let emission = plan(schema, &graph, &mut cursor).unwrap();
        (graph, emission)
    }

    #[test]
    fn test_uniform_foreign_key_draw() {
        let mut schema = Schema::new(ProjectMeta::default());
        let mut user = Entity::new("User");
        user.seed_amount = 20;
        let mut post = Entity::new("Post");
        post.seed_amount = 100;
        post.relations = Relations {
            belongs_to: vec!["User".into()],
            ..Default::default()
        };
        schema.add_entity(user).unwrap();
        schema.add_entity(post).unwrap();

        let (graph, emission) = planned(&schema);
        let file = emit_entity_seed(
            &schema,
            &schema.entities[1],
            graph.entity(1),
            &emission.seeds[1],
            &renderer(),
        )
        .unwrap();

        assert_eq!(file.path, "database/seeds/00200_posts.js");
        assert!(file
            .content
            .contains("'user_id': parseInt(Math.random() * 20) + 1,"));
        assert!(file.content.contains("for (let i = 0; i < 100; i++)"));
    }

    #[test]
    fn test_self_reference_draws_below_row_index() {
        let mut schema = Schema::new(ProjectMeta::default());
        let mut post = Entity::new("Post");
        post.relations = Relations {
            belongs_to: vec![RelationRef::Detailed(RelationDetail {
                entity: "Post".into(),
                field: Some("parent_id".into()),
                ..Default::default()
            })],
            ..Default::default()
        };
        schema.add_entity(post).unwrap();

        let (graph, emission) = planned(&schema);
        let file = emit_entity_seed(
            &schema,
            &schema.entities[0],
            graph.entity(0),
            &emission.seeds[0],
            &renderer(),
        )
        .unwrap();

        assert!(file
            .content
            .contains("'parent_id': parseInt(Math.random() * i) || null,"));
    }

    #[test]
    fn test_forced_unique_is_sequential() {
        let mut schema = Schema::new(ProjectMeta::default());
        let mut user = Entity::new("User");
        user.relations = Relations {
            has_one: vec!["Store".into()],
            ..Default::default()
        };
        let mut store = Entity::new("Store");
        store.relations = Relations {
            belongs_to: vec!["User".into()],
            ..Default::default()
        };
        schema.add_entity(user).unwrap();
        schema.add_entity(store).unwrap();

        let (graph, emission) = planned(&schema);
        let file = emit_entity_seed(
            &schema,
            &schema.entities[1],
            graph.entity(1),
            &emission.seeds[1],
            &renderer(),
        )
        .unwrap();

        assert!(file.content.contains("'user_id': i + 1,"));
    }

    #[test]
    fn test_auth_entity_reserves_default_row() {
        let mut schema = Schema::new(ProjectMeta::default());
        let mut user = Entity::new("User");
        user.fields = vec![
            Field::new("email", FieldType::String),
            Field::new("password", FieldType::String).hidden(),
        ];
        user.auth = Some(AuthSpec {
            identifier: "email".into(),
            secret: "password".into(),
            default_identity: [("email".to_string(), json!("admin@example.com"))]
                .into_iter()
                .collect(),
        });
        schema.add_entity(user).unwrap();

        let (graph, emission) = planned(&schema);
        let file = emit_entity_seed(
            &schema,
            &schema.entities[0],
            graph.entity(0),
            &emission.seeds[0],
            &renderer(),
        )
        .unwrap();

        assert!(file.content.contains("const bcrypt = require('bcryptjs');"));
        assert!(file.content.contains(
            "rows.push({ 'email': \"admin@example.com\", 'password': bcrypt.hashSync('admin', 10) });"
        ));
        assert!(file
            .content
            .contains("'password': bcrypt.hashSync(faker.lorem.sentence().slice(0, 255), 10),"));
    }

    #[test]
    fn test_pivot_seed_draws_both_sides() {
        let mut schema = Schema::new(ProjectMeta::default());
        let mut user = Entity::new("User");
        user.seed_amount = 20;
        user.relations = Relations {
            belongs_to_many: vec!["Post".into()],
            ..Default::default()
        };
        let mut post = Entity::new("Post");
        post.seed_amount = 100;
        schema.add_entity(user).unwrap();
        schema.add_entity(post).unwrap();

        let (graph, emission) = planned(&schema);
        let file = emit_pivot_seed(&graph.pivots[0], &emission.seeds[2], &renderer()).unwrap();

        assert_eq!(file.path, "database/seeds/00300_posts_users.js");
        assert!(file
            .content
            .contains("'post_id': parseInt(Math.random() * 100) + 1,"));
        assert!(file
            .content
            .contains("'user_id': parseInt(Math.random() * 20) + 1,"));
        assert!(file.content.contains("for (let i = 0; i < 20; i++)"));
    }
}
