//! Migration emitter
//!
//! One `createTable` migration per entity, then one per join table.
//! Column order inside a table is fixed: primary key, foreign key
//! columns, declared fields, foreign key constraints, timestamps.

use crate::context::{
    migration_column_line, migration_fk_line, migration_foreign_constraint,
    migration_pivot_fk_line, indent_block, Context,
};
use crate::emit::{MIGRATIONS_DIR, TABLE_INDENT};
use crate::resolver::{ResolvedEntity, ResolvedPivot};
use crate::sequencer::PlannedMigration;
use crate::templates::Renderer;
use crate::GeneratedFile;
use crudforge_core::ForgeResult;
use crudforge_schema::{Entity, Schema};

/// Emit the migration for one entity's table.
pub fn emit_entity_migration(
    schema: &Schema,
    entity: &Entity,
    resolved: &ResolvedEntity,
    planned: &PlannedMigration,
    renderer: &dyn Renderer,
) -> ForgeResult<GeneratedFile> {
    let mut lines = Vec::new();

    for edge in &resolved.belongs_to {
        lines.push(migration_fk_line(edge));
    }
    for field in &entity.fields {
        lines.push(migration_column_line(field));
    }
    for edge in &resolved.belongs_to {
        let target_table = schema
            .get(&edge.target)
            .map(|t| t.table_name())
            .unwrap_or_default();
        lines.push(migration_foreign_constraint(&edge.fk, &target_table));
    }

    let mut ctx = Context::new();
    ctx.insert("tableName".to_string(), entity.table_name());
    ctx.insert("body".to_string(), indent_block(&lines, TABLE_INDENT));

    let content = renderer.render("migration", &ctx)?;
    Ok(GeneratedFile::new(
        format!("{}/{}", MIGRATIONS_DIR, planned.filename),
        content,
    ))
}

/// Emit the migration for one join table.
pub fn emit_pivot_migration(
    pivot: &ResolvedPivot,
    planned: &PlannedMigration,
    renderer: &dyn Renderer,
) -> ForgeResult<GeneratedFile> {
    let mut lines = vec![
        migration_pivot_fk_line(&pivot.left.fk),
        migration_pivot_fk_line(&pivot.right.fk),
    ];
    for field in &pivot.fields {
        lines.push(migration_column_line(field));
    }
    lines.push(migration_foreign_constraint(&pivot.left.fk, &pivot.left.table));
    lines.push(migration_foreign_constraint(
        &pivot.right.fk,
        &pivot.right.table,
    ));

    let mut ctx = Context::new();
    ctx.insert("tableName".to_string(), pivot.table.clone());
    ctx.insert("body".to_string(), indent_block(&lines, TABLE_INDENT));

    let content = renderer.render("migration", &ctx)?;
    Ok(GeneratedFile::new(
        format!("{}/{}", MIGRATIONS_DIR, planned.filename),
        content,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::sequencer::{plan, TimestampCursor};
    use crate::templates::EmbeddedRenderer;
    use crudforge_core::FieldType;
    use crudforge_schema::{Field, ProjectMeta, RelationDetail, RelationRef, Relations};
    use pretty_assertions::assert_eq;

    fn blog_schema() -> Schema {
        let mut schema = Schema::new(ProjectMeta::default());
        let mut user = Entity::new("User");
        user.fields = vec![Field::new("email", FieldType::String)
            .not_nullable()
            .unique()];
        user.relations = Relations {
            has_one: vec!["Store".into()],
            ..Default::default()
        };
        let mut store = Entity::new("Store");
        store.relations = Relations {
            belongs_to: vec![RelationRef::Detailed(RelationDetail {
                entity: "User".into(),
                nullable: Some(false),
                ..Default::default()
            })],
            ..Default::default()
        };
        schema.add_entity(user).unwrap();
        schema.add_entity(store).unwrap();
        schema
    }

    #[test]
    fn test_entity_migration_column_order() {
        let schema = blog_schema();
        let graph = resolve(&schema).unwrap();
        let mut cursor = TimestampCursor::new(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let emission = plan(&schema, &graph, &mut cursor).unwrap();

        let file = emit_entity_migration(
            &schema,
            &schema.entities[1],
            graph.entity(1),
            &emission.migrations[1],
            &EmbeddedRenderer::new(),
        )
        .unwrap();

        assert_eq!(
            file.path,
            "database/migrations/20240301000001_create_table_stores.js"
        );
        // forced-unique foreign key column precedes the constraint line
        let fk_col = file
            .content
            .find("table.integer('user_id').unsigned().notNullable().unique();")
            .unwrap();
        let constraint = file
            .content
            .find("table.foreign('user_id').references('users.id')")
            .unwrap();
        assert!(fk_col < constraint);
    }

    #[test]
    fn test_pivot_migration_references_both_sides() {
        let mut schema = Schema::new(ProjectMeta::default());
        let mut user = Entity::new("User");
        user.relations = Relations {
            belongs_to_many: vec!["Post".into()],
            ..Default::default()
        };
        schema.add_entity(user).unwrap();
        schema.add_entity(Entity::new("Post")).unwrap();

        let graph = resolve(&schema).unwrap();
        let mut cursor = TimestampCursor::new(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let emission = plan(&schema, &graph, &mut cursor).unwrap();

        let file = emit_pivot_migration(
            &graph.pivots[0],
            &emission.migrations[2],
            &EmbeddedRenderer::new(),
        )
        .unwrap();

        assert!(file.content.contains("createTable('posts_users'"));
        assert!(file.content.contains("table.integer('post_id').unsigned().notNullable();"));
        assert!(file.content.contains("table.integer('user_id').unsigned().notNullable();"));
        assert!(file
            .content
            .contains("table.foreign('post_id').references('posts.id')"));
        assert!(file
            .content
            .contains("table.foreign('user_id').references('users.id')"));
    }
}
