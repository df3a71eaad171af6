//! Model emitter
//!
//! One bookshelf model per entity. Relation methods come straight from
//! the resolved graph so the model, migration, and seed for an entity can
//! never disagree about a foreign key name.

use crate::context::Context;
use crate::emit::MODELS_DIR;
use crate::resolver::ResolvedEntity;
use crate::templates::Renderer;
use crate::GeneratedFile;
use crudforge_core::ForgeResult;
use crudforge_schema::Entity;
use std::collections::BTreeSet;

/// Emit the model for one entity.
pub fn emit_model(
    entity: &Entity,
    resolved: &ResolvedEntity,
    renderer: &dyn Renderer,
) -> ForgeResult<GeneratedFile> {
    let mut ctx = Context::new();
    ctx.insert("entity".to_string(), entity.name.clone());
    ctx.insert("tableName".to_string(), entity.table_name());
    ctx.insert("hidden".to_string(), hidden_clause(entity));
    ctx.insert("requires".to_string(), related_requires(entity, resolved));
    ctx.insert(
        "relationMethods".to_string(),
        relation_methods(resolved),
    );

    let content = renderer.render("model", &ctx)?;
    Ok(GeneratedFile::new(
        format!("{}/{}.js", MODELS_DIR, entity.name),
        content,
    ))
}

fn hidden_clause(entity: &Entity) -> String {
    let hidden: Vec<_> = entity
        .hidden_fields()
        .iter()
        .map(|f| format!("'{}'", f.name))
        .collect();
    if hidden.is_empty() {
        String::new()
    } else {
        format!("\n  hidden: [{}],", hidden.join(", "))
    }
}

/// Requires for related models, so the bookshelf registry knows them
/// before a relation method resolves by name.
fn related_requires(entity: &Entity, resolved: &ResolvedEntity) -> String {
    let mut targets = BTreeSet::new();
    for edge in &resolved.belongs_to {
        targets.insert(edge.target.clone());
    }
    for owned in resolved.has_one.iter().chain(&resolved.has_many) {
        targets.insert(owned.target.clone());
    }
    for edge in &resolved.many_to_many {
        targets.insert(edge.target.clone());
    }
    targets.remove(&entity.name);

    if targets.is_empty() {
        return String::new();
    }
    let lines: Vec<_> = targets
        .iter()
        .map(|t| format!("require('./{}');", t))
        .collect();
    format!("{}\n", lines.join("\n"))
}

fn relation_methods(resolved: &ResolvedEntity) -> String {
    let mut methods = Vec::new();

    for edge in &resolved.belongs_to {
        methods.push(method(
            &edge.relation_name,
            &format!("this.belongsTo('{}', '{}')", edge.target, edge.fk),
        ));
    }
    for owned in &resolved.has_one {
        methods.push(method(
            &owned.relation_name,
            &format!("this.hasOne('{}', '{}')", owned.target, owned.fk_on_target),
        ));
    }
    for owned in &resolved.has_many {
        methods.push(method(
            &owned.relation_name,
            &format!("this.hasMany('{}', '{}')", owned.target, owned.fk_on_target),
        ));
    }
    for edge in &resolved.many_to_many {
        methods.push(method(
            &edge.relation_name,
            &format!(
                "this.belongsToMany('{}', '{}', '{}', '{}')",
                edge.target, edge.pivot_table, edge.own_fk, edge.other_fk
            ),
        ));
    }

    methods.concat()
}

fn method(name: &str, body: &str) -> String {
    format!("  {}() {{\n    return {};\n  }},\n", name, body)
}
