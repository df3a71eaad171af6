//! API documentation emitter
//!
//! One swagger schema fragment per entity plus a consolidated index.
//! Property types mirror the resolved column facts; hidden fields stay
//! out of the documented shape just as they stay out of serialization.

use crate::context::Context;
use crate::emit::SWAGGER_DIR;
use crate::resolver::ResolvedEntity;
use crate::templates::Renderer;
use crate::GeneratedFile;
use crudforge_core::{ForgeResult, ValueClass};
use crudforge_schema::{Entity, Schema};

use super::routes::route_base;

/// Emit the schema fragment for one entity.
pub fn emit_entity_doc(
    entity: &Entity,
    resolved: &ResolvedEntity,
    renderer: &dyn Renderer,
) -> ForgeResult<GeneratedFile> {
    let mut lines = vec!["      id: { type: 'integer' },".to_string()];

    for edge in &resolved.belongs_to {
        lines.push(format!("      {}: {{ type: 'integer' }},", edge.fk));
    }
    for field in &entity.fields {
        if field.hidden {
            continue;
        }
        lines.push(format!(
            "      {}: {{ {} }},",
            field.name,
            property_spec(field.value_class())
        ));
    }

    let mut ctx = Context::new();
    ctx.insert("entity".to_string(), entity.name.clone());
    ctx.insert("properties".to_string(), lines.join("\n"));

    let content = renderer.render("swagger_entity", &ctx)?;
    Ok(GeneratedFile::new(
        format!("{}/{}.js", SWAGGER_DIR, entity.name),
        content,
    ))
}

/// Emit the consolidated documentation index.
pub fn emit_doc_index(schema: &Schema, renderer: &dyn Renderer) -> ForgeResult<GeneratedFile> {
    let imports: Vec<_> = schema
        .entities
        .iter()
        .map(|e| format!("  ...require('./{}'),", e.name))
        .collect();

    let mut paths: Vec<_> = schema.entities.iter().map(path_entry).collect();
    if schema.auth_entity().is_some() {
        paths.push(auth_path_entry());
    }

    let mut ctx = Context::new();
    ctx.insert("appName".to_string(), schema.meta.app.clone());
    ctx.insert("description".to_string(), schema.meta.description.clone());
    ctx.insert("definitionImports".to_string(), imports.join("\n"));
    ctx.insert("paths".to_string(), paths.join("\n"));

    let content = renderer.render("swagger_index", &ctx)?;
    Ok(GeneratedFile::new(
        format!("{}/index.js", SWAGGER_DIR),
        content,
    ))
}

fn property_spec(class: ValueClass) -> &'static str {
    match class {
        ValueClass::Text => "type: 'string'",
        ValueClass::Integer { .. } => "type: 'integer'",
        ValueClass::Decimal => "type: 'number'",
        ValueClass::Date => "type: 'string', format: 'date-time'",
        ValueClass::Time => "type: 'string'",
        ValueClass::Boolean => "type: 'boolean'",
    }
}

fn path_entry(entity: &Entity) -> String {
    let base = route_base(entity);
    format!(
        "    '{base}': {{\n      \
         get: {{ summary: 'List {plural}', responses: {{ 200: {{ description: 'OK' }} }} }},\n      \
         post: {{ summary: 'Create a {name}', responses: {{ 201: {{ description: 'Created' }} }} }},\n    \
         }},\n    \
         '{base}/{{id}}': {{\n      \
         get: {{ summary: 'Fetch a {name}', responses: {{ 200: {{ description: 'OK' }} }} }},\n      \
         put: {{ summary: 'Update a {name}', responses: {{ 200: {{ description: 'OK' }} }} }},\n      \
         delete: {{ summary: 'Delete a {name}', responses: {{ 204: {{ description: 'Deleted' }} }} }},\n    \
         }},",
        base = base,
        plural = entity.plural(),
        name = entity.name,
    )
}

fn auth_path_entry() -> String {
    "    '/auth/register': {\n      \
     post: { summary: 'Register a new account', responses: { 201: { description: 'Created' } } },\n    \
     },\n    \
     '/auth/login': {\n      \
     post: { summary: 'Exchange credentials for a token', responses: { 200: { description: 'OK' } } },\n    \
     },"
        .to_string()
}
