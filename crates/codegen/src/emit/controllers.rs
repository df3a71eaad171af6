//! Controller emitter
//!
//! One CRUD controller per entity, eager-loading every resolved relation,
//! plus the auth controller and authorization middleware when the schema
//! declares an auth entity.

use crate::context::{quoted_list, Context};
use crate::emit::{CONTROLLERS_DIR, MIDDLEWARE_DIR};
use crate::resolver::ResolvedEntity;
use crate::templates::Renderer;
use crate::GeneratedFile;
use crudforge_core::{ForgeError, ForgeResult};
use crudforge_schema::Entity;

/// Relation method names eager-loaded by the entity's controller.
pub fn with_related(resolved: &ResolvedEntity) -> Vec<String> {
    let mut names = Vec::new();
    for edge in &resolved.belongs_to {
        names.push(edge.relation_name.clone());
    }
    for owned in resolved.has_one.iter().chain(&resolved.has_many) {
        names.push(owned.relation_name.clone());
    }
    for edge in &resolved.many_to_many {
        names.push(edge.relation_name.clone());
    }
    names
}

/// Emit the CRUD controller for one entity.
pub fn emit_controller(
    entity: &Entity,
    resolved: &ResolvedEntity,
    renderer: &dyn Renderer,
) -> ForgeResult<GeneratedFile> {
    let mut ctx = Context::new();
    ctx.insert("entity".to_string(), entity.name.clone());
    ctx.insert(
        "withRelated".to_string(),
        quoted_list(&with_related(resolved)),
    );
    ctx.insert("requires".to_string(), file_requires(entity));
    ctx.insert("fileCleanup".to_string(), file_cleanup(entity));

    let content = renderer.render("controller", &ctx)?;
    Ok(GeneratedFile::new(
        format!("{}/{}.js", CONTROLLERS_DIR, entity.name),
        content,
    ))
}

fn file_requires(entity: &Entity) -> String {
    if entity.file_fields().is_empty() {
        String::new()
    } else {
        "const fs = require('fs');\n".to_string()
    }
}

/// Unlink stored uploads before destroying a record.
fn file_cleanup(entity: &Entity) -> String {
    entity
        .file_fields()
        .iter()
        .map(|field| {
            format!(
                "      if (record.get('{name}')) {{\n        fs.unlink(record.get('{name}'), () => {{}});\n      }}\n",
                name = field.name
            )
        })
        .collect()
}

/// Emit the register/login controller for the auth entity.
pub fn emit_auth_controller(
    entity: &Entity,
    renderer: &dyn Renderer,
) -> ForgeResult<GeneratedFile> {
    let auth = entity.auth.as_ref().ok_or_else(|| {
        ForgeError::invalid_entity(&entity.name, "auth controller requires an auth descriptor")
    })?;

    let mut ctx = Context::new();
    ctx.insert("entity".to_string(), entity.name.clone());
    ctx.insert("identifier".to_string(), auth.identifier.clone());
    ctx.insert("secret".to_string(), auth.secret.clone());

    let content = renderer.render("auth_controller", &ctx)?;
    Ok(GeneratedFile::new(
        format!("{}/Auth.js", CONTROLLERS_DIR),
        content,
    ))
}

/// Emit the token-checking middleware guarding non-auth routes.
pub fn emit_auth_middleware(renderer: &dyn Renderer) -> ForgeResult<GeneratedFile> {
    let content = renderer.render("auth_middleware", &Context::new())?;
    Ok(GeneratedFile::new(
        format!("{}/authorization.js", MIDDLEWARE_DIR),
        content,
    ))
}
