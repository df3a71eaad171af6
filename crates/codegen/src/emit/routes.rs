//! Route emitter
//!
//! One consolidated express router for the whole API. Paths are the
//! dash-cased plural of each entity; file-backed fields add a multer
//! upload stage, and an auth entity guards every route except its own
//! register/login pair.

use crate::context::Context;
use crate::emit::ROUTES_FILE;
use crate::templates::Renderer;
use crate::GeneratedFile;
use crudforge_core::ForgeResult;
use crudforge_schema::naming::{to_dash_case, to_lower_camel};
use crudforge_schema::{Entity, Schema};

/// Emit the route index for the whole schema.
pub fn emit_routes(schema: &Schema, renderer: &dyn Renderer) -> ForgeResult<GeneratedFile> {
    let has_auth = schema.auth_entity().is_some();
    let has_uploads = schema
        .entities
        .iter()
        .any(|e| !e.file_fields().is_empty());

    let mut requires = Vec::new();
    let mut instances = Vec::new();
    let mut endpoints = Vec::new();

    if has_auth {
        requires.push(
            "const authorization = require('../../../middleware/authorization');".to_string(),
        );
        requires.push("const AuthController = require('../../../controllers/v1/Auth');".to_string());
        instances.push("const authController = new AuthController();".to_string());
    }
    if has_uploads {
        requires.push("const multer = require('multer');".to_string());
        instances.push("const upload = multer({ dest: 'uploads/' });".to_string());
    }

    for entity in &schema.entities {
        requires.push(format!(
            "const {}Controller = require('../../../controllers/v1/{}');",
            entity.name, entity.name
        ));
        instances.push(format!(
            "const {} = new {}Controller();",
            instance_name(entity),
            entity.name
        ));
        endpoints.push(entity_endpoints(entity, has_auth));
    }

    if has_auth {
        endpoints.push(
            "router.post('/auth/register', (req, res, next) => authController.register(req, res, next));\n\
             router.post('/auth/login', (req, res, next) => authController.login(req, res, next));\n"
                .to_string(),
        );
    }

    let mut ctx = Context::new();
    ctx.insert("appName".to_string(), schema.meta.app.clone());
    ctx.insert("requires".to_string(), format!("{}\n", requires.join("\n")));
    ctx.insert("instances".to_string(), format!("{}\n", instances.join("\n")));
    ctx.insert("endpoints".to_string(), endpoints.join("\n"));

    let content = renderer.render("routes", &ctx)?;
    Ok(GeneratedFile::new(ROUTES_FILE, content))
}

fn instance_name(entity: &Entity) -> String {
    format!("{}Controller", to_lower_camel(&entity.name))
}

/// URL path base for an entity: dash-cased plural.
pub fn route_base(entity: &Entity) -> String {
    format!("/{}", to_dash_case(&entity.plural()))
}

fn entity_endpoints(entity: &Entity, has_auth: bool) -> String {
    let base = route_base(entity);
    let instance = instance_name(entity);
    let guard = if has_auth { "authorization, " } else { "" };
    let upload = upload_stage(entity);

    let mut lines = Vec::new();
    lines.push(format!(
        "router.get('{}', {}(req, res, next) => {}.index(req, res, next));",
        base, guard, instance
    ));
    lines.push(format!(
        "router.get('{}/:id', {}(req, res, next) => {}.show(req, res, next));",
        base, guard, instance
    ));
    lines.push(format!(
        "router.post('{}', {}{}(req, res, next) => {}.store(req, res, next));",
        base, guard, upload, instance
    ));
    lines.push(format!(
        "router.put('{}/:id', {}{}(req, res, next) => {}.update(req, res, next));",
        base, guard, upload, instance
    ));
    lines.push(format!(
        "router.delete('{}/:id', {}(req, res, next) => {}.destroy(req, res, next));",
        base, guard, instance
    ));
    format!("{}\n", lines.join("\n"))
}

fn upload_stage(entity: &Entity) -> String {
    let files = entity.file_fields();
    match files.as_slice() {
        [] => String::new(),
        [one] => format!("upload.single('{}'), ", one.name),
        many => {
            let specs: Vec<_> = many
                .iter()
                .map(|f| format!("{{ name: '{}' }}", f.name))
                .collect();
            format!("upload.fields([{}]), ", specs.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::EmbeddedRenderer;
    use crudforge_core::FieldType;
    use crudforge_schema::{AuthSpec, Field, ProjectMeta};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_routes_without_auth() {
        let mut schema = Schema::new(ProjectMeta::default());
        let mut profile = Entity::new("UserProfile");
        profile.fields = vec![Field::new("name", FieldType::String)];
        schema.add_entity(profile).unwrap();

        let file = emit_routes(&schema, &EmbeddedRenderer::new()).unwrap();
        assert_eq!(file.path, "server/routes/api/v1/index.js");
        assert!(file.content.contains(
            "router.get('/user-profiles', (req, res, next) => userProfileController.index(req, res, next));"
        ));
        assert!(!file.content.contains("authorization"));
        assert!(!file.content.contains("/auth/login"));
    }

    #[test]
    fn test_routes_with_auth_guard_and_upload() {
        let mut schema = Schema::new(ProjectMeta::default());
        let mut user = Entity::new("User");
        user.fields = vec![
            Field::new("email", FieldType::String),
            Field::new("password", FieldType::String).hidden(),
        ];
        user.auth = Some(AuthSpec {
            identifier: "email".into(),
            secret: "password".into(),
            default_identity: Default::default(),
        });
        let mut doc = Entity::new("Document");
        let mut attachment = Field::new("attachment", FieldType::String);
        attachment.file = true;
        doc.fields = vec![attachment];
        schema.add_entity(user).unwrap();
        schema.add_entity(doc).unwrap();

        let file = emit_routes(&schema, &EmbeddedRenderer::new()).unwrap();
        assert!(file.content.contains("require('../../../middleware/authorization')"));
        assert!(file.content.contains(
            "router.post('/documents', authorization, upload.single('attachment'), (req, res, next) => documentController.store(req, res, next));"
        ));
        assert!(file.content.contains("router.post('/auth/login'"));
        // register/login are the only unguarded routes
        assert!(file
            .content
            .contains("router.post('/auth/register', (req, res, next)"));
    }
}
