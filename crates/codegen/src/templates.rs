//! Template renderer
//!
//! The emitters never assemble whole files by hand; they build a flat
//! string context and ask the renderer to stamp a named template. The
//! contract is deliberately narrow: `render(template_id, context)`,
//! `{{key}}` placeholders, unknown keys substitute to the empty string,
//! unknown template ids are fatal.

use crate::context::Context;
use crudforge_core::{ForgeError, ForgeResult};

/// Stamps a named template with a substitution context.
pub trait Renderer {
    fn render(&self, template_id: &str, context: &Context) -> ForgeResult<String>;
}

/// Renderer over the templates compiled into the binary.
#[derive(Debug, Default)]
pub struct EmbeddedRenderer;

impl EmbeddedRenderer {
    pub fn new() -> Self {
        Self
    }

    fn source(template_id: &str) -> Option<&'static str> {
        let source = match template_id {
            "migration" => MIGRATION,
            "seed" => SEED,
            "model" => MODEL,
            "controller" => CONTROLLER,
            "auth_controller" => AUTH_CONTROLLER,
            "auth_middleware" => AUTH_MIDDLEWARE,
            "routes" => ROUTES,
            "swagger_index" => SWAGGER_INDEX,
            "swagger_entity" => SWAGGER_ENTITY,
            _ => return None,
        };
        Some(source)
    }
}

impl Renderer for EmbeddedRenderer {
    fn render(&self, template_id: &str, context: &Context) -> ForgeResult<String> {
        let source = Self::source(template_id)
            .ok_or_else(|| ForgeError::TemplateNotFound(template_id.to_string()))?;
        Ok(substitute(source, context))
    }
}

/// Replace every `{{key}}` with its context value, empty when absent.
fn substitute(source: &str, context: &Context) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                if let Some(value) = context.get(key) {
                    out.push_str(value);
                }
                rest = &after[end + 2..];
            }
            None => {
                // Unterminated placeholder, emit verbatim.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// Templates
// ============================================================================

const MIGRATION: &str = r#"exports.up = function (knex) {
  return knex.schema.createTable('{{tableName}}', (table) => {
    table.increments('id').primary();
{{body}}
    table.timestamps(true, true);
  });
};

exports.down = function (knex) {
  return knex.schema.dropTableIfExists('{{tableName}}');
};
"#;

const SEED: &str = r#"const faker = require('faker');
{{requires}}
exports.seed = function (knex) {
  return knex('{{tableName}}')
    .del()
    .then(() => {
      const rows = [];
{{defaultRow}}      for (let i = 0; i < {{seedAmount}}; i++) {
        rows.push({
{{fieldValues}}
        });
      }
      return knex('{{tableName}}').insert(rows);
    });
};
"#;

const MODEL: &str = r#"const bookshelf = require('../../database/bookshelf');
{{requires}}
const {{entity}} = bookshelf.model('{{entity}}', {
  tableName: '{{tableName}}',
  hasTimestamps: true,{{hidden}}
{{relationMethods}}});

module.exports = {{entity}};
"#;

const CONTROLLER: &str = r#"const {{entity}} = require('../../models/{{entity}}');
{{requires}}
class {{entity}}Controller {
  async index(req, res, next) {
    try {
      const records = await {{entity}}.fetchAll({ withRelated: [{{withRelated}}] });
      res.json(records);
    } catch (err) {
      next(err);
    }
  }

  async show(req, res, next) {
    try {
      const record = await {{entity}}.where({ id: req.params.id }).fetch({
        require: true,
        withRelated: [{{withRelated}}],
      });
      res.json(record);
    } catch (err) {
      next(err);
    }
  }

  async store(req, res, next) {
    try {
      const record = await new {{entity}}(req.body).save();
      res.status(201).json(record);
    } catch (err) {
      next(err);
    }
  }

  async update(req, res, next) {
    try {
      const record = await {{entity}}.where({ id: req.params.id }).fetch({ require: true });
      await record.save(req.body, { patch: true });
      res.json(record);
    } catch (err) {
      next(err);
    }
  }

  async destroy(req, res, next) {
    try {
      const record = await {{entity}}.where({ id: req.params.id }).fetch({ require: true });
{{fileCleanup}}      await record.destroy();
      res.status(204).end();
    } catch (err) {
      next(err);
    }
  }
}

module.exports = {{entity}}Controller;
"#;

const AUTH_CONTROLLER: &str = r#"const bcrypt = require('bcryptjs');
const jwt = require('jsonwebtoken');
const {{entity}} = require('../../models/{{entity}}');

class AuthController {
  async register(req, res, next) {
    try {
      const payload = { ...req.body };
      payload.{{secret}} = bcrypt.hashSync(payload.{{secret}}, 10);
      const record = await new {{entity}}(payload).save();
      res.status(201).json(record);
    } catch (err) {
      next(err);
    }
  }

  async login(req, res, next) {
    try {
      const record = await {{entity}}.where({ {{identifier}}: req.body.{{identifier}} }).fetch({
        require: true,
      });
      const valid = bcrypt.compareSync(req.body.{{secret}}, record.get('{{secret}}'));
      if (!valid) {
        return res.status(401).json({ error: 'Invalid credentials' });
      }
      const token = jwt.sign({ id: record.id }, process.env.APP_SECRET, { expiresIn: '7d' });
      res.json({ token });
    } catch (err) {
      next(err);
    }
  }
}

module.exports = AuthController;
"#;

const AUTH_MIDDLEWARE: &str = r#"const jwt = require('jsonwebtoken');

module.exports = function authorization(req, res, next) {
  const header = req.headers.authorization || '';
  const token = header.startsWith('Bearer ') ? header.slice(7) : null;
  if (!token) {
    return res.status(401).json({ error: 'Missing token' });
  }
  try {
    req.auth = jwt.verify(token, process.env.APP_SECRET);
    next();
  } catch (err) {
    res.status(401).json({ error: 'Invalid token' });
  }
};
"#;

const ROUTES: &str = r#"// Routes for {{appName}}
const express = require('express');
{{requires}}
const router = express.Router();
{{instances}}
{{endpoints}}
module.exports = router;
"#;

const SWAGGER_INDEX: &str = r#"const definitions = {
{{definitionImports}}
};

module.exports = {
  openapi: '3.0.0',
  info: {
    title: '{{appName}}',
    description: '{{description}}',
    version: '1.0.0',
  },
  paths: {
{{paths}}
  },
  components: {
    schemas: definitions,
  },
};
"#;

const SWAGGER_ENTITY: &str = r#"module.exports = {
  {{entity}}: {
    type: 'object',
    properties: {
{{properties}}
    },
  },
};
"#;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_substitute_basic() {
        let mut ctx = Context::new();
        ctx.insert("tableName".to_string(), "users".to_string());
        assert_eq!(
            substitute("drop table {{tableName}};", &ctx),
            "drop table users;"
        );
    }

    #[test]
    fn test_substitute_unknown_key_is_empty() {
        let ctx = Context::new();
        assert_eq!(substitute("a{{missing}}b", &ctx), "ab");
    }

    #[test]
    fn test_substitute_unterminated_placeholder() {
        let ctx = Context::new();
        assert_eq!(substitute("a{{broken", &ctx), "a{{broken");
    }

    #[test]
    fn test_unknown_template_is_fatal() {
        let renderer = EmbeddedRenderer::new();
        let err = renderer.render("nonexistent", &Context::new()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown template: nonexistent");
    }

    #[test]
    fn test_migration_template_renders() {
        let renderer = EmbeddedRenderer::new();
        let mut ctx = Context::new();
        ctx.insert("tableName".to_string(), "users".to_string());
        ctx.insert(
            "body".to_string(),
            "      table.string('email', 255);".to_string(),
        );
        let out = renderer.render("migration", &ctx).unwrap();
        assert!(out.contains("createTable('users'"));
        assert!(out.contains("table.string('email', 255);"));
        assert!(out.contains("dropTableIfExists('users')"));
    }
}
