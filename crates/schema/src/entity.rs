//! Entity declarations
//!
//! An entity describes one table plus its model, controller, seed, and
//! documentation output. Declaration order across the schema file is
//! significant: it drives migration timestamps and seed prefixes.

use crate::field::Field;
use crate::naming::to_table_case;
use crate::relation::Relations;
use crudforge_core::{ForgeError, ForgeResult, Validatable};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default number of seed rows per entity
pub const DEFAULT_SEED_AMOUNT: u32 = 10;

/// Authentication descriptor for an entity that backs login.
///
/// The marked entity gains register/login controller actions, its seed
/// reserves row one for a known default identity, and every other
/// controller action gets guarded by the auth middleware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSpec {
    /// Field used as the login identifier (e.g. `email`)
    pub identifier: String,

    /// Field holding the hashed secret (e.g. `password`)
    pub secret: String,

    /// Column values for the reserved first seed row
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default_identity: BTreeMap<String, Value>,
}

/// One entity declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// PascalCase entity name; class names in the generated code
    pub name: String,

    /// Plural form; defaults to the name with an `s` appended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,

    /// How many seed rows to fabricate
    #[serde(default = "default_seed_amount")]
    pub seed_amount: u32,

    /// Authentication descriptor, at most one entity per schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthSpec>,

    /// Declared columns, in migration order
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Declared relations, grouped by kind
    #[serde(default, skip_serializing_if = "Relations::is_empty")]
    pub relations: Relations,
}

fn default_seed_amount() -> u32 {
    DEFAULT_SEED_AMOUNT
}

impl Entity {
    /// Create an entity with defaults and no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plural: None,
            seed_amount: DEFAULT_SEED_AMOUNT,
            auth: None,
            fields: Vec::new(),
            relations: Relations::default(),
        }
    }

    /// Effective plural form.
    pub fn plural(&self) -> String {
        self.plural
            .clone()
            .unwrap_or_else(|| format!("{}s", self.name))
    }

    /// Table name: the table-cased plural.
    pub fn table_name(&self) -> String {
        to_table_case(&self.plural())
    }

    /// Fields excluded from serialized model output.
    pub fn hidden_fields(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.hidden).collect()
    }

    /// Fields that store uploaded file paths.
    pub fn file_fields(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.file).collect()
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether this entity backs authentication.
    pub fn is_auth(&self) -> bool {
        self.auth.is_some()
    }
}

impl Validatable for Entity {
    fn validate(&self) -> ForgeResult<()> {
        if self.name.is_empty() {
            return Err(ForgeError::InvalidSchema(
                "entity name cannot be empty".into(),
            ));
        }
        if !self
            .name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase())
        {
            return Err(ForgeError::invalid_entity(
                &self.name,
                "entity names must start with an uppercase letter",
            ));
        }

        let mut seen = std::collections::BTreeSet::new();
        for field in &self.fields {
            field.validate()?;
            if !seen.insert(field.name.as_str()) {
                return Err(ForgeError::invalid_entity(
                    &self.name,
                    format!("duplicate field '{}'", field.name),
                ));
            }
        }

        if let Some(auth) = &self.auth {
            if self.field(&auth.identifier).is_none() {
                return Err(ForgeError::invalid_entity(
                    &self.name,
                    format!("auth identifier '{}' is not a declared field", auth.identifier),
                ));
            }
            if self.field(&auth.secret).is_none() {
                return Err(ForgeError::invalid_entity(
                    &self.name,
                    format!("auth secret '{}' is not a declared field", auth.secret),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudforge_core::FieldType;
    use pretty_assertions::assert_eq;

    fn user() -> Entity {
        let mut e = Entity::new("User");
        e.fields = vec![
            Field::new("email", FieldType::String).not_nullable().unique(),
            Field::new("password", FieldType::String).hidden(),
        ];
        e
    }

    #[test]
    fn test_plural_and_table_name_defaults() {
        let e = Entity::new("Post");
        assert_eq!(e.plural(), "Posts");
        assert_eq!(e.table_name(), "posts");

        let mut profile = Entity::new("UserProfile");
        assert_eq!(profile.table_name(), "user_profiles");
        profile.plural = Some("People".to_string());
        assert_eq!(profile.table_name(), "people");
    }

    #[test]
    fn test_seed_amount_default() {
        let json = r#"{"name": "Tag"}"#;
        let e: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(e.seed_amount, 10);
    }

    #[test]
    fn test_hidden_fields() {
        let e = user();
        let hidden: Vec<_> = e.hidden_fields().iter().map(|f| f.name.clone()).collect();
        assert_eq!(hidden, vec!["password"]);
    }

    #[test]
    fn test_validate_rejects_lowercase_name() {
        let e = Entity::new("user");
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_field() {
        let mut e = Entity::new("Post");
        e.fields = vec![
            Field::new("title", FieldType::String),
            Field::new("title", FieldType::Text),
        ];
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_validate_auth_fields_must_exist() {
        let mut e = user();
        e.auth = Some(AuthSpec {
            identifier: "email".to_string(),
            secret: "password".to_string(),
            default_identity: BTreeMap::new(),
        });
        assert!(e.validate().is_ok());

        e.auth = Some(AuthSpec {
            identifier: "username".to_string(),
            secret: "password".to_string(),
            default_identity: BTreeMap::new(),
        });
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_deserialize_full_entity() {
        let json = r#"{
            "name": "Post",
            "plural": "Posts",
            "seedAmount": 100,
            "fields": [{"name": "title", "type": "string", "nullable": false}],
            "relations": {"belongsTo": ["User"]}
        }"#;
        let e: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(e.seed_amount, 100);
        assert_eq!(e.relations.belongs_to[0].entity(), "User");
        assert!(e.validate().is_ok());
    }
}
