//! Field declarations
//!
//! A field is one column of an entity's table. Everything beyond name and
//! type is optional; the defaults here match what the emitted migration
//! DSL assumes (length 255, precision 18 scale 2, nullable columns).

use crudforge_core::{DefaultValue, FieldType, ForgeError, ForgeResult, Validatable, ValueClass};
use serde::{Deserialize, Serialize};

/// Default character length for string-like columns
pub const DEFAULT_LENGTH: u32 = 255;
/// Default precision for decimal columns
pub const DEFAULT_PRECISION: u32 = 18;
/// Default scale for decimal columns
pub const DEFAULT_SCALE: u32 = 2;

/// A single column declaration on an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Column name, snake_case by convention
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Character length for string-like types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Precision for decimal types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,

    /// Scale for decimal types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,

    /// Whether the column accepts NULL. Defaults to true; the migration
    /// only emits `.notNullable()` when this is explicitly false.
    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Emit a unique constraint
    #[serde(default)]
    pub unique: bool,

    /// Emit an index
    #[serde(default)]
    pub index: bool,

    /// Integral column is unsigned, doubling its seeding bound
    #[serde(default)]
    pub unsigned: bool,

    /// Literal default value for the column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,

    /// Pass the default through unquoted (for expressions like `knex.fn.now()`)
    #[serde(default)]
    pub raw_default: bool,

    /// Faker generator path, e.g. `name.firstName`, overriding the
    /// type-based fake value in seeds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faker: Option<String>,

    /// Column stores an uploaded file path; the route gains a multer field
    #[serde(default)]
    pub file: bool,

    /// Exclude the column from serialized model output
    #[serde(default)]
    pub hidden: bool,
}

fn default_true() -> bool {
    true
}

impl Field {
    /// Create a field with the given name and type, everything else defaulted.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            length: None,
            precision: None,
            scale: None,
            nullable: true,
            unique: false,
            index: false,
            unsigned: false,
            default: None,
            raw_default: false,
            faker: None,
            file: false,
            hidden: false,
        }
    }

    /// Mark the column NOT NULL.
    pub fn not_nullable(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Add a unique constraint.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Add an index.
    pub fn indexed(mut self) -> Self {
        self.index = true;
        self
    }

    /// Make an integral column unsigned.
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Set the character length.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Set a faker generator path for seeding.
    pub fn with_faker(mut self, faker: impl Into<String>) -> Self {
        self.faker = Some(faker.into());
        self
    }

    /// Set a literal default.
    pub fn with_default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Hide the column from serialized model output.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Effective character length, applying the 255 default.
    pub fn effective_length(&self) -> u32 {
        self.length.unwrap_or(DEFAULT_LENGTH)
    }

    /// Effective precision and scale, applying the 18/2 defaults.
    pub fn effective_precision(&self) -> (u32, u32) {
        (
            self.precision.unwrap_or(DEFAULT_PRECISION),
            self.scale.unwrap_or(DEFAULT_SCALE),
        )
    }

    /// Value class driving the seeded fake value.
    pub fn value_class(&self) -> ValueClass {
        self.field_type.value_class(self.unsigned)
    }

    /// Faker path split into namespace and method, if an override is set.
    ///
    /// Returns `None` both when no faker path is set and when the path
    /// does not contain exactly one dot.
    pub fn faker_parts(&self) -> Option<(&str, &str)> {
        let path = self.faker.as_deref()?;
        let (namespace, method) = path.split_once('.')?;
        if namespace.is_empty() || method.is_empty() || method.contains('.') {
            return None;
        }
        Some((namespace, method))
    }
}

impl Validatable for Field {
    fn validate(&self) -> ForgeResult<()> {
        if self.name.is_empty() {
            return Err(ForgeError::InvalidSchema(
                "field name cannot be empty".into(),
            ));
        }
        if let Some((precision, scale)) = self
            .precision
            .zip(self.scale)
            .filter(|(p, s)| s > p)
        {
            return Err(ForgeError::InvalidSchema(format!(
                "field '{}': scale {} exceeds precision {}",
                self.name, scale, precision
            )));
        }
        if let Some(path) = &self.faker {
            if self.faker_parts().is_none() {
                return Err(ForgeError::InvalidSchema(format!(
                    "field '{}': faker path '{}' must be 'namespace.method'",
                    self.name, path
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_applied() {
        let f = Field::new("title", FieldType::String);
        assert_eq!(f.effective_length(), 255);
        assert!(f.nullable);
        assert!(!f.unique);

        let d = Field::new("price", FieldType::Decimal);
        assert_eq!(d.effective_precision(), (18, 2));
    }

    #[test]
    fn test_builder_chain() {
        let f = Field::new("email", FieldType::String)
            .not_nullable()
            .unique()
            .with_length(128);
        assert!(!f.nullable);
        assert!(f.unique);
        assert_eq!(f.effective_length(), 128);
    }

    #[test]
    fn test_faker_parts() {
        let f = Field::new("first_name", FieldType::String).with_faker("name.firstName");
        assert_eq!(f.faker_parts(), Some(("name", "firstName")));

        let plain = Field::new("age", FieldType::Integer);
        assert_eq!(plain.faker_parts(), None);

        let malformed = Field::new("x", FieldType::String).with_faker("lorem");
        assert_eq!(malformed.faker_parts(), None);
    }

    #[test]
    fn test_deserialize_minimal() {
        let json = r#"{"name": "amount", "type": "decimal", "unsigned": true}"#;
        let f: Field = serde_json::from_str(json).unwrap();
        assert_eq!(f.name, "amount");
        assert_eq!(f.field_type, FieldType::Decimal);
        assert!(f.unsigned);
        assert!(f.nullable);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_scale() {
        let mut f = Field::new("rate", FieldType::Decimal);
        f.precision = Some(4);
        f.scale = Some(6);
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_faker() {
        let f = Field::new("x", FieldType::String).with_faker("too.many.dots");
        assert!(f.validate().is_err());
    }
}
