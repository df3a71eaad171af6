//! Shared value types for the schema model and the emitters.
//!
//! Field types carry the column vocabulary the migration DSL understands,
//! plus the upper bounds the seeders use when fabricating numeric values.

use serde::{Deserialize, Serialize};

// ============================================================================
// Field Types
// ============================================================================

/// Column type of a declared field.
///
/// The variants mirror the tokens accepted in schema files; `integer` also
/// accepts the shorthand `int`, normalized at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Varchar,
    Char,
    Text,
    Tinyint,
    Smallint,
    Mediumint,
    #[serde(alias = "int")]
    Integer,
    Bigint,
    Decimal,
    Float,
    Date,
    Datetime,
    Time,
    Boolean,
}

impl FieldType {
    /// Token used when emitting the migration column call.
    pub fn token(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Varchar => "varchar",
            FieldType::Char => "char",
            FieldType::Text => "text",
            FieldType::Tinyint => "tinyint",
            FieldType::Smallint => "smallint",
            FieldType::Mediumint => "mediumint",
            FieldType::Integer => "integer",
            FieldType::Bigint => "bigint",
            FieldType::Decimal => "decimal",
            FieldType::Float => "float",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Time => "time",
            FieldType::Boolean => "boolean",
        }
    }

    /// True for types that carry a character length (default 255).
    pub fn has_length(&self) -> bool {
        matches!(
            self,
            FieldType::String | FieldType::Varchar | FieldType::Char
        )
    }

    /// True for types that carry precision and scale (default 18, 2).
    pub fn has_precision(&self) -> bool {
        matches!(self, FieldType::Decimal | FieldType::Float)
    }

    /// Signed upper bound for integral seeding, if the type is integral.
    ///
    /// An unsigned column doubles the bound.
    pub fn max_value(&self, unsigned: bool) -> Option<i64> {
        let base: i64 = match self {
            FieldType::Tinyint => 127,
            FieldType::Smallint => 32_767,
            FieldType::Mediumint => 8_388_607,
            FieldType::Integer | FieldType::Bigint | FieldType::Decimal => 2_147_483_647,
            _ => return None,
        };
        Some(if unsigned { base * 2 } else { base })
    }

    /// Coarse classification driving which fake-value expression the
    /// seeders emit for the column.
    pub fn value_class(&self, unsigned: bool) -> ValueClass {
        match self {
            FieldType::String | FieldType::Varchar | FieldType::Char | FieldType::Text => {
                ValueClass::Text
            }
            FieldType::Tinyint
            | FieldType::Smallint
            | FieldType::Mediumint
            | FieldType::Integer
            | FieldType::Bigint => ValueClass::Integer {
                max: self.max_value(unsigned).unwrap_or(2_147_483_647),
            },
            FieldType::Decimal | FieldType::Float => ValueClass::Decimal,
            FieldType::Date | FieldType::Datetime => ValueClass::Date,
            FieldType::Time => ValueClass::Time,
            FieldType::Boolean => ValueClass::Boolean,
        }
    }
}

/// What kind of fake value a seeded column receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    Text,
    Integer { max: i64 },
    Decimal,
    Date,
    Time,
    Boolean,
}

// ============================================================================
// Default Values
// ============================================================================

/// A literal default for a column, preserved with its JSON type so the
/// migration emits `defaultTo(0)` and `defaultTo('draft')` differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl DefaultValue {
    /// Render the default as a JavaScript expression.
    ///
    /// `raw` suppresses string quoting, letting the schema pass through
    /// expressions such as `knex.fn.now()` verbatim.
    pub fn to_js(&self, raw: bool) -> String {
        match self {
            DefaultValue::Bool(b) => b.to_string(),
            DefaultValue::Int(i) => i.to_string(),
            DefaultValue::Float(f) => f.to_string(),
            DefaultValue::Str(s) => {
                if raw {
                    s.clone()
                } else {
                    format!("'{}'", s)
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
