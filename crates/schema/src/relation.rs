//! Relation declarations
//!
//! Entities declare four kinds of relations. Each list entry is either a
//! bare entity name or a descriptor object carrying overrides; the two
//! forms deserialize into one [`RelationRef`] so the resolver never
//! branches on syntax.

use crate::field::Field;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four relation kinds an entity can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// This entity holds the foreign key
    BelongsTo,
    /// The target holds the foreign key, at most one row
    HasOne,
    /// The target holds the foreign key, many rows
    HasMany,
    /// A join table holds both foreign keys
    BelongsToMany,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelationKind::BelongsTo => "belongsTo",
            RelationKind::HasOne => "hasOne",
            RelationKind::HasMany => "hasMany",
            RelationKind::BelongsToMany => "belongsToMany",
        };
        f.write_str(s)
    }
}

/// Reference to a related entity, bare or with overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationRef {
    /// Just the target entity name; every default applies
    Bare(String),
    /// Descriptor with overrides
    Detailed(RelationDetail),
}

impl RelationRef {
    /// Target entity name regardless of form.
    pub fn entity(&self) -> &str {
        match self {
            RelationRef::Bare(name) => name,
            RelationRef::Detailed(d) => &d.entity,
        }
    }

    /// Detail block, if this reference carries one.
    pub fn detail(&self) -> Option<&RelationDetail> {
        match self {
            RelationRef::Bare(_) => None,
            RelationRef::Detailed(d) => Some(d),
        }
    }

    /// Relation method name override, if any.
    pub fn relation_name(&self) -> Option<&str> {
        self.detail().and_then(|d| d.relation.as_deref())
    }

    /// Foreign key column override, if any.
    pub fn field_override(&self) -> Option<&str> {
        self.detail().and_then(|d| d.field.as_deref())
    }
}

impl From<&str> for RelationRef {
    fn from(name: &str) -> Self {
        RelationRef::Bare(name.to_string())
    }
}

/// Overrides a detailed relation reference can carry.
///
/// Which keys are meaningful depends on the relation kind; unknown
/// combinations are ignored rather than rejected so schema files stay
/// forward compatible.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDetail {
    /// Target entity name
    pub entity: String,

    /// Override for the relation method name on the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,

    /// Override for the foreign key column name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Join table name override (belongsToMany only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Join table column referencing the declaring entity (belongsToMany only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fk1: Option<String>,

    /// Join table column referencing the target entity (belongsToMany only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fk2: Option<String>,

    /// Whether the foreign key column accepts NULL (belongsTo only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    /// Seed row count override for the join table (belongsToMany only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_amount: Option<u32>,

    /// Extra payload columns on the join table (belongsToMany only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

/// All relations an entity declares, grouped by kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relations {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub belongs_to: Vec<RelationRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub has_one: Vec<RelationRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub has_many: Vec<RelationRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub belongs_to_many: Vec<RelationRef>,
}

impl Relations {
    /// True when no relation of any kind is declared.
    pub fn is_empty(&self) -> bool {
        self.belongs_to.is_empty()
            && self.has_one.is_empty()
            && self.has_many.is_empty()
            && self.belongs_to_many.is_empty()
    }

    /// Iterate over every reference with its kind, in declaration order
    /// within each kind.
    pub fn iter_all(&self) -> impl Iterator<Item = (RelationKind, &RelationRef)> {
        let b = self
            .belongs_to
            .iter()
            .map(|r| (RelationKind::BelongsTo, r));
        let o = self.has_one.iter().map(|r| (RelationKind::HasOne, r));
        let m = self.has_many.iter().map(|r| (RelationKind::HasMany, r));
        let j = self
            .belongs_to_many
            .iter()
            .map(|r| (RelationKind::BelongsToMany, r));
        b.chain(o).chain(m).chain(j)
    }
}
