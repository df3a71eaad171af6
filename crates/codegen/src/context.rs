//! Artifact context builder
//!
//! Stateless translation from resolved facts into the text fragments and
//! substitution values the emitters consume: migration column DSL lines,
//! fake-value expressions for seed rows, and foreign key expressions that
//! respect the resolved key source. Everything here is derived; nothing
//! is decided here.

use crate::resolver::ResolvedBelongsTo;
use crate::sequencer::SeedKeySource;
use crudforge_core::ValueClass;
use crudforge_schema::Field;
use std::collections::BTreeMap;

/// Flat substitution map handed to the template renderer.
pub type Context = BTreeMap<String, String>;

// ============================================================================
// Fake Values
// ============================================================================

/// JavaScript expression fabricating one value for a seeded column.
///
/// A declared faker path wins; otherwise the column type picks the
/// generator.
pub fn fake_value_expr(field: &Field) -> String {
    if let Some((namespace, method)) = field.faker_parts() {
        return format!("faker.{}.{}()", namespace, method);
    }
    match field.value_class() {
        ValueClass::Text => format!(
            "faker.lorem.sentence().slice(0, {})",
            field.effective_length()
        ),
        ValueClass::Integer { max } => format!("faker.random.number({})", max),
        ValueClass::Decimal => "faker.finance.amount()".to_string(),
        ValueClass::Date => "faker.date.past()".to_string(),
        ValueClass::Time => "faker.time.recent()".to_string(),
        ValueClass::Boolean => "faker.random.boolean()".to_string(),
    }
}

/// JavaScript expression fabricating one foreign key value.
///
/// `row_var` is the 0-based loop index of the row being built.
pub fn seed_key_expr(source: SeedKeySource, row_var: &str) -> String {
    match source {
        SeedKeySource::Uniform { max } => {
            format!("parseInt(Math.random() * {}) + 1", max)
        }
        // First row yields null because no earlier row exists; a zero
        // draw also falls back to null rather than referencing row 0.
        SeedKeySource::SelfReference => {
            format!("parseInt(Math.random() * {}) || null", row_var)
        }
        SeedKeySource::Sequential { offset } => format!("{} + {}", row_var, offset + 1),
    }
}

// ============================================================================
// Migration DSL Fragments
// ============================================================================

/// One `table.<type>(...)` line for a declared column.
pub fn migration_column_line(field: &Field) -> String {
    let token = field.field_type.token();
    let mut line = if field.field_type.has_length() {
        format!(
            "table.{}('{}', {})",
            token,
            field.name,
            field.effective_length()
        )
    } else if field.field_type.has_precision() {
        let (precision, scale) = field.effective_precision();
        format!(
            "table.{}('{}', {}, {})",
            token, field.name, precision, scale
        )
    } else {
        format!("table.{}('{}')", token, field.name)
    };

    if field.unsigned {
        line.push_str(".unsigned()");
    }
    if !field.nullable {
        line.push_str(".notNullable()");
    }
    if field.index {
        line.push_str(".index()");
    }
    if field.unique {
        line.push_str(".unique()");
    }
    if let Some(default) = &field.default {
        line.push_str(&format!(".defaultTo({})", default.to_js(field.raw_default)));
    }
    line.push(';');
    line
}

/// The foreign key column line for an owning reference.
pub fn migration_fk_line(edge: &ResolvedBelongsTo) -> String {
    let mut line = format!("table.integer('{}').unsigned()", edge.fk);
    if !edge.nullable {
        line.push_str(".notNullable()");
    }
    if edge.forces_unique {
        line.push_str(".unique()");
    }
    line.push(';');
    line
}

/// A plain unsigned integer column line for a pivot side.
pub fn migration_pivot_fk_line(fk: &str) -> String {
    format!("table.integer('{}').unsigned().notNullable();", fk)
}

/// The constraint line tying a foreign key column to its target table.
pub fn migration_foreign_constraint(fk: &str, target_table: &str) -> String {
    format!(
        "table.foreign('{}').references('{}.id').onUpdate('CASCADE').onDelete('RESTRICT');",
        fk, target_table
    )
}

// ============================================================================
// Joining Helpers
// ============================================================================

/// Join lines with a newline and the given indent, for splicing a block
/// into a template body.
pub fn indent_block(lines: &[String], indent: &str) -> String {
    lines
        .iter()
        .map(|l| format!("{}{}", indent, l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Quote-and-join a list as JavaScript string literals.
pub fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("'{}'", i))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Tests
// ============================================================================
