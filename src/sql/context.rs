//! Schema context resolution.
//!
//! Turns the recognized entity list into a concrete (database, table,
//! columns) target. Entities fill in for each other: a lone column pulls
//! in its home table and database, a lone table pulls in its database.
//! A database on its own is a legitimate target for listing operations.

use serde::Serialize;

use crate::pipeline::entities::{Entity, EntityKind};
use crate::schema::{normalize_lookup, SchemaMap};

/// Concrete statement target derived from the recognized entities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedContext {
    pub database: Option<String>,
    pub table: Option<String>,
    /// Explicitly mentioned columns, in mention order, duplicates
    /// retained so positional pairing sees every mention.
    pub columns: Vec<String>,
    /// Human-readable notes on inferences and conflicts.
    pub notes: Vec<String>,
}

impl ResolvedContext {
    /// A target with at least a table is ready for row-level statements.
    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }
}

/// Resolve the statement target from entities, in two passes: collect
/// what was said explicitly, then infer what was left unsaid from the
/// schema hierarchy.
pub fn resolve_schema_context(entities: &[Entity], schema: &SchemaMap) -> ResolvedContext {
    let mut ctx = ResolvedContext::default();

    for entity in entities {
        let Some(value) = entity.value.as_deref() else {
            continue;
        };
        match entity.kind {
            EntityKind::Database => {
                if ctx.database.is_none() {
                    ctx.database = Some(value.to_string());
                }
            }
            EntityKind::Table => {
                if ctx.table.is_none() {
                    ctx.table = Some(value.to_string());
                }
            }
            EntityKind::Column => {
                ctx.columns.push(value.to_string());
            }
            EntityKind::Unmatched => {}
        }
    }

    // Graph inference fills in only what was left unsaid.
    if ctx.database.is_none() {
        if let Some(table) = ctx.table.as_deref() {
            if let Some(db) = schema.database_of_table(table) {
                ctx.notes
                    .push(format!("database '{db}' inferred from table '{table}'"));
                ctx.database = Some(db.to_string());
            }
        }
    }

    if ctx.table.is_none() {
        match (&ctx.database, ctx.columns.as_slice()) {
            // A named database plus a single column: adopt the column's
            // table only if it actually lives in that database.
            (Some(db), [column]) => {
                let home = schema
                    .iter_column_homes()
                    .find(|(col, (home_db, _))| {
                        col.eq_ignore_ascii_case(column) && home_db.eq_ignore_ascii_case(db)
                    })
                    .map(|(_, (_, table))| table.to_string());
                if let Some(table) = home {
                    ctx.notes.push(format!(
                        "table '{table}' inferred from column '{column}' in database '{db}'"
                    ));
                    ctx.table = Some(table);
                }
            }
            // Nothing but columns: the first column with a known home
            // supplies both the database and the table.
            (None, columns) if !columns.is_empty() => {
                for column in columns {
                    if let Some((db, table)) = schema.home_of_column(column) {
                        ctx.notes.push(format!(
                            "database '{db}' and table '{table}' inferred from column '{column}'"
                        ));
                        ctx.database = Some(db.to_string());
                        ctx.table = Some(table.to_string());
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    // Remap columns onto the resolved table's own spelling. Columns with
    // no counterpart in that table pass through unchanged.
    if let Some(table) = ctx.table.as_deref() {
        if let Some(table_columns) = schema.columns_of(table) {
            for column in ctx.columns.iter_mut() {
                if let Some(original) = remap_column(column, table_columns) {
                    if original != *column {
                        ctx.notes
                            .push(format!("column '{column}' mapped to '{original}'"));
                        *column = original;
                    }
                }
            }
        }
    }

    ctx
}

/// Case-insensitive exact match first, then punctuation-insensitive.
fn remap_column(name: &str, table_columns: &[String]) -> Option<String> {
    table_columns
        .iter()
        .find(|c| c.eq_ignore_ascii_case(name))
        .or_else(|| {
            let wanted = normalize_lookup(name);
            table_columns.iter().find(|c| normalize_lookup(c) == wanted)
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::entities::recognize_entities;
    use crate::schema::SchemaCatalog;

    fn schema() -> SchemaMap {
        SchemaMap::build(
            &SchemaCatalog::from_json(
                r#"{"databases": [
                    {"name": "astronauts_db", "tables": [
                        {"name": "personal_info", "columns": ["nationality", "year_of_birth"]}
                    ]},
                    {"name": "stars_db", "tables": [
                        {"name": "stars", "columns": ["star name", "luminosity"]}
                    ]}
                ]}"#,
            )
            .unwrap(),
        )
    }

    fn ctx_for(words: &[&str]) -> ResolvedContext {
        let schema = schema();
        let tokens: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        let entities = recognize_entities(&tokens, &schema, false, 0.8);
        resolve_schema_context(&entities, &schema)
    }

    #[test]
    fn lone_column_pulls_in_table_and_database() {
        let ctx = ctx_for(&["nationality"]);
        assert_eq!(ctx.database.as_deref(), Some("astronauts_db"));
        assert_eq!(ctx.table.as_deref(), Some("personal_info"));
        assert_eq!(ctx.columns, vec!["nationality"]);
    }

    #[test]
    fn lone_table_pulls_in_database() {
        let ctx = ctx_for(&["stars"]);
        assert_eq!(ctx.database.as_deref(), Some("stars_db"));
        assert_eq!(ctx.table.as_deref(), Some("stars"));
        assert!(ctx.columns.is_empty());
    }

    #[test]
    fn bare_database_resolves_without_table() {
        let ctx = ctx_for(&["asteroids"]);
        assert!(ctx.database.is_none());
        let ctx = ctx_for(&["stars_db"]);
        assert_eq!(ctx.database.as_deref(), Some("stars_db"));
        assert!(ctx.table.is_none());
    }

    #[test]
    fn database_plus_single_column_adopts_matching_table() {
        let ctx = ctx_for(&["stars_db", "luminosity"]);
        assert_eq!(ctx.database.as_deref(), Some("stars_db"));
        assert_eq!(ctx.table.as_deref(), Some("stars"));
    }

    #[test]
    fn database_plus_foreign_column_leaves_table_unresolved() {
        let ctx = ctx_for(&["stars_db", "nationality"]);
        assert_eq!(ctx.database.as_deref(), Some("stars_db"));
        assert!(ctx.table.is_none());
    }

    #[test]
    fn repeated_column_mentions_are_retained() {
        let ctx = ctx_for(&["nationality", "usa", "nationality"]);
        assert_eq!(ctx.columns, vec!["nationality", "nationality"]);
        assert_eq!(ctx.table.as_deref(), Some("personal_info"));
    }
}
