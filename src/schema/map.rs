//! Derived lookup structures over a schema catalog.
//!
//! The `SchemaMap` is built once per catalog refresh and handed to the
//! pipeline as an immutable snapshot. It carries four lookups
//! (database→tables, table→database, table→columns, column→(database, table)),
//! the flattened phrase vocabulary for the tokenizer, and a normalized-form
//! index for entity matching. Keys are lower-cased; stored names keep the
//! catalog's original casing.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

use crate::schema::catalog::SchemaCatalog;

/// Kind of schema object a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaObject {
    Database,
    Table,
    Column,
}

/// Immutable lookup structure over one catalog snapshot.
#[derive(Debug, Default)]
pub struct SchemaMap {
    db_to_tables: BTreeMap<String, Vec<String>>,
    table_to_db: BTreeMap<String, String>,
    table_to_columns: BTreeMap<String, Vec<String>>,
    column_to_table_db: BTreeMap<String, (String, String)>,
    /// lower-cased name -> catalog-cased name, for databases and tables
    db_names: BTreeMap<String, String>,
    table_names: BTreeMap<String, String>,
    /// normalized form -> original-cased name
    normalized_index: BTreeMap<String, String>,
    /// lower-cased names, used for longest-match phrase combination
    vocabulary: BTreeSet<String>,
}

/// Normalize a name for lookup: lower-case and strip whitespace,
/// underscores, and common punctuation.
pub fn normalize_lookup(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '_' | '(' | ')' | '.' | '-' | ',' | '/'))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

impl SchemaMap {
    /// Build the full lookup set from a catalog snapshot.
    pub fn build(catalog: &SchemaCatalog) -> Self {
        let mut map = SchemaMap::default();
        for db in &catalog.databases {
            let db_key = db.name.to_lowercase();
            map.db_names.insert(db_key.clone(), db.name.clone());
            map.vocabulary.insert(db_key.clone());
            map.normalized_index
                .insert(normalize_lookup(&db.name), db.name.clone());
            let tables = map.db_to_tables.entry(db_key).or_default();

            for table in &db.tables {
                tables.push(table.name.clone());
                let table_key = table.name.to_lowercase();
                map.table_names.insert(table_key.clone(), table.name.clone());
                map.vocabulary.insert(table_key.clone());
                map.normalized_index
                    .insert(normalize_lookup(&table.name), table.name.clone());
                map.table_to_db.insert(table_key.clone(), db.name.clone());
                map.table_to_columns
                    .insert(table_key, table.columns.clone());

                for col in &table.columns {
                    map.vocabulary.insert(col.to_lowercase());
                    map.normalized_index
                        .insert(normalize_lookup(col), col.clone());
                    map.column_to_table_db
                        .insert(col.to_lowercase(), (db.name.clone(), table.name.clone()));
                }
            }
        }
        map
    }

    pub fn is_database(&self, name: &str) -> bool {
        self.db_to_tables.contains_key(&name.to_lowercase())
    }

    pub fn is_table(&self, name: &str) -> bool {
        self.table_to_db.contains_key(&name.to_lowercase())
    }

    pub fn is_column(&self, name: &str) -> bool {
        self.column_to_table_db.contains_key(&name.to_lowercase())
    }

    /// Classify an original-cased name against the map hierarchy.
    /// Databases shadow tables, tables shadow columns, matching the lookup
    /// order used when the name was recognized.
    pub fn classify(&self, name: &str) -> Option<SchemaObject> {
        if self.is_database(name) {
            Some(SchemaObject::Database)
        } else if self.is_table(name) {
            Some(SchemaObject::Table)
        } else if self.is_column(name) {
            Some(SchemaObject::Column)
        } else {
            None
        }
    }

    /// Case-insensitive database name resolution to the catalog's casing.
    pub fn database_name(&self, name: &str) -> Option<&str> {
        self.db_names.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    pub fn tables_of(&self, database: &str) -> Option<&[String]> {
        self.db_to_tables
            .get(&database.to_lowercase())
            .map(|v| v.as_slice())
    }

    pub fn database_of_table(&self, table: &str) -> Option<&str> {
        self.table_to_db
            .get(&table.to_lowercase())
            .map(|s| s.as_str())
    }

    /// Catalog-cased table name for a case-insensitive lookup.
    pub fn table_name(&self, name: &str) -> Option<&str> {
        self.table_names.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    pub fn columns_of(&self, table: &str) -> Option<&[String]> {
        self.table_to_columns
            .get(&table.to_lowercase())
            .map(|v| v.as_slice())
    }

    pub fn home_of_column(&self, column: &str) -> Option<(&str, &str)> {
        self.column_to_table_db
            .get(&column.to_lowercase())
            .map(|(db, table)| (db.as_str(), table.as_str()))
    }

    /// All column mappings, for inference passes that scan every column.
    pub fn iter_column_homes(&self) -> impl Iterator<Item = (&str, (&str, &str))> {
        self.column_to_table_db
            .iter()
            .map(|(k, (db, t))| (k.as_str(), (db.as_str(), t.as_str())))
    }

    /// Direct lookup of a normalized token against the vocabulary, yielding
    /// the original-cased schema name.
    pub fn resolve_normalized(&self, normalized: &str) -> Option<&str> {
        self.normalized_index.get(normalized).map(|s| s.as_str())
    }

    /// Iterate original-cased vocabulary terms for fuzzy matching.
    pub fn iter_terms(&self) -> impl Iterator<Item = &str> {
        self.normalized_index.values().map(|s| s.as_str())
    }

    pub fn contains_phrase(&self, phrase: &str) -> bool {
        self.vocabulary.contains(phrase)
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn database_names(&self) -> impl Iterator<Item = &str> {
        self.db_to_tables.keys().map(|s| s.as_str())
    }
}

/// Shared handle over the current schema map snapshot.
///
/// Rebuilds are full-replace: the new map is completely constructed, then
/// the inner `Arc` is swapped. In-flight requests keep the snapshot they
/// started with and never observe a partial map.
#[derive(Clone)]
pub struct SchemaMapHandle {
    inner: Arc<RwLock<Arc<SchemaMap>>>,
}

impl SchemaMapHandle {
    pub fn new(catalog: &SchemaCatalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(SchemaMap::build(catalog)))),
        }
    }

    /// Snapshot for the lifetime of one request.
    pub fn snapshot(&self) -> Arc<SchemaMap> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the map after a catalog refresh. Never mutates in place.
    pub fn replace(&self, catalog: &SchemaCatalog) {
        let rebuilt = Arc::new(SchemaMap::build(catalog));
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = rebuilt;
    }
}
