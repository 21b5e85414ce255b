//! Schema catalog snapshot — the external introspection job's output.
//!
//! The catalog is produced by walking a live server (`SHOW TABLES` /
//! `DESCRIBE` per database) and serialized as JSON. This crate only reads
//! it; the shape is the contract with the introspection job:
//!
//! ```json
//! {"databases": [{"name": "stars_db", "tables": [{"name": "stars",
//!   "columns": ["star name", "distance", "mass", "luminosity"]}]}]}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Read-only snapshot of every served database schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaCatalog {
    pub databases: Vec<DatabaseDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseDef {
    pub name: String,
    pub tables: Vec<TableDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<String>,
}

impl SchemaCatalog {
    /// Parse a catalog from its JSON form, rejecting empty snapshots.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: SchemaCatalog = serde_json::from_str(json)?;
        if catalog.databases.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(catalog)
    }

    /// Load a catalog snapshot from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Serialize back to the on-disk form. The introspection job writes the
    /// same shape, so round-trips are byte-stable modulo key order.
    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn database(&self, name: &str) -> Option<&DatabaseDef> {
        self.databases
            .iter()
            .find(|db| db.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "databases": [
            {"name": "stars_db", "tables": [
                {"name": "stars", "columns": ["star name", "distance", "mass", "luminosity"]}
            ]}
        ]
    }"#;

    #[test]
    fn parses_sample_catalog() {
        let catalog = SchemaCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.databases.len(), 1);
        assert_eq!(catalog.databases[0].tables[0].columns.len(), 4);
    }

    #[test]
    fn rejects_empty_catalog() {
        let err = SchemaCatalog::from_json(r#"{"databases": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn database_lookup_is_case_insensitive() {
        let catalog = SchemaCatalog::from_json(SAMPLE).unwrap();
        assert!(catalog.database("STARS_DB").is_some());
        assert!(catalog.database("nope_db").is_none());
    }

    #[test]
    fn round_trips_through_json() {
        let catalog = SchemaCatalog::from_json(SAMPLE).unwrap();
        let json = catalog.to_json_pretty().unwrap();
        let again = SchemaCatalog::from_json(&json).unwrap();
        assert_eq!(again.databases[0].name, "stars_db");
        assert_eq!(again.databases[0].tables[0].name, "stars");
    }
}
