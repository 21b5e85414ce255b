//! Schema catalog ingestion and derived lookup structures.

pub mod catalog;
pub mod map;

pub use catalog::{DatabaseDef, SchemaCatalog, TableDef};
pub use map::{normalize_lookup, SchemaMap, SchemaMapHandle, SchemaObject};
