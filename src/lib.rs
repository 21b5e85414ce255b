//! ConversQL - natural-language request compilation for SQL databases.
//!
//! This crate turns free-form English requests into guarded SQL plans
//! over a known schema catalog, following a single fixed pipeline:
//! Normalize -> Tokenize -> Classify -> Extract -> Resolve -> Build -> Gate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use conversql::pipeline::{CompilerConfig, QueryCompiler};
//! use conversql::rbac::RolePolicy;
//! use conversql::schema::{SchemaCatalog, SchemaMap};
//!
//! let catalog = SchemaCatalog::from_path("plugin_schema.json").unwrap();
//! let schema = Arc::new(SchemaMap::build(&catalog));
//! let compiler = QueryCompiler::new(schema, RolePolicy::default(), CompilerConfig::default());
//! let outcome = compiler.compile("show all astronauts from astronauts_db", "missions");
//! println!("{}", outcome.plan.sql);
//! ```

// Core error handling
pub mod error;

// Schema catalog ingestion and the derived lookup map
pub mod schema;

// The request-compilation pipeline stages
pub mod pipeline;

// Statement construction, one builder per operation class
pub mod sql;

// Role-based access control over compiled plans
pub mod rbac;

// Audit trail emission
pub mod audit;

// Execution and fallback collaborator seams
pub mod exec;

pub use error::{CatalogError, ConversqlError, ResolveError};
pub use pipeline::{CompileOutcome, CompilerConfig, QueryCompiler};
pub use rbac::{AccessDecision, RolePolicy};
pub use schema::{SchemaCatalog, SchemaMap, SchemaMapHandle};
pub use sql::QueryPlan;
