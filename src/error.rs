//! Error types for the request-compilation pipeline.
//!
//! Malformed user input never surfaces as an error here: recognizers degrade
//! to named fallbacks and builders emit error-string plans. These types cover
//! the boundaries that can genuinely fail — catalog ingestion and target
//! resolution for operations that demand one.

use thiserror::Error;

/// Top-level error for the crate.
#[derive(Error, Debug)]
pub enum ConversqlError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),
}

/// Failures while loading or parsing a schema catalog snapshot.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog contains no databases")]
    Empty,
}

/// Failures in schema context resolution that are hard errors rather than
/// degradable plan outcomes.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A destructive operation reached the access gate without a resolved
    /// target database. This is a resolution failure, never an
    /// authorization question.
    #[error("destructive operation '{operation}' has no resolved target database")]
    UnresolvedDestructiveTarget { operation: String },
}
