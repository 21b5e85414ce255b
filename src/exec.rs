//! Execution and fallback collaborator seams.
//!
//! The compiler itself never opens connections or manages transactions;
//! callers supply an implementor of [`QueryExecutor`] to run plans and
//! may supply a [`ConversationalFallback`] to triage requests that
//! matched no schema vocabulary at all.

use crate::pipeline::intent::Intent;
use crate::sql::QueryPlan;

/// Result of executing a plan against the target database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Row set for read statements.
    Rows(Vec<Vec<String>>),
    /// Affected-row count for write statements.
    Affected(u64),
}

/// Runs compiled plans. Errors are relayed verbatim as strings; the
/// compiler neither retries nor interprets them.
pub trait QueryExecutor {
    fn execute(&self, plan: &QueryPlan) -> Result<ExecutionOutcome, String>;
}

/// Optional classifier of last resort, consulted at most once per
/// request and only when no schema entity was recognized. Implementors
/// are expected to enforce their own timeout.
pub trait ConversationalFallback {
    /// Returns the single intent the request most plausibly carries, or
    /// `None` when the text is not a database request at all.
    fn classify(&self, raw_text: &str, vocabulary: &[Intent]) -> Option<Intent>;
}
