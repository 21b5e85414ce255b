//! Audit trail emission.
//!
//! The compiler reports every request to an [`AuditSink`]; persistence
//! is the sink's concern. Write and DDL outcomes are flagged so sinks
//! can log them at elevated priority.

use serde::Serialize;
use tracing::{info, warn};

use crate::pipeline::intent::{Intent, IntentSet};

/// Broad classification of a request for the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Read,
    Write,
}

impl ActionCategory {
    pub fn from_intents(intents: &IntentSet) -> Self {
        if intents.iter().any(Intent::is_destructive) {
            ActionCategory::Write
        } else {
            ActionCategory::Read
        }
    }
}

/// How the request ended, from the audit trail's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Compiled,
    Denied { reason: String },
    ResolutionFailed,
}

/// One audit record per compiled request.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub caller: String,
    pub role: String,
    pub raw_text: String,
    pub resolved_database: Option<String>,
    pub action_category: ActionCategory,
    pub generated_sql: String,
    pub outcome: AuditOutcome,
}

impl AuditRecord {
    /// Write and DDL records warrant elevated-priority handling.
    pub fn elevated(&self) -> bool {
        self.action_category == ActionCategory::Write
    }
}

/// Persistence seam for audit records.
pub trait AuditSink {
    fn record(&self, record: &AuditRecord);
}

/// Sink that forwards records to the process log, writes at `warn`.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: &AuditRecord) {
        if record.elevated() {
            warn!(
                caller = %record.caller,
                role = %record.role,
                database = ?record.resolved_database,
                sql = %record.generated_sql,
                outcome = ?record.outcome,
                "write operation audited"
            );
        } else {
            info!(
                caller = %record.caller,
                role = %record.role,
                database = ?record.resolved_database,
                outcome = ?record.outcome,
                "request audited"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_intents_categorize_as_write() {
        let intents: IntentSet = [Intent::SelectRows, Intent::DeleteRows]
            .into_iter()
            .collect();
        assert_eq!(ActionCategory::from_intents(&intents), ActionCategory::Write);
    }

    #[test]
    fn read_intents_categorize_as_read() {
        let intents: IntentSet = [Intent::CountRows, Intent::OrderBy].into_iter().collect();
        assert_eq!(ActionCategory::from_intents(&intents), ActionCategory::Read);
    }

    #[test]
    fn write_records_are_elevated() {
        let record = AuditRecord {
            caller: "hb".to_string(),
            role: "admin".to_string(),
            raw_text: "drop table stars".to_string(),
            resolved_database: Some("stars_db".to_string()),
            action_category: ActionCategory::Write,
            generated_sql: "DROP TABLE IF EXISTS `stars_db`.`stars`;".to_string(),
            outcome: AuditOutcome::Compiled,
        };
        assert!(record.elevated());
    }
}
