//! SQL statement construction.
//!
//! One builder per write/DDL category plus a default SELECT builder.
//! Dispatch order matters: INSERT, UPDATE and DELETE claim their intents
//! before the DROP family, and anything left falls through to SELECT.

pub mod context;
pub mod delete;
pub mod drop;
pub mod insert;
pub mod literal;
pub mod select;
pub mod update;

use serde::Serialize;
use tracing::debug;

use crate::pipeline::entities::{Entity, EntityKind};
use crate::pipeline::intent::{Intent, IntentSet};
use crate::pipeline::operators::{OperatorHit, OperatorSymbol};
use crate::pipeline::values::ValueLiteral;
use crate::schema::SchemaMap;

pub use context::{resolve_schema_context, ResolvedContext};

/// The compiled statement plus its execution target. A plan whose
/// `target_database` is `None` must never be executed; its `sql` then
/// carries an `ERROR:` diagnostic rather than a statement.
#[derive(Debug, Clone, Serialize)]
pub struct QueryPlan {
    pub sql: String,
    pub target_database: Option<String>,
    /// Safety flags for the caller, e.g. a predicate-less DELETE.
    pub warnings: Vec<String>,
}

impl QueryPlan {
    fn ok(sql: String, target_database: Option<String>) -> Self {
        QueryPlan {
            sql,
            target_database,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        QueryPlan {
            sql: format!("ERROR: {}", message.into()),
            target_database: None,
            warnings: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.sql.starts_with("ERROR:")
    }
}

/// An operator resolved to the column it filters on, when one could be
/// determined from the surrounding entities.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedOperator {
    pub column: Option<String>,
    pub symbol: OperatorSymbol,
    pub raw: String,
}

/// Attach a filter column to each recognized operator.
///
/// With a single mentioned column, every operator filters on it. With
/// several columns under an aggregate intent, the aggregation target is
/// the first column, so the filter column is the first one that is not
/// the aggregation target.
pub fn link_operators(
    hits: &[OperatorHit],
    entities: &[Entity],
    intents: &IntentSet,
) -> Vec<LinkedOperator> {
    let columns: Vec<&str> = entities
        .iter()
        .filter(|e| e.kind == EntityKind::Column)
        .filter_map(|e| e.value.as_deref())
        .collect();

    let agg_column = if intents.iter().any(Intent::is_aggregate) {
        columns.first().copied()
    } else {
        None
    };

    let filter_col: Option<&str> = match (columns.as_slice(), agg_column) {
        ([], _) => None,
        ([only], _) => Some(only),
        (many, Some(agg)) => many.iter().find(|c| **c != agg).copied().or(Some(many[0])),
        (many, None) => Some(many[0]),
    };

    hits.iter()
        .map(|hit| LinkedOperator {
            column: filter_col.map(str::to_string),
            symbol: hit.symbol,
            raw: hit.raw.clone(),
        })
        .collect()
}

/// Route to the builder matching the intent set and produce the plan.
pub fn build_query(
    intents: &IntentSet,
    entities: &[Entity],
    operators: &[LinkedOperator],
    values: &[ValueLiteral],
    schema: &SchemaMap,
) -> QueryPlan {
    let ctx = resolve_schema_context(entities, schema);
    debug!(
        database = ?ctx.database,
        table = ?ctx.table,
        columns = ?ctx.columns,
        "schema context resolved"
    );

    if intents.contains(&Intent::InsertRows) {
        insert::build(&ctx, values)
    } else if intents.contains(&Intent::UpdateRows) {
        update::build(&ctx, operators, values)
    } else if intents.contains(&Intent::DeleteRows) {
        delete::build(&ctx, operators, values)
    } else if intents.contains(&Intent::DropTable)
        || intents.contains(&Intent::DropDatabase)
        || intents.contains(&Intent::TruncateTable)
    {
        drop::build(intents, &ctx)
    } else {
        select::build(intents, &ctx, operators, values)
    }
}
