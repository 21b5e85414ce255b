//! DELETE builder.

use crate::pipeline::values::ValueLiteral;

use super::context::ResolvedContext;
use super::literal::{format_literal, qualified_table, quote_ident};
use super::{LinkedOperator, QueryPlan};

/// Build a DELETE. Without any predicate the statement deletes every
/// row; it is emitted anyway, annotated inline and flagged in the plan's
/// warnings, leaving the refusal decision to the caller.
pub fn build(
    ctx: &ResolvedContext,
    operators: &[LinkedOperator],
    values: &[ValueLiteral],
) -> QueryPlan {
    let (Some(db), Some(table)) = (&ctx.database, &ctx.table) else {
        return QueryPlan::error(format!(
            "DELETE requires both database and table, found db={:?}, table={:?}",
            ctx.database, ctx.table
        ));
    };
    let full_table = qualified_table(db, table);

    if operators.is_empty() || values.is_empty() {
        let mut plan = QueryPlan::ok(
            format!("DELETE FROM {full_table}; -- WARNING: This will delete ALL rows!"),
            Some(db.clone()),
        );
        plan.warnings
            .push("DELETE has no predicate and will remove every row".to_string());
        return plan;
    }

    let mut predicates = Vec::new();
    for (i, value) in values.iter().enumerate() {
        let Some(op) = operators.get(i) else {
            break;
        };
        // Unlike SELECT, an unlinked operator here falls back to the
        // last mentioned column before giving up to `id`.
        let column = op
            .column
            .as_deref()
            .or_else(|| ctx.columns.get(i).map(String::as_str))
            .or_else(|| ctx.columns.last().map(String::as_str))
            .unwrap_or("id");
        predicates.push(format!(
            "{} {} {}",
            quote_ident(column),
            op.symbol.as_sql(),
            format_literal(value)
        ));
    }

    // The early return above guarantees at least one predicate here.
    QueryPlan::ok(
        format!("DELETE FROM {full_table} WHERE {};", predicates.join(" AND ")),
        Some(db.clone()),
    )
}
