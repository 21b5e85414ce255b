//! SELECT builder, also serving the listing and aggregate intents.

use crate::pipeline::intent::{Intent, IntentSet};
use crate::pipeline::values::ValueLiteral;

use super::context::ResolvedContext;
use super::literal::{format_literal, qualified_table, quote_ident};
use super::{LinkedOperator, QueryPlan};

/// Build a read statement. A bare database becomes a table listing; no
/// resolved context at all becomes a database listing.
pub fn build(
    intents: &IntentSet,
    ctx: &ResolvedContext,
    operators: &[LinkedOperator],
    values: &[ValueLiteral],
) -> QueryPlan {
    if let (Some(db), None) = (&ctx.database, &ctx.table) {
        return QueryPlan::ok(
            format!("SHOW TABLES FROM {};", quote_ident(db)),
            Some(db.clone()),
        );
    }

    if ctx.database.is_none() && ctx.table.is_none() && ctx.columns.is_empty() {
        return QueryPlan::ok("SHOW DATABASES;".to_string(), None);
    }

    let (Some(db), Some(table)) = (&ctx.database, &ctx.table) else {
        return QueryPlan::error("could not resolve database and table context");
    };

    let select_clause = select_clause(intents, &ctx.columns);
    let where_clause = where_clause(&ctx.columns, operators, values);
    QueryPlan::ok(
        format!(
            "SELECT {} FROM {}{};",
            select_clause,
            qualified_table(db, table),
            where_clause
        ),
        Some(db.clone()),
    )
}

fn select_clause(intents: &IntentSet, columns: &[String]) -> String {
    if intents.contains(&Intent::CountRows) {
        return "COUNT(*)".to_string();
    }
    if let Some(first) = columns.first() {
        let agg = [
            (Intent::AggregateAvg, "AVG"),
            (Intent::AggregateSum, "SUM"),
            (Intent::AggregateMin, "MIN"),
            (Intent::AggregateMax, "MAX"),
        ]
        .iter()
        .find(|(intent, _)| intents.contains(intent));
        if let Some((_, func)) = agg {
            return format!("{}({})", func, quote_ident(first));
        }
        return columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
    }
    "*".to_string()
}

/// Pair each value with the operator at the same index. The filter
/// column comes from the operator link, falling back to the column at
/// the same index, then the first column, then `id`.
fn where_clause(
    columns: &[String],
    operators: &[LinkedOperator],
    values: &[ValueLiteral],
) -> String {
    if operators.is_empty() || values.is_empty() {
        return String::new();
    }

    let mut predicates = Vec::new();
    for (i, value) in values.iter().enumerate() {
        let Some(op) = operators.get(i) else {
            break;
        };
        let column = op
            .column
            .as_deref()
            .or_else(|| columns.get(i).map(String::as_str))
            .or_else(|| columns.first().map(String::as_str))
            .unwrap_or("id");
        predicates.push(format!(
            "{} {} {}",
            quote_ident(column),
            op.symbol.as_sql(),
            format_literal(value)
        ));
    }

    if predicates.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", predicates.join(" AND "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::operators::OperatorSymbol;
    use crate::pipeline::values::ValueKind;

    fn ctx(db: Option<&str>, table: Option<&str>, columns: &[&str]) -> ResolvedContext {
        ResolvedContext {
            database: db.map(str::to_string),
            table: table.map(str::to_string),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            notes: Vec::new(),
        }
    }

    fn intents(list: &[Intent]) -> IntentSet {
        list.iter().copied().collect()
    }

    fn op(column: Option<&str>, symbol: OperatorSymbol) -> LinkedOperator {
        LinkedOperator {
            column: column.map(str::to_string),
            symbol,
            raw: symbol.as_sql().to_string(),
        }
    }

    #[test]
    fn bare_database_lists_tables() {
        let plan = build(
            &intents(&[Intent::SelectRows]),
            &ctx(Some("asteroids_db"), None, &[]),
            &[],
            &[],
        );
        assert_eq!(plan.sql, "SHOW TABLES FROM `asteroids_db`;");
        assert_eq!(plan.target_database.as_deref(), Some("asteroids_db"));
    }

    #[test]
    fn empty_context_lists_databases() {
        let plan = build(
            &intents(&[Intent::SelectRows]),
            &ctx(None, None, &[]),
            &[],
            &[],
        );
        assert_eq!(plan.sql, "SHOW DATABASES;");
        assert_eq!(plan.target_database, None);
    }

    #[test]
    fn unresolved_with_columns_is_an_error_plan() {
        let plan = build(
            &intents(&[Intent::SelectRows]),
            &ctx(None, None, &["mystery"]),
            &[],
            &[],
        );
        assert!(plan.is_error());
        assert_eq!(plan.target_database, None);
    }

    #[test]
    fn count_ignores_column_list() {
        let plan = build(
            &intents(&[Intent::CountRows, Intent::SelectRows]),
            &ctx(Some("stars_db"), Some("stars"), &["luminosity"]),
            &[],
            &[],
        );
        assert_eq!(plan.sql, "SELECT COUNT(*) FROM `stars_db`.`stars`;");
    }

    #[test]
    fn aggregate_applies_to_first_column() {
        let plan = build(
            &intents(&[Intent::AggregateAvg]),
            &ctx(Some("stars_db"), Some("stars"), &["luminosity", "mass"]),
            &[],
            &[],
        );
        assert_eq!(plan.sql, "SELECT AVG(`luminosity`) FROM `stars_db`.`stars`;");
    }

    #[test]
    fn filter_uses_linked_column_and_typed_literal() {
        let plan = build(
            &intents(&[Intent::SelectRows]),
            &ctx(
                Some("astronauts_db"),
                Some("personal_info"),
                &["nationality"],
            ),
            &[op(Some("nationality"), OperatorSymbol::Eq)],
            &[ValueLiteral::new(ValueKind::String, "USA", (0, 3))],
        );
        assert_eq!(
            plan.sql,
            "SELECT `nationality` FROM `astronauts_db`.`personal_info` WHERE `nationality` = 'USA';"
        );
    }

    #[test]
    fn unlinked_operator_falls_back_to_id() {
        let plan = build(
            &intents(&[Intent::SelectRows]),
            &ctx(Some("stars_db"), Some("stars"), &[]),
            &[op(None, OperatorSymbol::Gt)],
            &[ValueLiteral::new(ValueKind::Integer, "5", (0, 1))],
        );
        assert!(plan.sql.ends_with("WHERE `id` > 5;"));
    }

    #[test]
    fn multiple_predicates_join_with_and() {
        let plan = build(
            &intents(&[Intent::SelectRows]),
            &ctx(Some("stars_db"), Some("stars"), &["mass", "luminosity"]),
            &[op(None, OperatorSymbol::Gt), op(None, OperatorSymbol::Lt)],
            &[
                ValueLiteral::new(ValueKind::Integer, "2", (0, 1)),
                ValueLiteral::new(ValueKind::Float, "9.5", (2, 5)),
            ],
        );
        assert!(plan.sql.contains("WHERE `mass` > 2 AND `luminosity` < 9.5"));
    }
}
