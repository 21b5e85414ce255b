//! UPDATE builder.
//!
//! Positional convention inherited from the request shape: all values
//! but the last become SET assignments, the last value together with the
//! last column becomes the WHERE condition. A single value updates every
//! row; that plan carries an explicit warning rather than being refused.

use crate::pipeline::operators::OperatorSymbol;
use crate::pipeline::values::ValueLiteral;

use super::context::ResolvedContext;
use super::literal::{format_literal, qualified_table, quote_ident};
use super::{LinkedOperator, QueryPlan};

pub fn build(
    ctx: &ResolvedContext,
    operators: &[LinkedOperator],
    values: &[ValueLiteral],
) -> QueryPlan {
    let (Some(db), Some(table)) = (&ctx.database, &ctx.table) else {
        return QueryPlan::error(format!(
            "UPDATE requires both database and table, found db={:?}, table={:?}",
            ctx.database, ctx.table
        ));
    };
    if ctx.columns.is_empty() || values.is_empty() {
        return QueryPlan::error("UPDATE requires columns and values to set");
    }

    let (set_values, where_pair) = if values.len() == 1 {
        (&values[..1], None)
    } else {
        let set_values = &values[..values.len() - 1];
        let where_value = &values[values.len() - 1];
        // The trailing column names the WHERE target only when there are
        // more columns than assignments; otherwise fall back to `id`.
        let where_column = if ctx.columns.len() > set_values.len() {
            ctx.columns[ctx.columns.len() - 1].as_str()
        } else {
            "id"
        };
        (set_values, Some((where_column, where_value)))
    };

    let set_columns = &ctx.columns[..ctx.columns.len().min(set_values.len())];
    let assignments: Vec<String> = set_columns
        .iter()
        .zip(set_values)
        .map(|(col, val)| format!("{} = {}", quote_ident(col), format_literal(val)))
        .collect();
    if assignments.is_empty() {
        return QueryPlan::error("no SET assignments could be built");
    }

    let where_clause = match where_pair {
        Some((column, value)) => {
            let symbol = operators
                .first()
                .map(|op| op.symbol)
                .unwrap_or(OperatorSymbol::Eq);
            format!(
                " WHERE {} {} {}",
                quote_ident(column),
                symbol.as_sql(),
                format_literal(value)
            )
        }
        None => String::new(),
    };

    let mut plan = QueryPlan::ok(
        format!(
            "UPDATE {} SET {}{};",
            qualified_table(db, table),
            assignments.join(", "),
            where_clause
        ),
        Some(db.clone()),
    );
    if where_clause.is_empty() {
        plan.warnings
            .push("UPDATE has no WHERE clause and will modify every row".to_string());
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::values::ValueKind;

    fn ctx(columns: &[&str]) -> ResolvedContext {
        ResolvedContext {
            database: Some("astronauts_db".to_string()),
            table: Some("personal_info".to_string()),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            notes: Vec::new(),
        }
    }

    fn string_value(v: &str) -> ValueLiteral {
        ValueLiteral::new(ValueKind::String, v, (0, v.len()))
    }

    fn int_value(v: &str) -> ValueLiteral {
        ValueLiteral::new(ValueKind::Integer, v, (0, v.len()))
    }

    #[test]
    fn last_value_and_column_become_the_where_condition() {
        let plan = build(
            &ctx(&["nationality", "year_of_birth"]),
            &[],
            &[string_value("Canada"), int_value("1968")],
        );
        assert_eq!(
            plan.sql,
            "UPDATE `astronauts_db`.`personal_info` SET `nationality` = 'Canada' WHERE `year_of_birth` = 1968;"
        );
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn single_value_updates_every_row_with_a_warning() {
        let plan = build(&ctx(&["nationality"]), &[], &[string_value("Canada")]);
        assert_eq!(
            plan.sql,
            "UPDATE `astronauts_db`.`personal_info` SET `nationality` = 'Canada';"
        );
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn recognized_operator_replaces_default_equals() {
        let op = LinkedOperator {
            column: None,
            symbol: OperatorSymbol::Gt,
            raw: ">".to_string(),
        };
        let plan = build(
            &ctx(&["nationality", "year_of_birth"]),
            &[op],
            &[string_value("Canada"), int_value("1950")],
        );
        assert!(plan.sql.contains("WHERE `year_of_birth` > 1950"));
    }

    #[test]
    fn as_many_columns_as_values_falls_back_to_id() {
        let plan = build(
            &ctx(&["nationality"]),
            &[],
            &[string_value("Canada"), int_value("7")],
        );
        assert!(plan.sql.contains("WHERE `id` = 7"));
    }

    #[test]
    fn missing_columns_is_an_error_plan() {
        let plan = build(&ctx(&[]), &[], &[string_value("Canada")]);
        assert!(plan.is_error());
    }
}
