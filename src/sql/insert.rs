//! INSERT builder.

use crate::pipeline::values::ValueLiteral;

use super::context::ResolvedContext;
use super::literal::{format_literal, qualified_table, quote_ident};
use super::QueryPlan;

/// Build an INSERT. Columns and values pair positionally up to the
/// shorter length; with values but no columns the statement is
/// positional. With no values at all a placeholder statement is emitted
/// so the caller can show the user what is missing.
pub fn build(ctx: &ResolvedContext, values: &[ValueLiteral]) -> QueryPlan {
    let (Some(db), Some(table)) = (&ctx.database, &ctx.table) else {
        return QueryPlan::error(format!(
            "INSERT requires both database and table, found db={:?}, table={:?}",
            ctx.database, ctx.table
        ));
    };
    let full_table = qualified_table(db, table);

    if values.is_empty() {
        return QueryPlan::ok(
            format!("INSERT INTO {full_table} VALUES (/* specify values */);"),
            Some(db.clone()),
        );
    }

    let sql = if ctx.columns.is_empty() {
        let rendered: Vec<String> = values.iter().map(format_literal).collect();
        format!("INSERT INTO {full_table} VALUES ({});", rendered.join(", "))
    } else {
        let pairs = ctx.columns.len().min(values.len());
        let column_list: Vec<String> = ctx.columns[..pairs]
            .iter()
            .map(|c| quote_ident(c))
            .collect();
        let value_list: Vec<String> = values[..pairs].iter().map(format_literal).collect();
        format!(
            "INSERT INTO {full_table} ({}) VALUES ({});",
            column_list.join(", "),
            value_list.join(", ")
        )
    };
    QueryPlan::ok(sql, Some(db.clone()))
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

    #[test]
    fn columns_and_values_pair_positionally() {
        let plan = build(
            &ctx(&["nationality", "year_of_birth"]),
            &[
                string_value("USA"),
                ValueLiteral::new(ValueKind::Integer, "1968", (0, 4)),
            ],
        );
        assert_eq!(
            plan.sql,
            "INSERT INTO `astronauts_db`.`personal_info` (`nationality`, `year_of_birth`) VALUES ('USA', 1968);"
        );
    }

    #[test]
    fn extra_values_are_truncated_to_column_count() {
        let plan = build(
            &ctx(&["nationality"]),
            &[string_value("USA"), string_value("overflow")],
        );
        assert!(plan.sql.contains("(`nationality`) VALUES ('USA');"));
    }

    #[test]
    fn values_without_columns_insert_positionally() {
        let plan = build(&ctx(&[]), &[string_value("USA")]);
        assert_eq!(
            plan.sql,
            "INSERT INTO `astronauts_db`.`personal_info` VALUES ('USA');"
        );
    }

    #[test]
    fn no_values_emits_placeholder() {
        let plan = build(&ctx(&["nationality"]), &[]);
        assert!(plan.sql.contains("/* specify values */"));
        assert_eq!(plan.target_database.as_deref(), Some("astronauts_db"));
    }

    #[test]
    fn missing_table_is_an_error_plan() {
        let ctx = ResolvedContext {
            database: Some("astronauts_db".to_string()),
            table: None,
            columns: Vec::new(),
            notes: Vec::new(),
        };
        let plan = build(&ctx, &[]);
        assert!(plan.is_error());
        assert_eq!(plan.target_database, None);
    }
}
