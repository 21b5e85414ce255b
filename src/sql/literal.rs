//! SQL rendering of identifiers and typed literals.

use crate::pipeline::values::{ValueKind, ValueLiteral};

/// Backtick-quote an identifier. Embedded backticks are stripped rather
/// than escaped, since no catalog name legitimately contains one.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', ""))
}

/// Qualified `db`.`table` form.
pub fn qualified_table(database: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(database), quote_ident(table))
}

/// Render a literal for inclusion in a statement. Strings and dates are
/// single-quoted with embedded quotes doubled; numerics pass through
/// bare; booleans become the SQL keywords.
pub fn format_literal(value: &ValueLiteral) -> String {
    match value.kind {
        ValueKind::Float | ValueKind::Integer => value.value.clone(),
        ValueKind::Boolean => {
            if value.value.eq_ignore_ascii_case("true") {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        ValueKind::String | ValueKind::Date => {
            format!("'{}'", value.value.replace('\'', "''"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(kind: ValueKind, v: &str) -> ValueLiteral {
        ValueLiteral::new(kind, v, (0, v.len()))
    }

    #[test]
    fn identifiers_are_backticked() {
        assert_eq!(quote_ident("personal_info"), "`personal_info`");
        assert_eq!(qualified_table("stars_db", "stars"), "`stars_db`.`stars`");
    }

    #[test]
    fn embedded_backticks_are_stripped() {
        assert_eq!(quote_ident("bad`name"), "`badname`");
    }

    #[test]
    fn strings_double_embedded_quotes() {
        assert_eq!(
            format_literal(&lit(ValueKind::String, "O'Neill")),
            "'O''Neill'"
        );
    }

    #[test]
    fn numerics_render_bare_and_booleans_as_keywords() {
        assert_eq!(format_literal(&lit(ValueKind::Integer, "42")), "42");
        assert_eq!(format_literal(&lit(ValueKind::Float, "3.5")), "3.5");
        assert_eq!(format_literal(&lit(ValueKind::Boolean, "True")), "TRUE");
    }

    #[test]
    fn dates_are_quoted() {
        assert_eq!(
            format_literal(&lit(ValueKind::Date, "2020-01-15")),
            "'2020-01-15'"
        );
    }
}
