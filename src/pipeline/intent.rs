//! Intent classification over the final token stream.
//!
//! An ordered rule table of phrase patterns, more specific phrases first,
//! maps the space-joined token stream to a set of operation tags. Every
//! matching rule contributes its tag; an empty result degrades to
//! `SELECT_ROWS` rather than erroring.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Operation tag implied by a request. A request may carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Intent {
    CountRows,
    AggregateSum,
    AggregateAvg,
    AggregateMin,
    AggregateMax,
    OrderBy,
    Limit,
    SelectRows,
    Description,
    InsertRows,
    UpdateRows,
    DeleteRows,
    DropTable,
    DropDatabase,
    TruncateTable,
}

impl Intent {
    pub fn tag(&self) -> &'static str {
        match self {
            Intent::CountRows => "COUNT_ROWS",
            Intent::AggregateSum => "AGGREGATE_SUM",
            Intent::AggregateAvg => "AGGREGATE_AVG",
            Intent::AggregateMin => "AGGREGATE_MIN",
            Intent::AggregateMax => "AGGREGATE_MAX",
            Intent::OrderBy => "ORDER_BY",
            Intent::Limit => "LIMIT",
            Intent::SelectRows => "SELECT_ROWS",
            Intent::Description => "DESCRIPTION",
            Intent::InsertRows => "INSERT_ROWS",
            Intent::UpdateRows => "UPDATE_ROWS",
            Intent::DeleteRows => "DELETE_ROWS",
            Intent::DropTable => "DROP_TABLE",
            Intent::DropDatabase => "DROP_DATABASE",
            Intent::TruncateTable => "TRUNCATE_TABLE",
        }
    }

    /// Write and DDL tags, subject to stricter authorization.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Intent::InsertRows
                | Intent::UpdateRows
                | Intent::DeleteRows
                | Intent::DropTable
                | Intent::DropDatabase
                | Intent::TruncateTable
        )
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            Intent::AggregateSum
                | Intent::AggregateAvg
                | Intent::AggregateMin
                | Intent::AggregateMax
        )
    }

    /// Every tag the classifier can produce, for fallback collaborators.
    pub fn all() -> &'static [Intent] {
        &[
            Intent::CountRows,
            Intent::AggregateSum,
            Intent::AggregateAvg,
            Intent::AggregateMin,
            Intent::AggregateMax,
            Intent::OrderBy,
            Intent::Limit,
            Intent::SelectRows,
            Intent::Description,
            Intent::InsertRows,
            Intent::UpdateRows,
            Intent::DeleteRows,
            Intent::DropTable,
            Intent::DropDatabase,
            Intent::TruncateTable,
        ]
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The set of tags recognized for one request. Never empty after
/// classification: `SELECT_ROWS` is the universal fallback.
pub type IntentSet = BTreeSet<Intent>;

/// Ordered rule table. DDL phrases come first so that e.g. "drop table"
/// is tagged before the generic verbs get a chance to claim the text.
static RULES: LazyLock<Vec<(Regex, Intent)>> = LazyLock::new(|| {
    let table: &[(&str, Intent)] = &[
        (r"\bdrop\s+(?:the\s+)?database\b", Intent::DropDatabase),
        (r"\bdrop\s+(?:the\s+)?table\b", Intent::DropTable),
        (r"\btruncate\b|\bempty\s+(?:the\s+)?table\b", Intent::TruncateTable),
        (r"\binsert\b|\badd\s+(?:a\s+)?(?:new\s+)?(?:row|record|entry)\b", Intent::InsertRows),
        (r"\bupdate\b|\bmodify\b|\bchange\b", Intent::UpdateRows),
        (r"\bdelete\b|\bremove\b|\berase\b", Intent::DeleteRows),
        (r"\bcount\b|\bhow many\b|\bnumber of\b|\btotal number of\b", Intent::CountRows),
        (r"\bsum of\b|\btotal sum\b|\badd up\b|\btotal of\b|\bcombined\b", Intent::AggregateSum),
        (r"\baverage\b|\bmean of\b|\bavg\b", Intent::AggregateAvg),
        (r"\bminimum\b|\blowest\b|\bsmallest\b|\bmin\b", Intent::AggregateMin),
        (r"\bmaximum\b|\bhighest\b|\blargest\b|\bmax\b", Intent::AggregateMax),
        (r"\b(?:first|top|last)\s+\d+\b", Intent::Limit),
        (r"\btop\b|\bmost\b|\bleast\b|\bbest\b", Intent::OrderBy),
        (r"\bdescribe\b|\bstructure of\b|\bschema of\b|\bexplain\b|\bdefinition of\b", Intent::Description),
        (
            r"\blist\b|\bshow\b|\bdisplay\b|\bgive\b|\btell me\b|\bfind\b|\bfetch\b|\bget\b|\bwhich\b|\bwhat\b",
            Intent::SelectRows,
        ),
    ];
    table
        .iter()
        .map(|(pat, intent)| (Regex::new(pat).unwrap(), *intent))
        .collect()
});

/// Classify the token stream into a non-empty set of operation tags.
pub fn classify_tokens(tokens: &[String]) -> IntentSet {
    let text = tokens.join(" ").to_lowercase();
    let mut intents = IntentSet::new();
    for (regex, intent) in RULES.iter() {
        if regex.is_match(&text) {
            intents.insert(*intent);
        }
    }
    if intents.is_empty() {
        intents.insert(Intent::SelectRows);
    }
    intents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn count_and_select_can_coexist() {
        let intents = classify_tokens(&toks(&["show", "how many", "astronauts"]));
        assert!(intents.contains(&Intent::CountRows));
        assert!(intents.contains(&Intent::SelectRows));
    }

    #[test]
    fn empty_match_defaults_to_select() {
        let intents = classify_tokens(&toks(&["astronauts_db"]));
        assert_eq!(intents.len(), 1);
        assert!(intents.contains(&Intent::SelectRows));
    }

    #[test]
    fn drop_database_not_confused_with_drop_table() {
        let intents = classify_tokens(&toks(&["drop", "database", "stars_db"]));
        assert!(intents.contains(&Intent::DropDatabase));
        assert!(!intents.contains(&Intent::DropTable));
    }

    #[test]
    fn limit_implies_order_phrases_separately() {
        let intents = classify_tokens(&toks(&["top", "5", "stars"]));
        assert!(intents.contains(&Intent::Limit));
        assert!(intents.contains(&Intent::OrderBy));
    }

    #[test]
    fn aggregates_are_distinct_tags() {
        let intents = classify_tokens(&toks(&["average", "mass", "of", "stars"]));
        assert!(intents.contains(&Intent::AggregateAvg));
        assert!(!intents.contains(&Intent::AggregateSum));
    }

    #[test]
    fn destructive_classification() {
        assert!(Intent::DeleteRows.is_destructive());
        assert!(Intent::TruncateTable.is_destructive());
        assert!(!Intent::CountRows.is_destructive());
        assert!(!Intent::Description.is_destructive());
    }

    #[test]
    fn tags_render_as_wire_names() {
        assert_eq!(Intent::AggregateMax.tag(), "AGGREGATE_MAX");
        assert_eq!(Intent::DropDatabase.to_string(), "DROP_DATABASE");
    }
}
