//! Literal value recognition.
//!
//! A single alternation scans the normalized text for typed literals,
//! with the branches ordered so that floats win over their integer
//! prefix and quoted strings are taken whole. A second, heuristic pass
//! picks up unquoted string values ("named Hubble", "called ISRO-1")
//! when they sit near an indicator word and were not already claimed.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueKind {
    Float,
    Integer,
    Boolean,
    String,
    Date,
}

/// One typed literal found in the request text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueLiteral {
    pub kind: ValueKind,
    /// The literal with any surrounding quotes stripped.
    pub value: String,
    /// Byte span in the normalized text, quotes included.
    pub span: (usize, usize),
}

impl ValueLiteral {
    pub fn new(kind: ValueKind, value: impl Into<String>, span: (usize, usize)) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }
}

/// Branch order is meaningful: float before integer, quoted strings
/// before date shapes so a quoted date stays a string.
static LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        (?P<float>\b\d+\.\d+\b)
        |(?P<int>\b\d+\b)
        |(?P<bool>\b(?i:true|false)\b)
        |'(?P<sq>[^']*)'
        |"(?P<dq>[^"]*)"
        |(?P<iso>\b\d{4}-\d{2}-\d{2}\b)
        |(?P<slash>\b\d{1,2}/\d{1,2}/\d{2,4}\b)
        |(?P<month>\b(?i:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+\d{1,2}(?:,?\s+\d{4})?\b)
        "#,
    )
    .unwrap()
});

/// Words that suggest the next capitalized or code-like token is a value
/// rather than prose.
const INDICATORS: &[&str] = &[
    "name", "called", "named", "title", "with", "values", "value", "equals", "equal", "=", "set",
    "to", "as", "is",
];

static UNQUOTED_CANDIDATES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Proper nouns, possibly multi-word: "New Delhi", "Hubble"
        r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b",
        // All-caps codes with optional suffix: "USA", "PSLV-C37"
        r"\b[A-Z]{2,}[-_]?\d*[A-Z]*\b",
        // Mixed identifiers: "Falcon9", "gsat30"
        r"\b[A-Za-z]+\d+[A-Za-z]*\b",
        // Plain lowercase words of 3+ letters
        r"\b[a-zA-Z]{3,}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// True when the token just before `start` is an indicator word. Schema
/// terms in between are looked through, so "with nationality USA" still
/// counts: the column name sits between the indicator and its value.
fn is_likely_value_context(text: &str, start: usize, schema_terms: &[String]) -> bool {
    for token in text[..start].split_whitespace().rev() {
        let lowered = token.to_lowercase();
        if schema_terms.contains(&lowered) {
            continue;
        }
        return INDICATORS.contains(&lowered.as_str());
    }
    false
}

fn overlaps_any(span: (usize, usize), taken: &[ValueLiteral]) -> bool {
    taken
        .iter()
        .any(|v| span.0 < v.span.1 && v.span.0 < span.1)
}

/// Find typed literals in `text`, left to right. `blocked_spans` names
/// regions the heuristic pass must not claim, typically the operator
/// phrases already recognized in the same text.
pub fn recognize_values(
    text: &str,
    schema_terms: &[String],
    blocked_spans: &[(usize, usize)],
) -> Vec<ValueLiteral> {
    let mut values: Vec<ValueLiteral> = Vec::new();

    for caps in LITERAL_RE.captures_iter(text) {
        let (kind, m) = if let Some(m) = caps.name("float") {
            (ValueKind::Float, m)
        } else if let Some(m) = caps.name("int") {
            (ValueKind::Integer, m)
        } else if let Some(m) = caps.name("bool") {
            (ValueKind::Boolean, m)
        } else if let Some(m) = caps.name("sq").or_else(|| caps.name("dq")) {
            (ValueKind::String, m)
        } else if let Some(m) = caps
            .name("iso")
            .or_else(|| caps.name("slash"))
            .or_else(|| caps.name("month"))
        {
            (ValueKind::Date, m)
        } else {
            continue;
        };
        let span = if kind == ValueKind::String {
            // Claim the quotes too so the heuristic pass skips them.
            let Some(whole) = caps.get(0) else { continue };
            (whole.start(), whole.end())
        } else {
            (m.start(), m.end())
        };
        values.push(ValueLiteral::new(kind, m.as_str(), span));
    }

    for candidate_re in UNQUOTED_CANDIDATES.iter() {
        for m in candidate_re.find_iter(text) {
            let span = (m.start(), m.end());
            if overlaps_any(span, &values) {
                continue;
            }
            if blocked_spans
                .iter()
                .any(|b| span.0 < b.1 && b.0 < span.1)
            {
                continue;
            }
            if !is_likely_value_context(text, m.start(), schema_terms) {
                continue;
            }
            let lowered = m.as_str().to_lowercase();
            // Schema names and indicator words are not values.
            if schema_terms.iter().any(|t| t == &lowered)
                || INDICATORS.contains(&lowered.as_str())
            {
                continue;
            }
            values.push(ValueLiteral::new(ValueKind::String, m.as_str(), span));
        }
    }

    values.sort_by_key(|v| v.span.0);
    values
}

/// A 4-digit integer in a date-flavored request is almost always a year.
pub fn reclassify_years(values: &mut [ValueLiteral]) {
    for v in values.iter_mut() {
        if v.kind == ValueKind::Integer && v.value.len() == 4 {
            if let Ok(n) = v.value.parse::<u32>() {
                if (1000..=2999).contains(&n) {
                    v.kind = ValueKind::Date;
                }
            }
        }
    }
}
