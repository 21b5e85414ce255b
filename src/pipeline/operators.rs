//! Comparison operator recognition.
//!
//! Word phrases ("greater than or equal to", "at least") are matched with
//! word-boundary regexes; bare symbols (`>=`, `<`, `≠`) are matched
//! literally with explicit neighbor checks, since `\b` does not help
//! around non-word characters. Hits are deduplicated so that no two
//! surviving spans overlap, longer phrases winning over their prefixes.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// SQL comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperatorSymbol {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
    Ne,
}

impl OperatorSymbol {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OperatorSymbol::Eq => "=",
            OperatorSymbol::Gt => ">",
            OperatorSymbol::Lt => "<",
            OperatorSymbol::Ge => ">=",
            OperatorSymbol::Le => "<=",
            OperatorSymbol::Ne => "!=",
        }
    }
}

/// One operator occurrence in the normalized text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorHit {
    pub symbol: OperatorSymbol,
    /// The surface phrase as written.
    pub raw: String,
    /// Byte span in the normalized text.
    pub span: (usize, usize),
}

/// Word phrases per operator, longest variants first so that "greater
/// than or equal to" is claimed before "greater than".
static WORD_PHRASES: LazyLock<Vec<(Regex, OperatorSymbol)>> = LazyLock::new(|| {
    let table: &[(&str, OperatorSymbol)] = &[
        (r"greater\s+than\s+or\s+equal\s+to", OperatorSymbol::Ge),
        (r"less\s+than\s+or\s+equal\s+to", OperatorSymbol::Le),
        (r"at\s+least", OperatorSymbol::Ge),
        (r"no\s+less\s+than", OperatorSymbol::Ge),
        (r"at\s+most", OperatorSymbol::Le),
        (r"no\s+more\s+than", OperatorSymbol::Le),
        (r"not\s+equal\s+to", OperatorSymbol::Ne),
        (r"greater\s+than", OperatorSymbol::Gt),
        (r"more\s+than", OperatorSymbol::Gt),
        (r"above", OperatorSymbol::Gt),
        (r"over", OperatorSymbol::Gt),
        (r"less\s+than", OperatorSymbol::Lt),
        (r"below", OperatorSymbol::Lt),
        (r"under", OperatorSymbol::Lt),
        (r"equal\s+to", OperatorSymbol::Eq),
        (r"equals?", OperatorSymbol::Eq),
    ];
    table
        .iter()
        .map(|(pat, sym)| (Regex::new(&format!(r"(?i)\b{pat}\b")).unwrap(), *sym))
        .collect()
});

/// Bare symbols, multi-character first.
const SYMBOLS: &[(&str, OperatorSymbol)] = &[
    (">=", OperatorSymbol::Ge),
    ("<=", OperatorSymbol::Le),
    ("!=", OperatorSymbol::Ne),
    ("<>", OperatorSymbol::Ne),
    ("≥", OperatorSymbol::Ge),
    ("≤", OperatorSymbol::Le),
    ("≠", OperatorSymbol::Ne),
    ("=", OperatorSymbol::Eq),
    (">", OperatorSymbol::Gt),
    ("<", OperatorSymbol::Lt),
];

fn symbol_boundaries_ok(text: &str, lo: usize, hi: usize) -> bool {
    // A bare symbol must not butt up against another operator character,
    // otherwise "=" inside ">=" would double-report.
    let before = text[..lo].chars().next_back();
    let after = text[hi..].chars().next();
    let is_op_char = |c: char| matches!(c, '<' | '>' | '=' | '!' | '≥' | '≤' | '≠');
    !before.is_some_and(is_op_char) && !after.is_some_and(is_op_char)
}

/// Find every comparison operator in `text`, in order of appearance,
/// with no two spans overlapping.
pub fn recognize_operators(text: &str) -> Vec<OperatorHit> {
    let mut hits: Vec<OperatorHit> = Vec::new();

    for (regex, symbol) in WORD_PHRASES.iter() {
        for m in regex.find_iter(text) {
            hits.push(OperatorHit {
                symbol: *symbol,
                raw: m.as_str().to_string(),
                span: (m.start(), m.end()),
            });
        }
    }

    for (lit, symbol) in SYMBOLS {
        let mut from = 0;
        while let Some(pos) = text[from..].find(lit) {
            let lo = from + pos;
            let hi = lo + lit.len();
            if symbol_boundaries_ok(text, lo, hi) {
                hits.push(OperatorHit {
                    symbol: *symbol,
                    raw: lit.to_string(),
                    span: (lo, hi),
                });
            }
            from = hi;
        }
    }

    // Sweep: earliest start first, longest span first on ties, then keep
    // only hits that do not overlap an already-kept span.
    hits.sort_by(|a, b| {
        a.span
            .0
            .cmp(&b.span.0)
            .then((b.span.1 - b.span.0).cmp(&(a.span.1 - a.span.0)))
    });
    let mut kept: Vec<OperatorHit> = Vec::new();
    for hit in hits {
        let overlaps = kept
            .iter()
            .any(|k| hit.span.0 < k.span.1 && k.span.0 < hit.span.1);
        if !overlaps {
            kept.push(hit);
        }
    }
    kept
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const FRAGMENTS: &[&str] = &[
        "mass", "5", "greater than", "greater than or equal to", "at least", "no more than",
        "equals", "equal to", ">=", "<=", "!=", "<>", "=", ">", "<", "≥", "stars", "over",
        "not equal to",
    ];

    fn arb_text() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(FRAGMENTS), 0..10)
            .prop_map(|parts| parts.join(" "))
    }

    proptest! {
        /// No two recognized spans may overlap, and output is ordered.
        #[test]
        fn spans_never_overlap(text in arb_text()) {
            let hits = recognize_operators(&text);
            for pair in hits.windows(2) {
                prop_assert!(pair[0].span.1 <= pair[1].span.0);
            }
        }

        /// Every reported span reproduces its raw phrase.
        #[test]
        fn spans_index_their_raw_text(text in arb_text()) {
            for hit in recognize_operators(&text) {
                prop_assert_eq!(&text[hit.span.0..hit.span.1], hit.raw.as_str());
            }
        }
    }
}
