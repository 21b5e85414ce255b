//! Word tokenization with schema-phrase combination.
//!
//! Atomic tokens come from word-boundary splitting of the lower-cased text.
//! A greedy left-to-right scan then recombines runs of up to
//! `max_phrase_window` consecutive tokens into a single combined token when
//! the space-joined phrase exists in the schema vocabulary. Longest match
//! wins and the scan never backtracks, so a combined token is mutually
//! exclusive with its constituents. A final stop-word filter drops common
//! function words, but never a schema phrase.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::SchemaMap;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Common English function words removed after phrase combination. Words
/// that participate in intent phrases ("how many", "number of", "add up",
/// "tell me") are deliberately absent so the classifier still sees them.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "been", "before", "being", "between", "both", "but", "by", "can",
    "did", "do", "does", "doing", "down", "during", "each", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "i", "if", "in", "into", "is", "it", "its", "just",
    "more", "my", "nor", "not", "now", "off", "on", "once", "only",
    "or", "other", "our", "ours", "out", "over", "own", "please", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "very", "was", "we", "were", "when", "where",
    "while", "who", "whom", "why", "will", "with", "you", "your", "yours",
];

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Lower-cased atomic tokens from word-boundary splitting.
pub fn base_tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Greedy longest-match combination of adjacent tokens into known schema
/// phrases. Strict left-to-right, non-backtracking.
pub fn combine_schema_phrases(
    tokens: &[String],
    schema: &SchemaMap,
    max_window: usize,
) -> Vec<String> {
    let mut combined = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let mut matched = false;
        let upper = max_window.min(tokens.len() - i);
        for window in (1..=upper).rev() {
            let phrase = tokens[i..i + window].join(" ");
            if schema.contains_phrase(&phrase) {
                combined.push(phrase);
                i += window;
                matched = true;
                break;
            }
        }
        if !matched {
            combined.push(tokens[i].clone());
            i += 1;
        }
    }
    combined
}

/// Remove stop words, keeping any token that is itself a schema phrase.
pub fn filter_stop_words(tokens: Vec<String>, schema: &SchemaMap) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|t| !is_stop_word(t) || schema.contains_phrase(t))
        .collect()
}

/// Full tokenization pass: split, combine, filter.
pub fn tokenize(text: &str, schema: &SchemaMap, max_window: usize) -> Vec<String> {
    let base = base_tokenize(text);
    let combined = combine_schema_phrases(&base, schema, max_window);
    filter_stop_words(combined, schema)
}
