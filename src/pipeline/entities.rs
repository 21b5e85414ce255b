//! Schema entity recognition.
//!
//! Each final token is matched against the schema vocabulary: a normalized
//! direct lookup first, then (when enabled) fuzzy Jaro-Winkler matching over
//! every vocabulary term. Direct hits carry confidence 1.0; fuzzy hits carry
//! their similarity score. Tokens that match nothing still produce an
//! `unmatched` entity so output order mirrors token order.

use serde::Serialize;

use crate::schema::{map::normalize_lookup, SchemaMap, SchemaObject};

/// Classification of a recognized token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Database,
    Table,
    Column,
    Unmatched,
}

/// How a token was matched against the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    Direct,
    Fuzzy,
    None,
}

/// One token classified against the schema map.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub kind: EntityKind,
    /// Original-cased schema name; `None` for unmatched tokens.
    pub value: Option<String>,
    pub matched_token: String,
    pub method: MatchMethod,
    pub confidence: f64,
}

impl Entity {
    fn unmatched(token: &str) -> Self {
        Entity {
            kind: EntityKind::Unmatched,
            value: None,
            matched_token: token.to_string(),
            method: MatchMethod::None,
            confidence: 0.0,
        }
    }
}

fn kind_of(schema: &SchemaMap, name: &str) -> EntityKind {
    match schema.classify(name) {
        Some(SchemaObject::Database) => EntityKind::Database,
        Some(SchemaObject::Table) => EntityKind::Table,
        Some(SchemaObject::Column) => EntityKind::Column,
        None => EntityKind::Unmatched,
    }
}

/// Best fuzzy match for a token over the whole vocabulary, if any term
/// scores at or above the threshold.
fn best_fuzzy_match<'a>(
    schema: &'a SchemaMap,
    token: &str,
    threshold: f64,
) -> Option<(&'a str, f64)> {
    let norm_token = normalize_lookup(token);
    if norm_token.is_empty() {
        return None;
    }
    let mut best: Option<(&str, f64)> = None;
    for term in schema.iter_terms() {
        let score = strsim::jaro_winkler(&norm_token, &normalize_lookup(term));
        if score >= threshold && best.map_or(true, |(_, b)| score > b) {
            best = Some((term, score));
        }
    }
    best
}

/// Classify every token against the schema map, in token order.
///
/// Fuzzy matching trades recall for precision; disable it on paths where
/// the absence of a schema entity is itself a security-relevant signal.
pub fn recognize_entities(
    tokens: &[String],
    schema: &SchemaMap,
    enable_fuzzy: bool,
    fuzzy_threshold: f64,
) -> Vec<Entity> {
    let mut entities = Vec::with_capacity(tokens.len());
    for token in tokens {
        let norm = normalize_lookup(token);
        if let Some(original) = schema.resolve_normalized(&norm) {
            entities.push(Entity {
                kind: kind_of(schema, original),
                value: Some(original.to_string()),
                matched_token: token.clone(),
                method: MatchMethod::Direct,
                confidence: 1.0,
            });
            continue;
        }
        if enable_fuzzy {
            if let Some((term, score)) = best_fuzzy_match(schema, token, fuzzy_threshold) {
                entities.push(Entity {
                    kind: kind_of(schema, term),
                    value: Some(term.to_string()),
                    matched_token: token.clone(),
                    method: MatchMethod::Fuzzy,
                    confidence: score,
                });
                continue;
            }
        }
        entities.push(Entity::unmatched(token));
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaCatalog;

    fn schema() -> SchemaMap {
        SchemaMap::build(
            &SchemaCatalog::from_json(
                r#"{"databases": [
                    {"name": "astronauts_db", "tables": [
                        {"name": "personal_info", "columns": ["nationality", "year_of_birth"]}
                    ]},
                    {"name": "stars_db", "tables": [
                        {"name": "stars", "columns": ["star name", "luminosity"]}
                    ]}
                ]}"#,
            )
            .unwrap(),
        )
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn direct_matches_classify_by_hierarchy() {
        let ents = recognize_entities(
            &tokens(&["astronauts_db", "personal_info", "nationality"]),
            &schema(),
            false,
            0.8,
        );
        assert_eq!(ents[0].kind, EntityKind::Database);
        assert_eq!(ents[1].kind, EntityKind::Table);
        assert_eq!(ents[2].kind, EntityKind::Column);
        assert!(ents.iter().all(|e| e.method == MatchMethod::Direct));
        assert!(ents.iter().all(|e| e.confidence == 1.0));
    }

    #[test]
    fn direct_match_ignores_underscores_and_case() {
        let ents = recognize_entities(&tokens(&["Year of Birth"]), &schema(), false, 0.8);
        assert_eq!(ents[0].kind, EntityKind::Column);
        assert_eq!(ents[0].value.as_deref(), Some("year_of_birth"));
    }

    #[test]
    fn fuzzy_match_catches_typos() {
        let ents = recognize_entities(&tokens(&["luminsity"]), &schema(), true, 0.8);
        assert_eq!(ents[0].kind, EntityKind::Column);
        assert_eq!(ents[0].value.as_deref(), Some("luminosity"));
        assert_eq!(ents[0].method, MatchMethod::Fuzzy);
        assert!(ents[0].confidence >= 0.8 && ents[0].confidence < 1.0);
    }

    #[test]
    fn fuzzy_disabled_yields_unmatched() {
        let ents = recognize_entities(&tokens(&["luminsity"]), &schema(), false, 0.8);
        assert_eq!(ents[0].kind, EntityKind::Unmatched);
        assert_eq!(ents[0].value, None);
        assert_eq!(ents[0].method, MatchMethod::None);
    }

    #[test]
    fn unrelated_tokens_stay_unmatched_even_with_fuzzy() {
        let ents = recognize_entities(&tokens(&["spaghetti"]), &schema(), true, 0.8);
        assert_eq!(ents[0].kind, EntityKind::Unmatched);
    }

    #[test]
    fn output_order_mirrors_token_order() {
        let ents = recognize_entities(
            &tokens(&["show", "nationality", "usa", "nationality"]),
            &schema(),
            false,
            0.8,
        );
        assert_eq!(ents.len(), 4);
        assert_eq!(ents[1].kind, EntityKind::Column);
        assert_eq!(ents[3].kind, EntityKind::Column); // duplicates retained
    }
}
