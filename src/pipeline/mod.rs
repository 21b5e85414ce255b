//! The request-compilation pipeline.
//!
//! [`QueryCompiler::compile`] runs the full chain for one request:
//! normalization, tokenization, intent classification, entity and
//! literal extraction, schema resolution, statement construction and
//! finally the access gate. Every stage is a pure function of its
//! inputs plus the read-only schema map snapshot, so a compiler may be
//! shared freely across threads.

pub mod entities;
pub mod intent;
pub mod normalize;
pub mod operators;
pub mod tokenize;
pub mod values;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audit::{ActionCategory, AuditOutcome, AuditRecord, AuditSink};
use crate::exec::ConversationalFallback;
use crate::rbac::RolePolicy;
use crate::schema::SchemaMap;
use crate::sql::{self, LinkedOperator, QueryPlan};

use entities::{Entity, EntityKind};
use intent::{Intent, IntentSet};
use values::ValueLiteral;

/// Tunables for one compiler instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Fall back to Jaro-Winkler matching for tokens with no direct hit.
    pub fuzzy_matching: bool,
    /// Minimum similarity for a fuzzy hit to count.
    pub fuzzy_threshold: f64,
    /// Longest multi-word schema phrase the tokenizer will combine.
    pub max_phrase_window: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            fuzzy_matching: true,
            fuzzy_threshold: 0.8,
            max_phrase_window: 6,
        }
    }
}

/// Everything the pipeline produced for one request.
#[derive(Debug, Clone, Serialize)]
pub struct CompileOutcome {
    pub plan: QueryPlan,
    pub intents: IntentSet,
    pub entities: Vec<Entity>,
    pub operators: Vec<LinkedOperator>,
    pub values: Vec<ValueLiteral>,
    /// Set when the access gate refused the request.
    pub denied_reason: Option<String>,
}

impl CompileOutcome {
    /// A plan is executable only when it compiled cleanly, was not
    /// denied, and carries a concrete target database. Listing plans
    /// like `SHOW DATABASES;` have no target and fail this check.
    pub fn is_executable(&self) -> bool {
        self.denied_reason.is_none()
            && !self.plan.is_error()
            && self.plan.target_database.is_some()
    }

    fn matched_any_entity(&self) -> bool {
        self.entities.iter().any(|e| e.kind != EntityKind::Unmatched)
    }
}

/// Compiles natural-language requests into guarded SQL plans.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    schema: Arc<SchemaMap>,
    policy: RolePolicy,
    config: CompilerConfig,
}

impl QueryCompiler {
    pub fn new(schema: Arc<SchemaMap>, policy: RolePolicy, config: CompilerConfig) -> Self {
        QueryCompiler {
            schema,
            policy,
            config,
        }
    }

    pub fn schema(&self) -> &SchemaMap {
        &self.schema
    }

    /// Run the full pipeline for one request under the caller's role.
    pub fn compile(&self, raw_text: &str, role: &str) -> CompileOutcome {
        let (dated, date_conversions) = normalize::normalize_dates(raw_text);
        let (normalized, unit_conversions) = normalize::normalize_units(&dated);
        debug!(
            text = %normalized,
            dates = date_conversions.len(),
            units = unit_conversions.len(),
            "request normalized"
        );

        let tokens = tokenize::tokenize(&normalized, &self.schema, self.config.max_phrase_window);
        let intents = intent::classify_tokens(&tokens);
        debug!(?tokens, ?intents, "request classified");

        let entities = entities::recognize_entities(
            &tokens,
            &self.schema,
            self.config.fuzzy_matching,
            self.config.fuzzy_threshold,
        );

        // Operators and literals scan the normalized text directly;
        // tokenization may have folded multi-word schema phrases that
        // would otherwise mask adjacent literals.
        let hits = operators::recognize_operators(&normalized);
        let schema_terms: Vec<String> = self
            .schema
            .iter_terms()
            .map(|t| t.to_lowercase())
            .collect();
        let blocked: Vec<(usize, usize)> = hits.iter().map(|h| h.span).collect();
        let mut literals = values::recognize_values(&normalized, &schema_terms, &blocked);
        values::reclassify_years(&mut literals);

        let linked = sql::link_operators(&hits, &entities, &intents);
        self.finish(intents, entities, linked, literals, role)
    }

    /// As [`compile`](Self::compile), consulting the fallback classifier
    /// when the request matched no schema vocabulary at all. The
    /// fallback is invoked at most once.
    pub fn compile_with_fallback(
        &self,
        raw_text: &str,
        role: &str,
        fallback: &dyn ConversationalFallback,
    ) -> CompileOutcome {
        let outcome = self.compile(raw_text, role);
        if outcome.matched_any_entity() {
            return outcome;
        }
        match fallback.classify(raw_text, Intent::all()) {
            Some(recovered) => {
                debug!(%recovered, "fallback classifier supplied an intent");
                let mut intents = outcome.intents;
                intents.insert(recovered);
                self.finish(
                    intents,
                    outcome.entities,
                    outcome.operators,
                    outcome.values,
                    role,
                )
            }
            None => CompileOutcome {
                plan: QueryPlan::error("input does not appear to be a database request"),
                ..outcome
            },
        }
    }

    /// As [`compile`](Self::compile), additionally emitting one audit
    /// record for the request.
    pub fn compile_audited(
        &self,
        raw_text: &str,
        caller: &str,
        role: &str,
        sink: &dyn AuditSink,
    ) -> CompileOutcome {
        let outcome = self.compile(raw_text, role);
        let audit_outcome = match &outcome.denied_reason {
            Some(reason) => AuditOutcome::Denied {
                reason: reason.clone(),
            },
            None if outcome.plan.is_error() => AuditOutcome::ResolutionFailed,
            None => AuditOutcome::Compiled,
        };
        sink.record(&AuditRecord {
            caller: caller.to_string(),
            role: role.to_string(),
            raw_text: raw_text.to_string(),
            resolved_database: outcome.plan.target_database.clone(),
            action_category: ActionCategory::from_intents(&outcome.intents),
            generated_sql: outcome.plan.sql.clone(),
            outcome: audit_outcome,
        });
        outcome
    }

    /// Build the statement and run it through the access gate.
    fn finish(
        &self,
        intents: IntentSet,
        entities: Vec<Entity>,
        operators: Vec<LinkedOperator>,
        values: Vec<ValueLiteral>,
        role: &str,
    ) -> CompileOutcome {
        let plan = sql::build_query(&intents, &entities, &operators, &values, &self.schema);

        let (plan, denied_reason) =
            match self
                .policy
                .authorize(role, &intents, plan.target_database.as_deref())
            {
                Ok(decision) => {
                    let denied = decision.denial_reason().map(str::to_string);
                    (plan, denied)
                }
                Err(err) => {
                    // Destructive statement with no resolved target:
                    // surface as a resolution failure, keeping any
                    // diagnostic the builder already produced.
                    let plan = if plan.is_error() {
                        plan
                    } else {
                        QueryPlan::error(err.to_string())
                    };
                    (plan, None)
                }
            };

        CompileOutcome {
            plan,
            intents,
            entities,
            operators,
            values,
            denied_reason,
        }
    }
}
