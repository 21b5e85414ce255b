//! Role-based access control over compiled plans.
//!
//! A static role to allowed-databases map plus one wildcard role. Every
//! authorization decision flows through [`RolePolicy::authorize`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ResolveError;
use crate::pipeline::intent::{Intent, IntentSet};

/// Wildcard granting a role every database.
pub const ALL_DATABASES: &str = "*";

/// The administrative role, permitted every operation class.
pub const ADMIN_ROLE: &str = "admin";

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AccessDecision {
    Allowed,
    /// Carries a human-readable reason naming what was refused.
    Denied { reason: String },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }

    pub fn denial_reason(&self) -> Option<&str> {
        match self {
            AccessDecision::Allowed => None,
            AccessDecision::Denied { reason } => Some(reason),
        }
    }
}

/// Role to allowed-databases map.
#[derive(Debug, Clone, Serialize)]
pub struct RolePolicy {
    grants: BTreeMap<String, Vec<String>>,
}

impl Default for RolePolicy {
    /// The deployment's department roles over the space datasets.
    fn default() -> Self {
        let mut grants = BTreeMap::new();
        let table: &[(&str, &[&str])] = &[
            ("science", &["stars_db", "natural_satellites_db"]),
            ("missions", &["space_missions_db", "rockets_db", "astronauts_db"]),
            ("news", &["spacenews_db"]),
            ("isro", &["isro_satellites_db"]),
            ("asteroid", &["asteroids_db"]),
            (ADMIN_ROLE, &[ALL_DATABASES]),
        ];
        for (role, dbs) in table {
            grants.insert(
                role.to_string(),
                dbs.iter().map(|d| d.to_string()).collect(),
            );
        }
        RolePolicy { grants }
    }
}

impl RolePolicy {
    pub fn new(grants: BTreeMap<String, Vec<String>>) -> Self {
        RolePolicy { grants }
    }

    pub fn allowed_databases(&self, role: &str) -> &[String] {
        self.grants.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    fn holds_wildcard(&self, role: &str) -> bool {
        self.allowed_databases(role).iter().any(|d| d == ALL_DATABASES)
    }

    /// Authorize an intent set against a resolved target database.
    ///
    /// The administrative role passes unconditionally. Every other role
    /// is refused write and DDL intents outright, then read intents are
    /// checked against the role's database allowlist. A destructive
    /// intent with no resolved target is a resolution error, not a
    /// denial: there is nothing concrete to authorize against.
    pub fn authorize(
        &self,
        role: &str,
        intents: &IntentSet,
        database: Option<&str>,
    ) -> Result<AccessDecision, ResolveError> {
        let destructive = intents
            .iter()
            .find(|i| i.is_destructive())
            .map(Intent::tag);

        // Role-level write prohibition comes first so the denial reason
        // is about the role, not about an unresolved target.
        if let Some(operation) = destructive {
            if role != ADMIN_ROLE {
                return Ok(AccessDecision::Denied {
                    reason: format!(
                        "role '{role}' may not perform {operation}; modification operations require the '{ADMIN_ROLE}' role"
                    ),
                });
            }
            if database.is_none() {
                return Err(ResolveError::UnresolvedDestructiveTarget {
                    operation: operation.to_string(),
                });
            }
        }

        if role == ADMIN_ROLE {
            return Ok(AccessDecision::Allowed);
        }

        if self.holds_wildcard(role) {
            return Ok(AccessDecision::Allowed);
        }

        match database {
            // Read with no concrete target (e.g. SHOW DATABASES) is
            // allowed for any known role; it reveals names only.
            None => {
                if self.grants.contains_key(role) {
                    Ok(AccessDecision::Allowed)
                } else {
                    Ok(AccessDecision::Denied {
                        reason: format!("role '{role}' has no database grants"),
                    })
                }
            }
            Some(db) => {
                let allowed = self
                    .allowed_databases(role)
                    .iter()
                    .any(|d| d.eq_ignore_ascii_case(db));
                if allowed {
                    Ok(AccessDecision::Allowed)
                } else {
                    Ok(AccessDecision::Denied {
                        reason: format!(
                            "database '{db}' is not in role '{role}' allowlist"
                        ),
                    })
                }
            }
        }
    }
}
