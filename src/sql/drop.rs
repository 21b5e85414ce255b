//! DROP and TRUNCATE builders.
//!
//! All three variants emit the `IF EXISTS` guarded form so a repeated
//! request does not fail on a target that is already gone.

use crate::pipeline::intent::{Intent, IntentSet};

use super::context::ResolvedContext;
use super::literal::{qualified_table, quote_ident};
use super::QueryPlan;

pub fn build(intents: &IntentSet, ctx: &ResolvedContext) -> QueryPlan {
    if intents.contains(&Intent::DropDatabase) {
        let Some(db) = &ctx.database else {
            return QueryPlan::error("DROP DATABASE requires a database name");
        };
        return QueryPlan::ok(
            format!("DROP DATABASE IF EXISTS {};", quote_ident(db)),
            Some(db.clone()),
        );
    }

    let keyword = if intents.contains(&Intent::DropTable) {
        "DROP TABLE IF EXISTS"
    } else {
        "TRUNCATE TABLE"
    };
    let Some(table) = &ctx.table else {
        return QueryPlan::error(format!("{keyword} requires a table name"));
    };
    let target = match &ctx.database {
        Some(db) => qualified_table(db, table),
        None => quote_ident(table),
    };
    QueryPlan::ok(format!("{keyword} {target};"), ctx.database.clone())
}
