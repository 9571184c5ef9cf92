//! The individual rewrite rules. Each module exposes `rewrite_statement`,
//! which the registry drives, and a total convenience function that returns
//! its input unchanged when the statement cannot be read.

pub(crate) mod aggregate_alias;
pub(crate) mod alias_quotes;
pub(crate) mod geo_group_by;
pub(crate) mod namespace_qualifier;

use crate::{GeosqlError, RewriteConfig};

use super::registry::RuleOutcome;

fn into_statement(sql: &str, outcome: Result<RuleOutcome, GeosqlError>) -> String {
    match outcome {
        Ok(RuleOutcome::Changed(rewritten)) => rewritten,
        Ok(RuleOutcome::NoChange | RuleOutcome::NotApplicable) => sql.to_string(),
        Err(err) => {
            log::warn!("statement passed through unchanged: {err}");
            sql.to_string()
        }
    }
}

/// Prefixes unqualified `FROM`/`JOIN`/`IN` table references with `namespace`.
pub fn qualify(sql: &str, namespace: &str) -> String {
    if namespace.is_empty() {
        return sql.to_string();
    }
    let config = RewriteConfig::with_default_namespace(namespace);
    into_statement(sql, namespace_qualifier::rewrite_statement(sql, &config))
}

/// Renames quoted aliases spelled like an aggregate call, e.g.
/// `AS "COUNT(*)"` becomes `AS count_rows`.
pub fn sanitize_aggregate_aliases(sql: &str) -> String {
    into_statement(sql, aggregate_alias::rewrite_statement(sql))
}

/// Rewrites `AS "alias"` to ``AS `alias` ``.
pub fn normalize_alias_quotes(sql: &str) -> String {
    into_statement(sql, alias_quotes::rewrite_statement(sql))
}

/// Removes `GROUP BY` targets over `ST_AsGeoJSON` output and the
/// conventional `geojson` alias, normalizing whitespace on the way.
pub fn strip_geo_group_by(sql: &str) -> String {
    let config = RewriteConfig::with_default_namespace("");
    into_statement(sql, geo_group_by::rewrite_statement(sql, &config))
}
