use serde::Serialize;

use crate::{GeosqlError, RewriteConfig};

use super::rules::{aggregate_alias, alias_quotes, geo_group_by, namespace_qualifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteRule {
    NamespaceQualifier,
    AggregateAliasSanitizer,
    AliasQuoteNormalizer,
    GeoAggregationStripper,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RuleOutcome {
    NotApplicable,
    NoChange,
    Changed(String),
}

/// Order is part of the contract: qualification runs first and the
/// geometry stripper, which normalizes whitespace, runs last.
const STATEMENT_RULES: &[RewriteRule] = &[
    RewriteRule::NamespaceQualifier,
    RewriteRule::AggregateAliasSanitizer,
    RewriteRule::AliasQuoteNormalizer,
    RewriteRule::GeoAggregationStripper,
];

pub(crate) fn statement_rules() -> &'static [RewriteRule] {
    STATEMENT_RULES
}

impl RuleOutcome {
    pub(crate) fn from_rewrite(original: &str, rewritten: String) -> Self {
        if rewritten == original {
            Self::NoChange
        } else {
            Self::Changed(rewritten)
        }
    }
}

impl RewriteRule {
    pub const fn name(self) -> &'static str {
        match self {
            Self::NamespaceQualifier => "namespace_qualifier",
            Self::AggregateAliasSanitizer => "aggregate_alias_sanitizer",
            Self::AliasQuoteNormalizer => "alias_quote_normalizer",
            Self::GeoAggregationStripper => "geo_aggregation_stripper",
        }
    }

    /// Cheap textual pre-check so statements that cannot match skip lexing.
    pub(crate) fn matches_context(self, sql: &str, config: &RewriteConfig) -> bool {
        match self {
            Self::NamespaceQualifier => {
                if config.default_namespace.is_empty() {
                    return false;
                }
                let lowered = sql.to_ascii_lowercase();
                lowered.contains("from") || lowered.contains("join") || lowered.contains("in")
            }
            Self::AggregateAliasSanitizer => {
                config.sanitize_aggregate_aliases && sql.contains('(')
            }
            Self::AliasQuoteNormalizer => sql.contains('"'),
            Self::GeoAggregationStripper => !sql.is_empty(),
        }
    }

    pub(crate) fn apply(
        self,
        sql: &str,
        config: &RewriteConfig,
    ) -> Result<RuleOutcome, GeosqlError> {
        if !self.matches_context(sql, config) {
            return Ok(RuleOutcome::NotApplicable);
        }

        match self {
            Self::NamespaceQualifier => namespace_qualifier::rewrite_statement(sql, config),
            Self::AggregateAliasSanitizer => aggregate_alias::rewrite_statement(sql),
            Self::AliasQuoteNormalizer => alias_quotes::rewrite_statement(sql),
            Self::GeoAggregationStripper => geo_group_by::rewrite_statement(sql, config),
        }
    }
}
