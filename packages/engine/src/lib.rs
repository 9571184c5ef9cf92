//! Rewrites client SQL into the dialect of a geospatial query engine:
//! table references get the default namespace, double-quoted aliases become
//! backtick-quoted, and `GROUP BY` over serialized geometry is dropped.

mod backend;
mod config;
mod error;
mod executor;
mod lexer;
mod observe;
mod pipeline;
mod profile;

pub use backend::QueryTransport;
pub use config::RewriteConfig;
pub use error::GeosqlError;
pub use executor::{DialectRewriter, RewritingExecutor, StatementRewriter};
pub use observe::{LogObserver, RewriteObserver, RewriteTrace, RuleReport, RuleStatus, TraceEntry};
pub use pipeline::rules::{
    normalize_alias_quotes, qualify, sanitize_aggregate_aliases, strip_geo_group_by,
};
pub use pipeline::{RewriteRule, StatementPipeline};
pub use profile::{ConnectParams, EngineProfile};

/// Rewrites `sql` for the target engine, qualifying bare table references
/// with `default_namespace`. Never fails; text past the point where the
/// statement stops tokenizing is carried through with its whitespace
/// collapsed.
pub fn rewrite(sql: &str, default_namespace: &str) -> String {
    let config = RewriteConfig::with_default_namespace(default_namespace);
    StatementPipeline::new(&config).rewrite(sql)
}
