pub(crate) mod registry;
pub(crate) mod rules;
mod statement_pipeline;

pub use registry::RewriteRule;
pub use statement_pipeline::StatementPipeline;
