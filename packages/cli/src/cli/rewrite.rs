use clap::{Args, ValueEnum};

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum RewriteOutputFormat {
    Sql,
    Json,
    Table,
}

#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// Namespace for unqualified table references. Defaults to the profile's
    /// default catalog.
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Output format. `json` and `table` include the per-rule trace.
    #[arg(long, value_enum, default_value_t = RewriteOutputFormat::Sql)]
    pub format: RewriteOutputFormat,

    /// SQL statement to rewrite. Use '-' to read from stdin.
    pub sql: String,
}
