use super::catalogs::CatalogsArgs;
use super::rewrite::RewriteArgs;
use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "geosql")]
#[command(about = "Rewrite SQL for a geospatial query engine")]
pub struct Cli {
    /// Path to an engine profile (JSON). Defaults to the built-in profile.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rewrite a SQL statement into the engine dialect.
    Rewrite(RewriteArgs),
    /// List the catalogs known to the engine profile.
    Catalogs(CatalogsArgs),
}
