use clap::{Args, ValueEnum};

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CatalogsOutputFormat {
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct CatalogsArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = CatalogsOutputFormat::Table)]
    pub format: CatalogsOutputFormat,

    /// Schema to connect to; shown in the resulting connection parameters.
    #[arg(long)]
    pub schema: Option<String>,

    /// Catalog to connect to instead of the default catalog.
    #[arg(long)]
    pub catalog: Option<String>,
}
