use crate::app::AppContext;
use crate::cli::catalogs::{CatalogsArgs, CatalogsOutputFormat};
use crate::error::CliError;
use crate::output;
use geosql_engine::ConnectParams;

pub fn run(context: &AppContext, args: CatalogsArgs) -> Result<(), CliError> {
    let profile = context.load_profile()?;
    let params = profile.adjust_connect_params(
        ConnectParams::default(),
        args.schema.as_deref(),
        args.catalog.as_deref(),
    );

    match args.format {
        CatalogsOutputFormat::Table => output::print_catalogs_table(&profile, &params),
        CatalogsOutputFormat::Json => output::print_catalogs_json(&profile, &params),
    }

    Ok(())
}
