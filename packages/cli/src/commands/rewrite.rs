use crate::app::AppContext;
use crate::cli::rewrite::{RewriteArgs, RewriteOutputFormat};
use crate::error::CliError;
use crate::output;
use geosql_engine::{RewriteTrace, StatementPipeline};
use std::io::Read;

pub fn run(context: &AppContext, args: RewriteArgs) -> Result<(), CliError> {
    let sql = resolve_sql(&args)?;
    let profile = context.load_profile()?;
    let namespace = args.namespace.as_deref().filter(|ns| !ns.is_empty());
    let config = profile.rewrite_config(namespace);

    let mut trace = RewriteTrace::default();
    let rewritten = StatementPipeline::new(&config).rewrite_observed(&sql, &mut trace);

    match args.format {
        RewriteOutputFormat::Sql => println!("{rewritten}"),
        RewriteOutputFormat::Json => output::print_rewrite_json(&sql, &rewritten, &trace),
        RewriteOutputFormat::Table => output::print_rewrite_table(&rewritten, &trace),
    }

    Ok(())
}

fn resolve_sql(args: &RewriteArgs) -> Result<String, CliError> {
    if args.sql == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(|source| CliError::io("failed to read SQL from stdin", source))?;
        if input.trim().is_empty() {
            return Err(CliError::InvalidArgs("stdin SQL input is empty"));
        }
        return Ok(input);
    }

    if args.sql.trim().is_empty() {
        return Err(CliError::InvalidArgs("SQL input is empty"));
    }
    Ok(args.sql.clone())
}
