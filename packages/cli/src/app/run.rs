use super::context::AppContext;
use crate::cli::root::{Cli, Command};
use crate::commands;
use crate::error::CliError;
use clap::Parser;

pub fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let context = AppContext {
        config_path: cli.config,
    };

    match cli.command {
        Command::Rewrite(args) => commands::rewrite::run(&context, args),
        Command::Catalogs(args) => commands::catalogs::run(&context, args),
    }
}
