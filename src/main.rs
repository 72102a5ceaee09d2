use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::CheckArgs;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose, cli.quiet);

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Check {
            paths,
            format,
            output,
            exit_zero,
            fail_fast,
        } => {
            let args = CheckArgs {
                paths,
                format,
                output,
                exit_zero,
                fail_fast,
            };
            commands::handle_check(args, config_path, cli.quiet, cli.verbose)
        }
        Commands::Templates { format } => {
            commands::handle_templates(format, config_path)
        }
        Commands::Config { show, validate } => {
            commands::handle_config(show, validate, cli.quiet, config_path)
        }
        Commands::Init => {
            commands::handle_init(cli.quiet)
        }
    }
}
