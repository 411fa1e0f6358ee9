use anyhow::Result;
use genesis_migrate::cli::{self, Commands};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbosity, cli.quiet);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            cli::report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Migrate(args) => cli::handle_migrate_command(args),
        Commands::Steps { from, to } => cli::handle_steps_command(from, to),
        Commands::Init { force } => genesis_migrate::commands::init::init_config(force),
    }
}
