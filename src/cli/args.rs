use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "genesis-migrate")]
#[command(about = "Migrate an exported genesis document to the current schema", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (can be repeated: -v, -vv)
    /// -v: Show debug output
    /// -vv: Show trace output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbosity")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the migration steps over an exported genesis document
    Migrate(MigrateArgs),

    /// List the migration steps
    Steps {
        /// First version to list
        #[arg(long)]
        from: Option<u32>,

        /// Last version to list
        #[arg(long)]
        to: Option<u32>,
    },

    /// Initialize a .genesis-migrate.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    /// Exported genesis document to migrate
    #[arg(long = "exported-genesis", value_name = "FILE")]
    pub exported_genesis: PathBuf,

    /// Freshly initialized genesis used by reconcile-template
    #[arg(long = "template-genesis", value_name = "FILE")]
    pub template_genesis: Option<PathBuf>,

    /// Chain id of the migrated chain
    #[arg(long = "chain-id", env = "GENESIS_CHAIN_ID")]
    pub chain_id: Option<String>,

    /// Genesis time of the migrated chain (RFC 3339)
    #[arg(long = "start-time", env = "GENESIS_START_TIME")]
    pub start_time: Option<String>,

    /// Staking bond denomination
    #[arg(long = "bond-denom")]
    pub bond_denom: Option<String>,

    /// Configuration file (defaults to a discovered .genesis-migrate.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// First step version to run
    #[arg(long, conflicts_with = "step")]
    pub from: Option<u32>,

    /// Last step version to run
    #[arg(long, conflicts_with = "step")]
    pub to: Option<u32>,

    /// Run a single step by name
    #[arg(long)]
    pub step: Option<String>,

    /// Log how long each step took
    #[arg(long)]
    pub timings: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Cli {
    Cli::parse()
}
