//! CLI module for genesis-migrate
//!
//! This module provides the command-line interface, including:
//! - Argument parsing (`args`)
//! - Command handlers (`commands`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod commands;
pub mod setup;

// Re-export commonly used types for convenience
pub use args::{Cli, Commands, MigrateArgs};
pub use commands::{handle_migrate_command, handle_steps_command, report_error};
pub use setup::{init_logging, log_directive};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
