//! Command handlers for CLI subcommands
//!
//! This module contains the implementations for each CLI subcommand,
//! providing a clean separation between argument parsing and command execution.

mod migrate;
mod steps;

pub use migrate::{handle_migrate_command, selection};
pub use steps::{handle_steps_command, steps_table};

use crate::errors::MigrationError;
use colored::*;

/// Print an error and its causes to stderr.
///
/// Migration failures also report their error code and the failing step.
pub fn report_error(err: &anyhow::Error) {
    eprintln!("{} {}", "error:".red().bold(), err);
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".yellow(), cause);
    }

    if let Some(migration) = err.downcast_ref::<MigrationError>() {
        if let Some(step) = migration.failed_step() {
            eprintln!("  {} {}", "step:".bold(), step);
        }
        eprintln!("  {} {}", "code:".bold(), migration.code());
        if migration.is_user_fixable() {
            eprintln!("  {}", "check the input files and flags, then rerun".dimmed());
        }
    }
}
