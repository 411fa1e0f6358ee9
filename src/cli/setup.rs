//! Setup and initialization functions for the CLI
//!
//! Logging goes to stderr so that stdout carries nothing but the migrated
//! document.

use tracing_subscriber::EnvFilter;

const CRATE_TARGET: &str = "genesis_migrate";

/// Filter directive implied by `-v` / `-q`, if any.
///
/// Without either flag `RUST_LOG` decides, falling back to info.
pub fn log_directive(verbosity: u8, quiet: bool) -> Option<String> {
    let level = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => return None,
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    Some(format!("{CRATE_TARGET}={level}"))
}

fn env_filter(verbosity: u8, quiet: bool) -> EnvFilter {
    match log_directive(verbosity, quiet) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{CRATE_TARGET}=info"))),
    }
}

/// Install the global tracing subscriber. Later calls are ignored.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        eprintln!("Note: logging already configured: {}", e);
    }
}
