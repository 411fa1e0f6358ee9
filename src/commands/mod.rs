//! Commands that manage the working directory rather than run migrations.
//!
//! - **init**: Write a `.genesis-migrate.toml` with the built-in defaults

pub mod init;

pub use init::init_config;
