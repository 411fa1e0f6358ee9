//! Configuration for genesis migration.
//!
//! Runtime parameters (chain id, start time, bond denomination) come from
//! command-line flags, then `.genesis-migrate.toml`, then built-in defaults.
//! The file also carries the literal admin lists, addresses and rates the
//! migrations inject, so they can be changed without a rebuild.

mod core;
mod loader;
pub mod validation;

pub use self::core::{
    AccountConfig, AdminConfig, ChainConfig, DenominationConfig, MigrateConfig, RewardConfig,
    DEFAULT_BOND_DENOM, DEFAULT_CHAIN_ID, DEFAULT_START_TIME,
};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use validation::{validate_config, ConfigIssue, MigrationParams, ParamOverrides};
