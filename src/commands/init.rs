use crate::config::{MigrateConfig, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const HEADER: &str = "# genesis-migrate configuration
#
# Command-line flags override [chain]. Every other table supplies the
# literals the migration steps inject.

";

/// Render the default configuration as a commented TOML document.
pub fn default_config_text() -> Result<String> {
    let body = toml::to_string_pretty(&MigrateConfig::default())
        .context("failed to serialize default configuration")?;
    Ok(format!("{HEADER}{body}"))
}

/// Write the default configuration into `dir`.
pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, default_config_text()?)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(())
}

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)
}
