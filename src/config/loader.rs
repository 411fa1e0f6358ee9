use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::MigrateConfig;
use super::validation::validate_config;
use crate::errors::{MigrationError, Result};

pub const CONFIG_FILE_NAME: &str = ".genesis-migrate.toml";

/// Read a config file's contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<MigrateConfig> {
    let config = toml::from_str::<MigrateConfig>(contents).map_err(|e| {
        MigrationError::config(format!("failed to parse {CONFIG_FILE_NAME}: {e}"))
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Load an explicitly requested config file. Absence is an error.
pub fn load_config_from(path: &Path) -> Result<MigrateConfig> {
    let contents = read_config_file(path).map_err(|e| MigrationError::io(path, e))?;
    let config = parse_and_validate_config(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Generate a directory and its ancestors, up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find `.genesis-migrate.toml` in `start` or one of its ancestors.
///
/// Files that exist but fail to parse or validate are errors; a run should
/// never silently fall back to defaults over a broken config.
pub fn discover_config(start: PathBuf) -> Result<MigrateConfig> {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    for path in directory_ancestors(start, MAX_TRAVERSAL_DEPTH).map(|d| d.join(CONFIG_FILE_NAME)) {
        match read_config_file(&path) {
            Ok(contents) => {
                let config = parse_and_validate_config(&contents)?;
                tracing::debug!("Loaded config from {}", path.display());
                return Ok(config);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {}", path.display(), e);
                return Err(MigrationError::io(path, e));
            }
        }
    }

    tracing::debug!(
        "No config found after checking {} directories. Using default config.",
        MAX_TRAVERSAL_DEPTH
    );
    Ok(MigrateConfig::default())
}

/// Load the explicit config if given, otherwise discover one from the
/// current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<MigrateConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }
    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            tracing::warn!("Failed to get current directory: {}. Using default config.", e);
            Ok(MigrateConfig::default())
        }
    }
}
