//! CLI configuration loading and merging.

use anyhow::{Context, Result};
use peoplehub_core::AppConfig;
use std::path::Path;

/// Load and merge configuration.
///
/// Precedence, highest first:
/// 1. `--database`
/// 2. Environment variables (`PEOPLEHUB_DATABASE`, `PEOPLEHUB_ACTION_TIMEOUT_MS`)
/// 3. `--config` file, or the first of ./.peoplehub.toml and ~/.peoplehub/config.toml
/// 4. Defaults
pub fn load_config(path: Option<&Path>, database: Option<String>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => {
            let mut config = AppConfig::load_from_toml(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.apply_env_overrides(|key| std::env::var(key).ok());
            config
        }
        None => AppConfig::discover_and_load(),
    };

    if let Some(database) = database {
        config.database.path = database;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
