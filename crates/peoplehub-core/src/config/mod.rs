//! Configuration file support.
//!
//! A config file is TOML with two optional sections:
//!
//! ```toml
//! [database]
//! path = "peoplehub.db"
//!
//! [assistant]
//! timeout_per_action_ms = 10000
//! max_parallel = 8
//! enforce_task_ownership = false
//! history_limit = 20
//! temperature = 0.2
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable overriding `database.path`.
pub const ENV_DATABASE: &str = "PEOPLEHUB_DATABASE";
/// Environment variable overriding `assistant.timeout_per_action_ms`.
pub const ENV_ACTION_TIMEOUT_MS: &str = "PEOPLEHUB_ACTION_TIMEOUT_MS";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "peoplehub.db".to_string() }
    }
}

/// Assistant pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Upper bound on a single action's execution.
    pub timeout_per_action_ms: u64,
    /// Maximum actions executing at once; `0` means unbounded.
    pub max_parallel: usize,
    /// Restrict `update_task` to the assignee or creator.
    pub enforce_task_ownership: bool,
    /// Chat messages kept per session.
    pub history_limit: usize,
    /// Sampling temperature passed to the model.
    pub temperature: f32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            timeout_per_action_ms: 10_000,
            max_parallel: 0,
            enforce_task_ownership: false,
            history_limit: 20,
            temperature: 0.2,
        }
    }
}

impl AssistantConfig {
    /// Per-action timeout as a `Duration`.
    pub fn timeout_per_action(&self) -> Duration {
        Duration::from_millis(self.timeout_per_action_ms)
    }

    /// Parallelism cap, `None` when unbounded.
    pub fn max_parallel(&self) -> Option<usize> {
        (self.max_parallel > 0).then_some(self.max_parallel)
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `[database]` section.
    pub database: DatabaseConfig,
    /// `[assistant]` section.
    pub assistant: AssistantConfig,
}

impl AppConfig {
    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    /// * `ConfigError::ParseError` - If the TOML is malformed
    /// * `ConfigError::InvalidValue` - If a value is out of range
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// * `ConfigError::NotFound` - If the file does not exist
    /// * `ConfigError::ReadError` - If the file cannot be read
    /// * `ConfigError::ParseError` - If the TOML is malformed
    pub fn load_from_toml(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::ParseError(msg) => {
                ConfigError::ParseError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".peoplehub.toml")
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".peoplehub")
            .join("config.toml")
    }

    /// Discovers and loads configuration.
    ///
    /// The first readable file of `./.peoplehub.toml` and
    /// `~/.peoplehub/config.toml` wins; defaults apply otherwise.
    /// Environment overrides are applied last.
    pub fn discover_and_load() -> Self {
        let mut config = [Self::default_local_path(), Self::default_global_path()]
            .iter()
            .find_map(|path| match Self::load_from_toml(path) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded configuration");
                    Some(config)
                }
                Err(ConfigError::NotFound(_)) => None,
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable configuration");
                    None
                }
            })
            .unwrap_or_default();

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Applies `PEOPLEHUB_*` overrides read through `lookup`.
    ///
    /// Unparsable values are logged and skipped.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATABASE).filter(|p| !p.trim().is_empty()) {
            self.database.path = path;
        }
        if let Some(raw) = lookup(ENV_ACTION_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.assistant.timeout_per_action_ms = ms,
                _ => warn!(value = %raw, "Ignoring invalid {}", ENV_ACTION_TIMEOUT_MS),
            }
        }
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// * `ConfigError::InvalidValue` - If a value is out of range
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue("database.path must not be empty".to_string()));
        }
        if self.assistant.timeout_per_action_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "assistant.timeout_per_action_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.assistant.temperature) {
            return Err(ConfigError::InvalidValue(format!(
                "assistant.temperature {} is outside 0.0..=2.0",
                self.assistant.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database.path, "peoplehub.db");
        assert_eq!(config.assistant.timeout_per_action(), Duration::from_secs(10));
        assert_eq!(config.assistant.max_parallel(), None);
        assert!(!config.assistant.enforce_task_ownership);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [assistant]
            max_parallel = 4
            enforce_task_ownership = true
            "#,
        )
        .unwrap();

        assert_eq!(config.assistant.max_parallel(), Some(4));
        assert!(config.assistant.enforce_task_ownership);
        assert_eq!(config.assistant.history_limit, 20);
        assert_eq!(config.database.path, "peoplehub.db");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AppConfig::from_toml_str("[assistant]\ntimeout_per_action_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = AppConfig::from_toml_str("[assistant\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database]\npath = \"/tmp/hr.db\"\n").unwrap();

        let config = AppConfig::load_from_toml(&path).unwrap();
        assert_eq!(config.database.path, "/tmp/hr.db");

        let missing = AppConfig::load_from_toml(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> =
            [(ENV_DATABASE, ":memory:"), (ENV_ACTION_TIMEOUT_MS, "250")].into_iter().collect();

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.assistant.timeout_per_action(), Duration::from_millis(250));
    }

    #[test]
    fn test_bad_env_timeout_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| (key == ENV_ACTION_TIMEOUT_MS).then(|| "soon".to_string()));
        assert_eq!(config.assistant.timeout_per_action_ms, 10_000);
    }
}
