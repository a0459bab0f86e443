//! Configuration management for parley.
//!
//! Configuration is loaded from a `config.toml` in the platform config
//! directory with sensible defaults for every section.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for parley.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model selection and retry settings
    pub models: ModelsConfig,

    /// Media attachment settings
    pub media: MediaConfig,

    /// Batch fan-out settings
    pub batch: BatchConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories (XDG on Linux, Application
    /// Support on macOS) and falls back to `~/.parley/config.toml` if
    /// directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "parley", "parley")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".parley").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.models.fallback.len(), 4);
        assert_eq!(config.models.fallback[0], "gpt-4o-mini");
        assert_eq!(config.models.retry_attempts, 1);
        assert_eq!(config.media.max_dimension, 512);
        assert_eq!(config.batch.workers, None);
    }

    #[test]
    fn config_to_toml() {
        let toml = Config::default().to_toml().unwrap();
        assert!(toml.contains("[models]"));
        assert!(toml.contains("[media]"));
        assert!(toml.contains("[logging]"));
    }

    #[test]
    fn load_from_file_with_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[models]\nfallback = [\"claude-3-haiku-20240307\"]").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.models.fallback, vec!["claude-3-haiku-20240307"]);
        // Unspecified sections keep their defaults
        assert_eq!(config.media.max_dimension, 512);
    }

    #[test]
    fn load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[media]\nmax_dimension = 0").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
