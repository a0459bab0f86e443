//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.models.fallback.is_empty() {
            return Err(ConfigError::Validation(
                "models.fallback must list at least one model id".into(),
            ));
        }
        if self.models.fallback.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "models.fallback must not contain blank model ids".into(),
            ));
        }
        if self.models.retry_base_delay_ms == 0 {
            return Err(ConfigError::Validation(
                "models.retry_base_delay_ms must be > 0".into(),
            ));
        }
        if self.models.retry_max_delay_ms < self.models.retry_base_delay_ms {
            return Err(ConfigError::Validation(
                "models.retry_max_delay_ms must be >= retry_base_delay_ms".into(),
            ));
        }
        if self.media.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "media.max_dimension must be > 0".into(),
            ));
        }
        if self.batch.workers == Some(0) {
            return Err(ConfigError::Validation(
                "batch.workers must be > 0 when set".into(),
            ));
        }
        Ok(())
    }
}
