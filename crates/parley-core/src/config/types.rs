//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Model ids tried in order when the caller supplies none.
pub const DEFAULT_FALLBACK_MODELS: [&str; 4] = [
    "gpt-4o-mini",
    "openrouter/google/gemini-flash-1.5",
    "openrouter/openai/gpt-4o-mini",
    "claude-3-haiku-20240307",
];

/// Model selection and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Ordered fallback list; the first model that succeeds wins
    pub fallback: Vec<String>,

    /// Retries after the initial attempt for transient failures
    pub retry_attempts: u32,

    /// Base backoff delay in milliseconds (doubles per retry)
    pub retry_base_delay_ms: u64,

    /// Backoff cap in milliseconds
    pub retry_max_delay_ms: u64,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_FALLBACK_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            retry_attempts: 1,
            retry_base_delay_ms: 4000,
            retry_max_delay_ms: 10_000,
        }
    }
}

/// Media attachment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Bounding box (width and height) images are downsampled to fit
    pub max_dimension: u32,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self { max_dimension: 512 }
    }
}

/// Batch fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker count; absent means available parallelism
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
