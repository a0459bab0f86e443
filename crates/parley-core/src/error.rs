//! Error types for the parley orchestration pipeline.
//!
//! Errors are organized by domain so callers get actionable messages with
//! the relevant context attached (file paths, model ids, prompt indices).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for parley operations.
#[derive(Error, Debug)]
pub enum ParleyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Media preparation errors
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Single-model invocation errors
    #[error("Invocation error: {0}")]
    Invoke(#[from] InvokeError),

    /// Every candidate model in the fallback list failed
    #[error("all {attempts} candidate models failed; last error: {last}")]
    ModelsExhausted { attempts: usize, last: InvokeError },

    /// A batch worker failed, aborting the whole batch
    #[error("batch processing failed at prompt {index}: {message}")]
    Batch { index: usize, message: String },

    /// An action handler failed (external API call or response handling)
    #[error("action failed: {message}")]
    Action {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// A required API credential is not set in any source
    #[error("{0} is required but not set (checked environment and .env file)")]
    MissingCredential(&'static str),

    /// A required action parameter is absent
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Media preparation errors. Each variant carries the offending path.
#[derive(Error, Debug)]
pub enum MediaError {
    /// The media file does not exist
    #[error("media file not found: {0}")]
    NotFound(PathBuf),

    /// The file extension denotes no supported media format
    #[error("unsupported media type \"{extension}\" for {path}")]
    UnsupportedType { path: PathBuf, extension: String },

    /// Video frame extraction is not supported
    #[error("video attachments are not supported: {0}")]
    VideoUnsupported(PathBuf),

    /// The file exists but could not be decoded or re-encoded
    #[error("media processing error for {path}: {message}")]
    Processing { path: PathBuf, message: String },
}

/// Errors from invoking a single model. The fallback dispatcher recovers
/// from these by moving on to the next candidate.
#[derive(Error, Debug)]
pub enum InvokeError {
    /// The model id could not be routed to any provider
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// Attachments were supplied but the model is text-only
    #[error("model {0} does not support media attachments")]
    UnsupportedMedia(String),

    /// The model answered with no text content
    #[error("model {0} returned an empty response")]
    EmptyResponse(String),

    /// The underlying API call failed
    #[error("model {model} call failed: {message}")]
    Api {
        model: String,
        message: String,
        status_code: Option<u16>,
    },
}

/// Convenience type alias for parley results.
pub type Result<T> = std::result::Result<T, ParleyError>;
