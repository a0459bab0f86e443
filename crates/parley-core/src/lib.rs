//! parley-core - LLM orchestration with model fallback.
//!
//! parley sends prompts to one of several configured models, falling back
//! through an ordered candidate list until one succeeds. On top of that
//! single primitive it offers step chains (each step's output feeds the
//! next), parallel batch dispatch, and two enrichment actions that feed
//! external API responses into an LLM summary.
//!
//! # Usage
//!
//! ```rust,ignore
//! use parley_core::{AskOptions, Config, Dispatcher};
//!
//! #[tokio::main]
//! async fn main() -> parley_core::Result<()> {
//!     let dispatcher = Dispatcher::new(Config::load()?);
//!     let answer = dispatcher.ask("Name three rust crates", &AskOptions::default()).await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod actions;
pub mod ask;
pub mod batch;
pub mod chain;
pub mod config;
pub mod credentials;
pub mod error;
pub mod llm;
pub mod media;

// Re-exports for convenient access
pub use actions::{run_action, ActionConfig, ActionKind, ActionParams, ActionReport};
pub use ask::{AskOptions, Dispatcher, INPUT_MARKER};
pub use chain::{Step, StepFn};
pub use config::Config;
pub use credentials::ApiCredentials;
pub use error::{ConfigError, InvokeError, MediaError, ParleyError, Result};
pub use llm::{LlmProvider, ModelResolver, PromptRequest, PromptResponse};
pub use media::Attachment;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn dispatcher_exposes_its_config() {
        let dispatcher = Dispatcher::new(Config::default());
        assert_eq!(dispatcher.config().media.max_dimension, 512);
    }
}
