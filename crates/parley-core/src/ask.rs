//! The fallback dispatcher.
//!
//! [`Dispatcher::ask`] merges optional input data into the prompt,
//! prepares any media attachments, then walks the candidate model list in
//! order until one succeeds.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ConfigError, ParleyError, Result};
use crate::llm::invoke;
use crate::llm::{DefaultResolver, ModelResolver, RetryPolicy};
use crate::media;

/// Literal marker replaced by the input data when present in a prompt.
pub const INPUT_MARKER: &str = "$input";

/// Per-call options for [`Dispatcher::ask`].
#[derive(Debug, Clone, Default)]
pub struct AskOptions {
    /// Input data merged into the prompt (marker substitution or tagged
    /// append)
    pub data: Option<String>,
    /// Candidate model ids tried in order. `None` uses the configured
    /// fallback list; an explicitly empty list is a configuration error.
    pub models: Option<Vec<String>>,
    /// Media files prepared and attached before any model is tried
    pub media: Vec<PathBuf>,
}

/// Entry point for prompt dispatch. Cheap to clone; the batch runner
/// clones it into worker tasks.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<Config>,
    resolver: Arc<dyn ModelResolver>,
}

impl Dispatcher {
    /// Create a dispatcher with the built-in model routing.
    pub fn new(config: Config) -> Self {
        Self::with_resolver(config, Arc::new(DefaultResolver::new()))
    }

    /// Create a dispatcher with custom model routing.
    pub fn with_resolver(config: Config, resolver: Arc<dyn ModelResolver>) -> Self {
        Self {
            config: Arc::new(config),
            resolver,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send a prompt, trying each candidate model in order and returning
    /// the first success.
    ///
    /// A media preparation failure aborts the whole call before any model
    /// is tried. When every candidate fails, the error names the last
    /// failure encountered.
    pub async fn ask(&self, prompt: &str, options: &AskOptions) -> Result<String> {
        let merged = merge_prompt(prompt, options.data.as_deref());

        let candidates: &[String] = match &options.models {
            None => &self.config.models.fallback,
            Some(list) if list.is_empty() => {
                return Err(ConfigError::Validation(
                    "explicit model candidate list must not be empty".into(),
                )
                .into());
            }
            Some(list) => list,
        };

        let mut attachments = Vec::with_capacity(options.media.len());
        for path in &options.media {
            attachments.push(media::prepare(path, self.config.media.max_dimension).await?);
        }

        let policy = RetryPolicy::from_config(&self.config.models);
        let mut last_error = None;
        for model_id in candidates {
            match invoke::try_model(
                self.resolver.as_ref(),
                &merged,
                model_id,
                &attachments,
                &policy,
            )
            .await
            {
                Ok(text) => return Ok(text),
                Err(e) => {
                    tracing::warn!(model = %model_id, "model invocation failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        let Some(last) = last_error else {
            return Err(ConfigError::Validation("no candidate models configured".into()).into());
        };
        Err(ParleyError::ModelsExhausted {
            attempts: candidates.len(),
            last,
        })
    }
}

/// Merge input data into the prompt: substitute the `$input` marker if
/// the prompt carries one, otherwise append the data in an `<input>` tag.
fn merge_prompt(prompt: &str, data: Option<&str>) -> String {
    match data {
        None => prompt.to_string(),
        Some(data) if prompt.contains(INPUT_MARKER) => prompt.replace(INPUT_MARKER, data),
        Some(data) => format!("{prompt}:\n\n<input>{data}</input>"),
    }
}
