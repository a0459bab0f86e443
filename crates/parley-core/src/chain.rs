//! Step chains: a strict left-fold of prompts and functions.
//!
//! Each step consumes the previous step's output as its input, so the
//! chain is inherently sequential. Steps are a closed enum built up
//! front; there is no way to construct a malformed step.

use crate::ask::{AskOptions, Dispatcher};
use crate::error::{ParleyError, Result};

/// A function step: plain string-to-string processing, no model call.
pub type StepFn = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// One unit of chain processing.
pub enum Step {
    /// A prompt template routed through the fallback dispatcher, with the
    /// current chain data as its merge input.
    Prompt {
        template: String,
        options: AskOptions,
    },
    /// A local function applied to the current chain data.
    Function(StepFn),
}

impl Step {
    /// A prompt step with default dispatch options.
    pub fn prompt(template: impl Into<String>) -> Self {
        Self::Prompt {
            template: template.into(),
            options: AskOptions::default(),
        }
    }

    /// A prompt step with per-step dispatch options (model override,
    /// media attachments). The `data` field is ignored; the chain always
    /// supplies the current data.
    pub fn prompt_with(template: impl Into<String>, options: AskOptions) -> Self {
        Self::Prompt {
            template: template.into(),
            options,
        }
    }

    /// A function step.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self::Function(Box::new(f))
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Prompt { template, .. } => f.debug_tuple("Prompt").field(template).finish(),
            Step::Function(_) => f.write_str("Function"),
        }
    }
}

impl Dispatcher {
    /// Fold `steps` over `data`, strictly in order: each step's output is
    /// the next step's input, and the final step's output is returned.
    pub async fn ask_chain(&self, data: &str, steps: &[Step]) -> Result<String> {
        let mut current = data.to_string();
        for (index, step) in steps.iter().enumerate() {
            tracing::debug!(step = index, "processing chain step");
            current = match step {
                Step::Prompt { template, options } => {
                    let step_options = AskOptions {
                        data: Some(current),
                        models: options.models.clone(),
                        media: options.media.clone(),
                    };
                    self.ask(template, &step_options).await?
                }
                Step::Function(f) => f(&current)?,
            };
        }
        Ok(current)
    }
}
