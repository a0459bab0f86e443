//! Model-id routing.
//!
//! The fallback list holds opaque model ids; [`DefaultResolver`] routes
//! each id to a backend by its shape and reads the backend's API key from
//! the environment at resolve time. The [`ModelResolver`] trait is the
//! seam where tests (or embedders with custom backends) plug in their own
//! routing.

use super::anthropic::AnthropicProvider;
use super::ollama::OllamaProvider;
use super::openai::OpenAiProvider;
use super::openrouter::OpenRouterProvider;
use super::provider::LlmProvider;
use crate::error::InvokeError;

const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";
const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
const OPENROUTER_KEY_VAR: &str = "OPENROUTER_API_KEY";

const OLLAMA_HOST_VAR: &str = "OLLAMA_HOST";
const OLLAMA_DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Maps an opaque model id to a backend provider.
pub trait ModelResolver: Send + Sync {
    /// Resolve a model id to a provider, or fail with
    /// [`InvokeError::UnknownModel`] if no backend claims it.
    fn resolve(&self, model_id: &str) -> Result<Box<dyn LlmProvider>, InvokeError>;
}

/// Routes model ids by prefix to the built-in HTTP backends.
#[derive(Debug, Default)]
pub struct DefaultResolver;

impl DefaultResolver {
    pub fn new() -> Self {
        Self
    }

    fn require_key(model_id: &str, var: &str) -> Result<String, InvokeError> {
        std::env::var(var)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| InvokeError::Api {
                model: model_id.to_string(),
                message: format!("{var} is not set"),
                status_code: None,
            })
    }
}

impl ModelResolver for DefaultResolver {
    fn resolve(&self, model_id: &str) -> Result<Box<dyn LlmProvider>, InvokeError> {
        if let Some(model) = model_id.strip_prefix("openrouter/") {
            let key = Self::require_key(model_id, OPENROUTER_KEY_VAR)?;
            return Ok(Box::new(OpenRouterProvider::new(&key, model)));
        }
        if let Some(model) = model_id.strip_prefix("ollama/") {
            let endpoint = std::env::var(OLLAMA_HOST_VAR)
                .unwrap_or_else(|_| OLLAMA_DEFAULT_ENDPOINT.to_string());
            return Ok(Box::new(OllamaProvider::new(&endpoint, model)));
        }
        if model_id.starts_with("claude") {
            let key = Self::require_key(model_id, ANTHROPIC_KEY_VAR)?;
            return Ok(Box::new(AnthropicProvider::new(&key, model_id)));
        }
        if ["gpt", "o1", "o3", "chatgpt"]
            .iter()
            .any(|p| model_id.starts_with(p))
        {
            let key = Self::require_key(model_id, OPENAI_KEY_VAR)?;
            return Ok(Box::new(OpenAiProvider::new(&key, model_id)));
        }
        Err(InvokeError::UnknownModel(model_id.to_string()))
    }
}
