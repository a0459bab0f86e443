//! OpenRouter backend (OpenAI-compatible gateway).
//!
//! OpenRouter speaks the same Chat Completions format as OpenAI, so this
//! delegates to `OpenAiProvider` with the gateway endpoint.

use super::openai::OpenAiProvider;
use super::provider::{LlmProvider, PromptRequest, PromptResponse};
use crate::error::InvokeError;
use async_trait::async_trait;
use std::time::Duration;

const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

#[derive(Debug)]
pub struct OpenRouterProvider {
    inner: OpenAiProvider,
}

impl OpenRouterProvider {
    /// `model` is the gateway-side id, without the `openrouter/` prefix.
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            inner: OpenAiProvider::with_endpoint(api_key, model, OPENROUTER_ENDPOINT),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    fn supports_media(&self) -> bool {
        true
    }

    async fn complete(&self, request: &PromptRequest) -> Result<PromptResponse, InvokeError> {
        self.inner.complete(request).await
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}
