//! LLM provider trait and request/response types.
//!
//! Each backend implements [`LlmProvider`]; the dispatcher only ever sees
//! boxed trait objects handed out by a [`ModelResolver`](super::registry::ModelResolver).

use crate::error::InvokeError;
use crate::media::Attachment;
use async_trait::async_trait;
use std::time::Duration;

/// Token ceiling applied to every request.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Sampling temperature applied to every request.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A prompt submission, with any prepared media attachments.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    /// The fully merged prompt text
    pub prompt: String,
    /// Prepared media payloads (empty for text-only prompts)
    pub attachments: Vec<Attachment>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            prompt: prompt.into(),
            attachments,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// The response from a completed model call.
#[derive(Debug, Clone)]
pub struct PromptResponse {
    /// Generated text (may be empty; the invoker rejects empty results)
    pub text: String,
    /// Model identifier as reported by the backend
    pub model: String,
    /// Total tokens used, if the backend reports them
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the resolver hands out `Box<dyn LlmProvider>`).
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    /// Backend name for logging (e.g., "anthropic", "openrouter").
    fn name(&self) -> &str;

    /// The model this provider instance targets.
    fn model(&self) -> &str;

    /// Whether the model accepts media attachments.
    fn supports_media(&self) -> bool;

    /// Submit the prompt and return the model's response.
    async fn complete(&self, request: &PromptRequest) -> Result<PromptResponse, InvokeError>;

    /// Per-request timeout for this backend.
    fn timeout(&self) -> Duration;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_applies_defaults() {
        let request = PromptRequest::new("hello", Vec::new());
        assert_eq!(request.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
        assert!(request.attachments.is_empty());
    }
}
