//! Ollama backend for local model inference.
//!
//! Talks to a local Ollama instance via its HTTP API. No authentication
//! required. Media support depends on the model actually being a vision
//! model, gated by name.

use super::provider::{LlmProvider, PromptRequest, PromptResponse};
use crate::error::InvokeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const VISION_MODEL_MARKERS: [&str; 4] = ["llava", "bakllava", "vision", "moondream"];

#[derive(Debug)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn api_error(&self, message: String, status_code: Option<u16>) -> InvokeError {
        InvokeError::Api {
            model: self.model.clone(),
            message,
            status_code,
        }
    }
}

/// Ollama /api/generate request body.
#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    images: Vec<String>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama /api/generate response.
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn supports_media(&self) -> bool {
        let model = self.model.to_ascii_lowercase();
        VISION_MODEL_MARKERS.iter().any(|m| model.contains(m))
    }

    async fn complete(&self, request: &PromptRequest) -> Result<PromptResponse, InvokeError> {
        let url = format!("{}/api/generate", self.endpoint);
        let start = Instant::now();

        let body = GenerateRequest {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            images: request.attachments.iter().map(|a| a.data.clone()).collect(),
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| self.api_error(format!("Ollama request failed: {e}"), None))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(self.api_error(
                format!("Ollama HTTP {status}: {text}"),
                Some(status.as_u16()),
            ));
        }

        let generate_resp: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| self.api_error(format!("Failed to parse Ollama response: {e}"), None))?;

        Ok(PromptResponse {
            text: generate_resp.response.trim().to_string(),
            model: self.model.clone(),
            tokens_used: None, // generate endpoint doesn't report token counts
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        // Local models can be slow
        Duration::from_secs(120)
    }
}
