//! Configurable mock resolver and provider shared by the orchestration
//! tests. Behaviors are per-call-index closures so a test can script
//! different results per attempt; call counts, invocation order, and
//! received prompts are all observable through shared handles.

use super::provider::{LlmProvider, PromptRequest, PromptResponse};
use super::registry::ModelResolver;
use crate::error::InvokeError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type BehaviorFn =
    dyn Fn(u32, &PromptRequest) -> Result<String, (Option<u16>, String)> + Send + Sync;
type DelayFn = dyn Fn(&str) -> Duration + Send + Sync;

/// Scripted behavior for one mock model id.
pub(crate) struct MockModel {
    behavior: Arc<BehaviorFn>,
    supports_media: bool,
    delay_for: Option<Arc<DelayFn>>,
    /// Number of `complete` calls made against this model.
    pub calls: Arc<AtomicU32>,
    /// Every prompt this model received, in call order.
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl MockModel {
    fn with_behavior(behavior: Arc<BehaviorFn>) -> Self {
        Self {
            behavior,
            supports_media: true,
            delay_for: None,
            calls: Arc::new(AtomicU32::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always succeed with a fixed response.
    pub fn ok(text: &str) -> Self {
        let text = text.to_string();
        Self::with_behavior(Arc::new(move |_, _| Ok(text.clone())))
    }

    /// Always fail with the given status and message.
    pub fn fail(status_code: Option<u16>, message: &str) -> Self {
        let message = message.to_string();
        Self::with_behavior(Arc::new(move |_, _| Err((status_code, message.clone()))))
    }

    /// First call fails, subsequent calls succeed.
    pub fn fail_then_succeed(status_code: Option<u16>, message: &str, text: &str) -> Self {
        let message = message.to_string();
        let text = text.to_string();
        Self::with_behavior(Arc::new(move |idx, _| {
            if idx == 0 {
                Err((status_code, message.clone()))
            } else {
                Ok(text.clone())
            }
        }))
    }

    /// Always succeed with an empty response body.
    pub fn empty() -> Self {
        Self::with_behavior(Arc::new(|_, _| Ok(String::new())))
    }

    /// Succeed with the uppercased prompt (useful for order checks).
    pub fn echo_upper() -> Self {
        Self::with_behavior(Arc::new(|_, request: &PromptRequest| {
            Ok(request.prompt.to_uppercase())
        }))
    }

    /// Succeed with responses scripted per call index; calls past the end
    /// of the script repeat the last entry.
    pub fn script(responses: &[&str]) -> Self {
        let responses: Vec<String> = responses.iter().map(|r| r.to_string()).collect();
        Self::with_behavior(Arc::new(move |idx, _| {
            let idx = (idx as usize).min(responses.len() - 1);
            Ok(responses[idx].clone())
        }))
    }

    /// Fully scripted behavior.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u32, &PromptRequest) -> Result<String, (Option<u16>, String)>
            + Send
            + Sync
            + 'static,
    {
        Self::with_behavior(Arc::new(f))
    }

    /// Declare the model text-only (rejects attachments).
    pub fn text_only(mut self) -> Self {
        self.supports_media = false;
        self
    }

    /// Sleep per call, with the delay derived from the prompt.
    pub fn with_delay_for<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Duration + Send + Sync + 'static,
    {
        self.delay_for = Some(Arc::new(f));
        self
    }
}

/// Resolver over a fixed set of scripted models. Ids not in the map
/// resolve to `UnknownModel`, like the real resolver.
pub(crate) struct MockResolver {
    models: HashMap<String, Arc<MockModel>>,
    /// Model ids in the order their `complete` was called.
    pub invocations: Arc<Mutex<Vec<String>>>,
}

impl MockResolver {
    pub fn new(models: Vec<(&str, MockModel)>) -> Self {
        Self {
            models: models
                .into_iter()
                .map(|(id, m)| (id.to_string(), Arc::new(m)))
                .collect(),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn single(id: &str, model: MockModel) -> Self {
        Self::new(vec![(id, model)])
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Invocation order so far (model ids, one entry per `complete` call).
    pub fn invocation_order(&self) -> Vec<String> {
        self.invocations.lock().unwrap().clone()
    }
}

impl ModelResolver for MockResolver {
    fn resolve(&self, model_id: &str) -> Result<Box<dyn LlmProvider>, InvokeError> {
        self.models
            .get(model_id)
            .map(|model| {
                Box::new(MockProvider {
                    id: model_id.to_string(),
                    model: model.clone(),
                    log: self.invocations.clone(),
                }) as Box<dyn LlmProvider>
            })
            .ok_or_else(|| InvokeError::UnknownModel(model_id.to_string()))
    }
}

struct MockProvider {
    id: String,
    model: Arc<MockModel>,
    log: Arc<Mutex<Vec<String>>>,
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider").field("id", &self.id).finish()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.id
    }

    fn supports_media(&self) -> bool {
        self.model.supports_media
    }

    async fn complete(&self, request: &PromptRequest) -> Result<PromptResponse, InvokeError> {
        let idx = self.model.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(self.id.clone());
        self.model
            .prompts
            .lock()
            .unwrap()
            .push(request.prompt.clone());

        if let Some(delay_for) = &self.model.delay_for {
            tokio::time::sleep(delay_for(&request.prompt)).await;
        }

        match (self.model.behavior)(idx, request) {
            Ok(text) => Ok(PromptResponse {
                text,
                model: self.id.clone(),
                tokens_used: None,
                latency_ms: 0,
            }),
            Err((status_code, message)) => Err(InvokeError::Api {
                model: self.id.clone(),
                message,
                status_code,
            }),
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(5)
    }
}
