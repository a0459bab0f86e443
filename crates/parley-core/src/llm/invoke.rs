//! Single-model invocation with bounded retry.
//!
//! Resolves the model id, gates attachments on the model's modality, and
//! submits the prompt. Transient failures are retried with exponential
//! backoff; modality mismatches and unroutable ids fail immediately.

use super::provider::PromptRequest;
use super::registry::ModelResolver;
use super::retry::{self, RetryPolicy};
use crate::error::InvokeError;
use crate::media::Attachment;

/// Try one model id, retrying transient failures per `policy`.
///
/// An empty or whitespace-only response counts as a failure, not a
/// success with empty content.
pub(crate) async fn try_model(
    resolver: &dyn ModelResolver,
    prompt: &str,
    model_id: &str,
    attachments: &[Attachment],
    policy: &RetryPolicy,
) -> Result<String, InvokeError> {
    let provider = resolver.resolve(model_id)?;

    if !attachments.is_empty() && !provider.supports_media() {
        return Err(InvokeError::UnsupportedMedia(model_id.to_string()));
    }

    let request = PromptRequest::new(prompt, attachments.to_vec());

    let mut last_error = InvokeError::EmptyResponse(model_id.to_string());
    for attempt in 0..=policy.attempts {
        if attempt > 0 {
            let delay = policy.backoff_duration(attempt - 1);
            tracing::debug!(
                model = %model_id,
                "retry {attempt}/{} after {delay:?}",
                policy.attempts
            );
            tokio::time::sleep(delay).await;
        }

        match provider.complete(&request).await {
            Ok(response) if response.text.trim().is_empty() => {
                last_error = InvokeError::EmptyResponse(model_id.to_string());
            }
            Ok(response) => return Ok(response.text),
            Err(e) => {
                if !retry::is_retryable(&e) {
                    return Err(e);
                }
                last_error = e;
            }
        }
    }

    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::{MockModel, MockResolver};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            base_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn returns_text_on_first_success() {
        let model = MockModel::ok("hello there");
        let calls = model.calls.clone();
        let resolver = MockResolver::single("mock-1", model);

        let text = try_model(&resolver, "hi", "mock-1", &[], &fast_policy(1))
            .await
            .unwrap();
        assert_eq!(text, "hello there");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_error_then_succeeds() {
        let model = MockModel::fail_then_succeed(Some(500), "internal error", "recovered");
        let calls = model.calls.clone();
        let resolver = MockResolver::single("mock-1", model);

        let text = try_model(&resolver, "hi", "mock-1", &[], &fast_policy(1))
            .await
            .unwrap();
        assert_eq!(text, "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_client_error() {
        let model = MockModel::fail(Some(401), "unauthorized");
        let calls = model.calls.clone();
        let resolver = MockResolver::single("mock-1", model);

        let err = try_model(&resolver, "hi", "mock-1", &[], &fast_policy(3))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unauthorized"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhausts_retries_on_persistent_failure() {
        let model = MockModel::fail(Some(503), "unavailable");
        let calls = model.calls.clone();
        let resolver = MockResolver::single("mock-1", model);

        let err = try_model(&resolver, "hi", "mock-1", &[], &fast_policy(2))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unavailable"));
        // 1 initial + 2 retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn unknown_model_fails_without_any_call() {
        let resolver = MockResolver::empty();
        let err = try_model(&resolver, "hi", "nope", &[], &fast_policy(3))
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::UnknownModel(_)));
    }

    #[tokio::test]
    async fn attachments_to_text_model_fail_before_submission() {
        let model = MockModel::ok("never reached").text_only();
        let calls = model.calls.clone();
        let resolver = MockResolver::single("mock-1", model);

        let attachment = Attachment::from_bytes(&[1, 2, 3], "image/jpeg");
        let err = try_model(&resolver, "hi", "mock-1", &[attachment], &fast_policy(1))
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::UnsupportedMedia(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_response_is_retried_then_fails() {
        let model = MockModel::empty();
        let calls = model.calls.clone();
        let resolver = MockResolver::single("mock-1", model);

        let err = try_model(&resolver, "hi", "mock-1", &[], &fast_policy(1))
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::EmptyResponse(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
