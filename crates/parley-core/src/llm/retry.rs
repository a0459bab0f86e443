//! Retry policy for transient model failures.
//!
//! Provides classification of retryable errors and exponential backoff.

use crate::config::ModelsConfig;
use crate::error::InvokeError;
use std::time::Duration;

/// Bounded retry with exponential backoff, built from `[models]` config.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub attempts: u32,
    /// Base backoff delay
    pub base_delay: Duration,
    /// Backoff cap
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ModelsConfig) -> Self {
        Self {
            attempts: config.retry_attempts,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
        }
    }

    /// Backoff duration before retry number `attempt` (zero-based):
    /// `base_delay * 2^attempt`, capped at `max_delay`.
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let delay = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ModelsConfig::default())
    }
}

/// Determine whether an invocation error is worth retrying.
///
/// Retryable: rate limits (429), server errors (5xx), connection-level
/// failures, empty responses. Non-retryable: unknown models, modality
/// mismatches, auth failures, bad requests.
pub fn is_retryable(error: &InvokeError) -> bool {
    match error {
        InvokeError::UnknownModel(_) => false,
        InvokeError::UnsupportedMedia(_) => false,
        InvokeError::EmptyResponse(_) => true,
        InvokeError::Api {
            status_code,
            message,
            ..
        } => {
            // Classify by HTTP status code when available (structured)
            if let Some(code) = status_code {
                return *code == 429 || (500..=599).contains(code);
            }
            // Fallback for non-HTTP errors (e.g., connection refused, DNS failure)
            message.contains("timed out") || message.contains("connect")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status_code: Option<u16>, message: &str) -> InvokeError {
        InvokeError::Api {
            model: "test-model".to_string(),
            message: message.to_string(),
            status_code,
        }
    }

    #[test]
    fn rate_limit_is_retryable() {
        assert!(is_retryable(&api_error(Some(429), "rate limit exceeded")));
    }

    #[test]
    fn server_error_is_retryable() {
        assert!(is_retryable(&api_error(Some(503), "service unavailable")));
    }

    #[test]
    fn auth_error_not_retryable() {
        assert!(!is_retryable(&api_error(Some(401), "unauthorized")));
    }

    #[test]
    fn unknown_model_not_retryable() {
        assert!(!is_retryable(&InvokeError::UnknownModel(
            "no-such-model".to_string()
        )));
    }

    #[test]
    fn modality_mismatch_not_retryable() {
        assert!(!is_retryable(&InvokeError::UnsupportedMedia(
            "gpt-3.5-turbo".to_string()
        )));
    }

    #[test]
    fn empty_response_is_retryable() {
        assert!(is_retryable(&InvokeError::EmptyResponse(
            "gpt-4o-mini".to_string()
        )));
    }

    #[test]
    fn connection_error_retryable_without_status() {
        assert!(is_retryable(&api_error(None, "connection refused")));
    }

    #[test]
    fn message_with_500_in_body_not_retryable_without_status() {
        assert!(!is_retryable(&api_error(
            None,
            "Processed 500 tokens successfully"
        )));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_duration(0), Duration::from_secs(4));
        assert_eq!(policy.backoff_duration(1), Duration::from_secs(8));
        // 16s exceeds the 10s cap
        assert_eq!(policy.backoff_duration(2), Duration::from_secs(10));
        assert_eq!(policy.backoff_duration(10), Duration::from_secs(10));
    }

    #[test]
    fn default_policy_matches_config() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 1);
        assert_eq!(policy.base_delay, Duration::from_secs(4));
        assert_eq!(policy.max_delay, Duration::from_secs(10));
    }
}
