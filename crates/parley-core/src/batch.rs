//! Batch fan-out: many independent prompts through the fallback
//! dispatcher at once.
//!
//! Workers share no mutable state; concurrency is bounded by a semaphore
//! and results are joined in submission order, so the output list always
//! mirrors the input list. One failing prompt fails the whole batch.

use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::ask::{AskOptions, Dispatcher};
use crate::error::{ParleyError, Result};

impl Dispatcher {
    /// Dispatch every prompt concurrently, preserving input order in the
    /// returned list.
    ///
    /// `models` applies to every prompt; `workers` bounds concurrency and
    /// defaults to the configured value, then to available parallelism.
    /// Media attachments are not supported here. Any failure aborts the
    /// batch; partial results are discarded.
    pub async fn ask_batch(
        &self,
        prompts: &[String],
        models: Option<Vec<String>>,
        workers: Option<usize>,
    ) -> Result<Vec<String>> {
        if prompts.is_empty() {
            return Ok(Vec::new());
        }

        let workers = workers
            .or(self.config().batch.workers)
            .unwrap_or_else(default_workers)
            .max(1);
        tracing::debug!(prompts = prompts.len(), workers, "starting batch");

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut handles = Vec::with_capacity(prompts.len());
        for (index, prompt) in prompts.iter().enumerate() {
            let semaphore = semaphore.clone();
            let dispatcher = self.clone();
            let prompt = prompt.clone();
            let options = AskOptions {
                data: None,
                models: models.clone(),
                media: Vec::new(),
            };
            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| ParleyError::Batch {
                        index,
                        message: "worker pool closed unexpectedly".to_string(),
                    })?;
                dispatcher.ask(&prompt, &options).await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok(text)) => results.push(text),
                Ok(Err(e)) => {
                    return Err(ParleyError::Batch {
                        index,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    return Err(ParleyError::Batch {
                        index,
                        message: format!("worker task failed: {e}"),
                    });
                }
            }
        }
        Ok(results)
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm::testing::{MockModel, MockResolver};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn dispatcher(model: MockModel) -> Dispatcher {
        let mut config = Config::default();
        config.models.fallback = vec!["mock-1".to_string()];
        config.models.retry_attempts = 0;
        Dispatcher::with_resolver(
            config,
            Arc::new(MockResolver::single("mock-1", model)),
        )
    }

    #[tokio::test]
    async fn empty_batch_returns_immediately() {
        let model = MockModel::ok("unused");
        let calls = model.calls.clone();
        let d = dispatcher(model);

        let results = d.ask_batch(&[], None, None).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn results_mirror_input_order_despite_completion_order() {
        // Earlier prompts sleep longer, so completion order is reversed.
        let model = MockModel::echo_upper().with_delay_for(|prompt| match prompt {
            "a" => Duration::from_millis(120),
            "b" => Duration::from_millis(60),
            _ => Duration::from_millis(5),
        });
        let d = dispatcher(model);

        let prompts: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let results = d.ask_batch(&prompts, None, Some(3)).await.unwrap();

        assert_eq!(results, vec!["A", "B", "C"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn one_failing_prompt_aborts_the_batch() {
        let model = MockModel::custom(|_, request| {
            if request.prompt == "b" {
                Err((Some(400), "prompt b rejected".to_string()))
            } else {
                Ok(request.prompt.to_uppercase())
            }
        });
        let d = dispatcher(model);

        let prompts: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let err = d.ask_batch(&prompts, None, Some(3)).await.unwrap_err();

        match err {
            ParleyError::Batch { index, message } => {
                assert_eq!(index, 1);
                assert!(message.contains("prompt b rejected"), "got: {message}");
            }
            other => panic!("expected Batch error, got {other}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn worker_limit_bounds_concurrency() {
        use std::sync::atomic::AtomicU32;

        let in_flight = Arc::new(AtomicU32::new(0));
        let max_seen = Arc::new(AtomicU32::new(0));
        let in_flight_probe = in_flight.clone();
        let max_probe = max_seen.clone();

        let model = MockModel::custom(move |_, request| {
            let current = in_flight_probe.fetch_add(1, Ordering::SeqCst) + 1;
            max_probe.fetch_max(current, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(40));
            in_flight_probe.fetch_sub(1, Ordering::SeqCst);
            Ok(request.prompt.clone())
        });
        let d = dispatcher(model);

        let prompts: Vec<String> = (0..6).map(|i| format!("p{i}")).collect();
        let results = d.ask_batch(&prompts, None, Some(2)).await.unwrap();

        assert_eq!(results.len(), 6);
        assert!(
            max_seen.load(Ordering::SeqCst) <= 2,
            "semaphore violated: max concurrent was {}",
            max_seen.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn shared_model_list_applies_to_every_prompt() {
        let fallback_model = MockModel::ok("from fallback");
        let fallback_calls = fallback_model.calls.clone();
        let shared_model = MockModel::echo_upper();

        let mut config = Config::default();
        config.models.fallback = vec!["mock-1".to_string()];
        config.models.retry_attempts = 0;
        let resolver = MockResolver::new(vec![
            ("mock-1", fallback_model),
            ("mock-2", shared_model),
        ]);
        let d = Dispatcher::with_resolver(config, Arc::new(resolver));

        let prompts: Vec<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        let results = d
            .ask_batch(&prompts, Some(vec!["mock-2".to_string()]), Some(2))
            .await
            .unwrap();

        assert_eq!(results, vec!["X", "Y"]);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }
}
