//! Web search: one search API call, then an LLM summary of the results.

use std::time::Duration;

use crate::ask::{AskOptions, Dispatcher};
use crate::credentials::{ApiCredentials, SEARCH_KEY_VAR};
use crate::error::{ConfigError, Result};

use super::config::{ActionKind, WebSearch};
use super::{fetch_json, ActionReport};

const ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";
const TIMEOUT: Duration = Duration::from_secs(20);

pub(crate) async fn run(
    dispatcher: &Dispatcher,
    params: &WebSearch,
    credentials: &ApiCredentials,
) -> Result<ActionReport> {
    let Some(api_key) = credentials.search_api_key.as_deref() else {
        return Err(ConfigError::MissingCredential(SEARCH_KEY_VAR).into());
    };
    if params.query.trim().is_empty() {
        return Err(ConfigError::MissingParameter("query").into());
    }

    tracing::info!(query = %params.query, "running web search");
    let client = reqwest::Client::new();
    let request = client
        .get(ENDPOINT)
        .header("X-Subscription-Token", api_key)
        .header("Accept", "application/json")
        .query(&[("q", params.query.as_str())])
        .timeout(TIMEOUT);
    let results = fetch_json("search API", request).await?;

    let results_text = serde_json::to_string_pretty(&results)?;
    let prompt = format!(
        "Based on the following web search results, provide a concise answer \
         or summary for the query: '{}'. Focus on the most relevant \
         information.\n\nSearch Results (JSON):\n{results_text}",
        params.query
    );
    tracing::info!("summarizing search results");
    let summary = dispatcher.ask(&prompt, &AskOptions::default()).await?;

    Ok(ActionReport {
        status: "success".to_string(),
        action: ActionKind::SearchWeb,
        subject: params.query.clone(),
        raw: results,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ParleyError;
    use crate::llm::testing::{MockModel, MockResolver};
    use std::sync::Arc;

    fn dispatcher() -> Dispatcher {
        let mut config = Config::default();
        config.models.fallback = vec!["mock-1".to_string()];
        Dispatcher::with_resolver(
            config,
            Arc::new(MockResolver::single("mock-1", MockModel::ok("summary"))),
        )
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        let params = WebSearch {
            query: "rust llm crates".to_string(),
        };
        let err = run(&dispatcher(), &params, &ApiCredentials::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ParleyError::Config(ConfigError::MissingCredential(SEARCH_KEY_VAR))
        ));
    }

    #[tokio::test]
    async fn blank_query_is_a_configuration_error() {
        let credentials = ApiCredentials {
            proxycurl_api_key: None,
            search_api_key: Some("key".to_string()),
        };
        let params = WebSearch {
            query: "   ".to_string(),
        };
        let err = run(&dispatcher(), &params, &credentials).await.unwrap_err();
        assert!(matches!(
            err,
            ParleyError::Config(ConfigError::MissingParameter("query"))
        ));
    }
}
