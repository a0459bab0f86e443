//! Action handlers: validated external API calls fed into an LLM summary.
//!
//! Each handler validates its credential and required parameters, performs
//! exactly one HTTP GET against its fixed endpoint, and routes the JSON
//! response through the fallback dispatcher for summarization. The HTTP
//! client lives only for the single call that needs it.

mod config;
mod enrich;
mod search;

pub use config::{ActionConfig, ActionKind, ActionParams, PersonLookup, WebSearch};

use serde::Serialize;

use crate::ask::Dispatcher;
use crate::error::{ParleyError, Result};

/// The outcome of a completed action. Failures are errors, so `status`
/// is always the literal "success".
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    pub status: String,
    pub action: ActionKind,
    /// What the action was about: the profile URL or the search query
    pub subject: String,
    /// Raw external API response body
    pub raw: serde_json::Value,
    /// LLM-generated summary of the raw response
    pub summary: String,
}

/// Run the configured action and return its report.
pub async fn run_action(dispatcher: &Dispatcher, config: &ActionConfig) -> Result<ActionReport> {
    config.validate()?;
    match &config.parameters {
        ActionParams::EnrichPerson(params) => {
            enrich::run(dispatcher, params, &config.credentials).await
        }
        ActionParams::SearchWeb(params) => {
            search::run(dispatcher, params, &config.credentials).await
        }
    }
}

/// Send a prepared GET request and decode the JSON body, mapping every
/// failure mode to a single action error naming the API.
pub(crate) async fn fetch_json(
    api: &str,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value> {
    let response = request.send().await.map_err(|e| ParleyError::Action {
        message: format!("failed to reach {api}: {e}"),
        source: Some(Box::new(e)),
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ParleyError::Action {
            message: format!("{api} returned HTTP {status}: {body}"),
            source: None,
        });
    }

    response.json().await.map_err(|e| ParleyError::Action {
        message: format!("failed to decode {api} response: {e}"),
        source: Some(Box::new(e)),
    })
}
