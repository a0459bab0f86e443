//! Person-profile enrichment: one profile API call, then an LLM summary.

use std::time::Duration;

use crate::ask::{AskOptions, Dispatcher};
use crate::credentials::{ApiCredentials, PROXYCURL_KEY_VAR};
use crate::error::{ConfigError, Result};

use super::config::{ActionKind, PersonLookup};
use super::{fetch_json, ActionReport};

const ENDPOINT: &str = "https://nubela.co/proxycurl/api/linkedin/person-profile";
const TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) async fn run(
    dispatcher: &Dispatcher,
    params: &PersonLookup,
    credentials: &ApiCredentials,
) -> Result<ActionReport> {
    let Some(api_key) = credentials.proxycurl_api_key.as_deref() else {
        return Err(ConfigError::MissingCredential(PROXYCURL_KEY_VAR).into());
    };
    let Some(profile_url) = params.linkedin_profile_url.as_deref() else {
        return Err(ConfigError::MissingParameter("linkedin_profile_url").into());
    };

    tracing::info!(url = %profile_url, "fetching person profile");
    let client = reqwest::Client::new();
    let request = client
        .get(ENDPOINT)
        .bearer_auth(api_key)
        .query(&[("url", profile_url)])
        .timeout(TIMEOUT);
    let profile = fetch_json("profile API", request).await?;

    let profile_text = serde_json::to_string_pretty(&profile)?;
    let prompt = format!(
        "Based on the following JSON data of a person's profile, provide a \
         concise summary (2-3 sentences) highlighting their current role, key \
         skills, and experience. The summary should be suitable for \
         understanding how to improve communication with them.\
         \n\nProfile Data:\n{profile_text}"
    );
    tracing::info!("summarizing profile data");
    let summary = dispatcher.ask(&prompt, &AskOptions::default()).await?;

    Ok(ActionReport {
        status: "success".to_string(),
        action: ActionKind::EnrichPerson,
        subject: profile_url.to_string(),
        raw: profile,
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
        let params = PersonLookup {
            linkedin_profile_url: Some("https://www.linkedin.com/in/example".to_string()),
            ..PersonLookup::default()
        };
        let err = run(&dispatcher(), &params, &ApiCredentials::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ParleyError::Config(ConfigError::MissingCredential(PROXYCURL_KEY_VAR))
        ));
    }

    #[tokio::test]
    async fn missing_profile_url_is_a_configuration_error() {
        let credentials = ApiCredentials {
            proxycurl_api_key: Some("key".to_string()),
            search_api_key: None,
        };
        let err = run(&dispatcher(), &PersonLookup::default(), &credentials)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ParleyError::Config(ConfigError::MissingParameter("linkedin_profile_url"))
        ));
    }
}
