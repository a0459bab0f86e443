//! Action configuration: a tagged union over the two supported actions.
//!
//! The wire shape carries the action type twice (an outer `action_type`
//! tag and the same discriminator inside `parameters`); construction and
//! deserialization both verify the two agree.

use serde::{Deserialize, Serialize};

use crate::credentials::ApiCredentials;
use crate::error::ConfigError;

/// The two supported action types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    EnrichPerson,
    SearchWeb,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::EnrichPerson => f.write_str("enrich_person"),
            ActionKind::SearchWeb => f.write_str("search_web"),
        }
    }
}

/// Action-specific parameters, discriminated by `action_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action_type", rename_all = "snake_case")]
pub enum ActionParams {
    EnrichPerson(PersonLookup),
    SearchWeb(WebSearch),
}

impl ActionParams {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionParams::EnrichPerson(_) => ActionKind::EnrichPerson,
            ActionParams::SearchWeb(_) => ActionKind::SearchWeb,
        }
    }
}

/// Identifiers for the person to enrich. The profile URL is the only one
/// the current enrichment endpoint accepts; the rest are carried for
/// callers that build configs from partial contact records.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonLookup {
    pub linkedin_profile_url: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
}

/// Parameters for a web search.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSearch {
    pub query: String,
}

/// A validated action description: what to do, with which parameters and
/// credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionConfig {
    pub action_type: ActionKind,
    pub parameters: ActionParams,
    #[serde(default)]
    pub credentials: ApiCredentials,
}

impl ActionConfig {
    /// Build a config, rejecting an outer tag that disagrees with the
    /// parameters variant.
    pub fn new(
        action_type: ActionKind,
        parameters: ActionParams,
        credentials: ApiCredentials,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            action_type,
            parameters,
            credentials,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from JSON and validate the discriminator invariant.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError::Validation(format!("invalid action config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the outer action type matches the parameters variant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let inner = self.parameters.kind();
        if self.action_type != inner {
            return Err(ConfigError::Validation(format!(
                "action_type \"{}\" does not match parameters for \"{inner}\"",
                self.action_type
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_config() {
        let config = ActionConfig::from_json(
            r#"{
                "action_type": "search_web",
                "parameters": {"action_type": "search_web", "query": "rust llm crates"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.action_type, ActionKind::SearchWeb);
        match &config.parameters {
            ActionParams::SearchWeb(params) => assert_eq!(params.query, "rust llm crates"),
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn parses_enrich_config_with_optional_fields_absent() {
        let config = ActionConfig::from_json(
            r#"{
                "action_type": "enrich_person",
                "parameters": {
                    "action_type": "enrich_person",
                    "linkedin_profile_url": "https://www.linkedin.com/in/example"
                }
            }"#,
        )
        .unwrap();
        match &config.parameters {
            ActionParams::EnrichPerson(params) => {
                assert_eq!(
                    params.linkedin_profile_url.as_deref(),
                    Some("https://www.linkedin.com/in/example")
                );
                assert!(params.name.is_none());
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn rejects_search_without_query() {
        let err = ActionConfig::from_json(
            r#"{
                "action_type": "search_web",
                "parameters": {"action_type": "search_web"}
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("query"), "got: {err}");
    }

    #[test]
    fn rejects_mismatched_discriminators() {
        let err = ActionConfig::from_json(
            r#"{
                "action_type": "search_web",
                "parameters": {"action_type": "enrich_person", "name": "Adam"}
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not match"), "got: {err}");
    }

    #[test]
    fn constructor_enforces_tag_agreement() {
        let err = ActionConfig::new(
            ActionKind::EnrichPerson,
            ActionParams::SearchWeb(WebSearch {
                query: "q".to_string(),
            }),
            ApiCredentials::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_unknown_action_type() {
        let err = ActionConfig::from_json(
            r#"{
                "action_type": "launch_rockets",
                "parameters": {"action_type": "launch_rockets"}
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
