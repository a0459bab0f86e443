//! API credentials for the action handlers.
//!
//! Each secret resolves through a prioritized source chain: an explicitly
//! provided value wins over the process environment, which wins over a
//! local `.env` file. Resolution happens once, up front; handlers receive
//! the resolved struct by value and never consult the environment.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Environment variable holding the person-enrichment API key.
pub const PROXYCURL_KEY_VAR: &str = "PROXYCURL_API_KEY";

/// Environment variable holding the web-search API key.
pub const SEARCH_KEY_VAR: &str = "SEARCH_API_KEY";

const DOTENV_FILE: &str = ".env";

/// Secrets for the two external APIs. Either may be absent; the handler
/// that needs a missing one fails with a configuration error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiCredentials {
    pub proxycurl_api_key: Option<String>,
    pub search_api_key: Option<String>,
}

impl ApiCredentials {
    /// Fill unset fields from the environment, then the local `.env` file.
    ///
    /// Fields that already hold a value are left untouched.
    pub fn resolved(self) -> Self {
        self.resolved_from(Path::new(DOTENV_FILE))
    }

    /// Like [`resolved`](Self::resolved) with an explicit dotenv path.
    pub fn resolved_from(self, dotenv_path: &Path) -> Self {
        let file_vars = load_dotenv(dotenv_path);
        Self {
            proxycurl_api_key: resolve_one(self.proxycurl_api_key, PROXYCURL_KEY_VAR, &file_vars),
            search_api_key: resolve_one(self.search_api_key, SEARCH_KEY_VAR, &file_vars),
        }
    }
}

/// Resolve a single secret: explicit value > environment > dotenv file.
fn resolve_one(
    explicit: Option<String>,
    var: &str,
    file_vars: &HashMap<String, String>,
) -> Option<String> {
    explicit
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .or_else(|| file_vars.get(var).cloned())
}

/// Read a dotenv file into a map without touching the process environment.
///
/// A missing or unreadable file yields an empty map; unknown keys in the
/// file are simply never looked up.
fn load_dotenv(path: &Path) -> HashMap<String, String> {
    match dotenvy::from_path_iter(path) {
        Ok(iter) => iter.filter_map(|item| item.ok()).collect(),
        Err(_) => HashMap::new(),
    }
}
