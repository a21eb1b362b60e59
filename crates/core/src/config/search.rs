//! Search provider selection and per-provider settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ProviderKind;

/// Which provider is active plus the settings of every provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Active provider (SURF_SEARCH__PROVIDER).
    pub provider: ProviderKind,
    pub searxng: SearxngSettings,
    pub duckduckgo: DuckDuckGoSettings,
    pub brave: BraveSettings,
}

impl SearchConfig {
    /// Result ceiling of the active provider.
    pub fn active_max_results(&self) -> usize {
        match self.provider {
            ProviderKind::Searxng => self.searxng.max_results,
            ProviderKind::DuckDuckGo => self.duckduckgo.max_results,
            ProviderKind::Brave => self.brave.max_results,
        }
    }
}

/// Self-hosted SearXNG instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearxngSettings {
    /// Base URL of the instance; `/search` is appended.
    pub instance_url: String,
    /// Optional HTTP basic-auth user; requires `auth_password`.
    pub auth_username: Option<String>,
    pub auth_password: Option<String>,
    pub timeout_ms: u64,
    pub max_results: usize,
}

impl Default for SearxngSettings {
    fn default() -> Self {
        Self {
            instance_url: "https://searx.be".into(),
            auth_username: None,
            auth_password: None,
            timeout_ms: 10_000,
            max_results: 10,
        }
    }
}

impl SearxngSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// DuckDuckGo HTML endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuckDuckGoSettings {
    pub base_url: String,
    pub timeout_ms: u64,
    pub max_results: usize,
}

impl Default for DuckDuckGoSettings {
    fn default() -> Self {
        Self { base_url: "https://html.duckduckgo.com/html/".into(), timeout_ms: 10_000, max_results: 10 }
    }
}

impl DuckDuckGoSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Brave Web Search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BraveSettings {
    /// Subscription token (SURF_SEARCH__BRAVE__API_KEY). Mandatory when Brave
    /// is the active provider.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_ms: u64,
    pub max_results: usize,
}

impl Default for BraveSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.search.brave.com/res/v1".into(),
            timeout_ms: 10_000,
            max_results: 10,
        }
    }
}

impl BraveSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
