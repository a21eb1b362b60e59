//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SURF_*, nested with `__`)
//! 2. TOML config file (if SURF_CONFIG_FILE set)
//! 3. Built-in defaults

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod content;
mod search;
mod validation;

pub use content::{ContentTypeAllowlist, NoiseConfig};
pub use search::{BraveSettings, DuckDuckGoSettings, SearchConfig, SearxngSettings};
pub use validation::ConfigError;

/// Identifies one of the supported search backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Self-hosted SearXNG metasearch instance.
    Searxng,
    /// DuckDuckGo HTML endpoint, no credentials.
    #[default]
    DuckDuckGo,
    /// Brave Web Search API, requires a subscription token.
    Brave,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Searxng => "searxng",
            Self::DuckDuckGo => "duckduckgo",
            Self::Brave => "brave",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "searxng" => Ok(Self::Searxng),
            "duckduckgo" => Ok(Self::DuckDuckGo),
            "brave" => Ok(Self::Brave),
            other => Err(ConfigError::Invalid {
                field: "search.provider".into(),
                reason: format!("unknown provider '{other}' (expected searxng, duckduckgo or brave)"),
            }),
        }
    }
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SURF_*)
/// 2. TOML config file (if SURF_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string for fetch requests.
    ///
    /// Set via SURF_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum body bytes per fetch, also the cap on document content.
    ///
    /// Set via SURF_MAX_CONTENT_BYTES environment variable.
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: usize,

    /// Default fetch timeout in milliseconds (connect + full body).
    ///
    /// Set via SURF_FETCH_TIMEOUT_MS environment variable.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Maximum number of redirects a fetch follows.
    ///
    /// Set via SURF_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Media types accepted by the read pipeline.
    #[serde(default)]
    pub content_types: ContentTypeAllowlist,

    /// Noise signatures stripped from HTML before rendering.
    #[serde(default)]
    pub noise: NoiseConfig,

    /// Search provider selection and per-provider settings.
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_user_agent() -> String {
    "surf/0.1".into()
}

fn default_max_content_bytes() -> usize {
    10 * 1024 * 1024 // 10MB
}

fn default_fetch_timeout_ms() -> u64 {
    30_000
}

fn default_max_redirects() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_content_bytes: default_max_content_bytes(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            max_redirects: default_max_redirects(),
            content_types: ContentTypeAllowlist::default(),
            noise: NoiseConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Default fetch timeout as Duration for use with reqwest/tokio.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SURF_`
    /// 2. TOML file from `SURF_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered figment `load` extracts from.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SURF_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("SURF_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate a configuration from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` on extraction errors and the
    /// validation error otherwise.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
