//! Startup selection of the active search provider.

use surf_core::config::SearchConfig;
use surf_core::{ProviderKind, SearchError};

use super::{BraveClient, DuckDuckGoClient, SearchProvider, SearxngClient};

/// Build the provider named by `config.provider`.
///
/// Only the active provider's settings are checked; settings of the others
/// may be incomplete.
///
/// # Errors
///
/// `Configuration` when the active provider lacks mandatory settings, such
/// as a Brave API key. No network traffic happens here.
pub fn select(config: &SearchConfig, user_agent: &str) -> Result<SearchProvider, SearchError> {
    let provider = match config.provider {
        ProviderKind::Searxng => SearchProvider::Searxng(SearxngClient::new(&config.searxng, user_agent)?),
        ProviderKind::DuckDuckGo => SearchProvider::DuckDuckGo(DuckDuckGoClient::new(&config.duckduckgo)?),
        ProviderKind::Brave => SearchProvider::Brave(BraveClient::new(&config.brave, user_agent)?),
    };

    tracing::info!(provider = %provider.kind(), max_results = provider.max_results(), "search provider selected");
    Ok(provider)
}
