//! Mapping of provider-native hits into ranked [`SearchResult`]s.

use surf_core::{ProviderKind, SearchResult};
use url::Url;

use super::RawResult;
use crate::extract::normalize::collapse_whitespace;

/// Normalize `raw` hits in provider order.
///
/// Hits without an absolute http(s) URL are dropped. An empty title falls
/// back to the URL and a missing snippet becomes empty. At most
/// `max_results` survive, ranked densely from 1.
pub fn normalize(provider: ProviderKind, raw: Vec<RawResult>, max_results: usize) -> Vec<SearchResult> {
    raw.into_iter()
        .filter_map(|hit| {
            let url = match Url::parse(hit.url.trim()) {
                Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => url,
                _ => {
                    tracing::debug!(%provider, url = %hit.url, "dropping result without usable url");
                    return None;
                }
            };

            let url = url.to_string();
            let title = match collapse_whitespace(&hit.title) {
                title if title.is_empty() => url.clone(),
                title => title,
            };
            let snippet = hit.snippet.as_deref().map(collapse_whitespace).unwrap_or_default();

            Some((title, url, snippet))
        })
        .take(max_results)
        .enumerate()
        .map(|(i, (title, url, snippet))| SearchResult { title, url, snippet, rank: i + 1 })
        .collect()
}
