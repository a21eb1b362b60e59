//! Web search across interchangeable providers.
//!
//! ### Providers
//! - SearXNG: self-hosted metasearch, optional basic auth.
//! - DuckDuckGo: public HTML endpoint, no credentials.
//! - Brave: Web Search API, subscription token required.
//!
//! The active provider is chosen once from configuration by [`select`] and
//! held as an immutable [`SearchProvider`] for the life of the process.
//!
//! ### Flow
//! 1. Validate the query (`InvalidQuery` on empty text or bad counts)
//! 2. Clamp `max_results` to the provider's own ceiling
//! 3. Provider round trip under the provider's own timeout
//! 4. Normalize into ranked [`SearchResult`]s
//!
//! No retries happen here.

pub mod brave;
pub mod duckduckgo;
pub mod normalize;
pub mod searxng;
pub mod select;

pub use brave::BraveClient;
pub use duckduckgo::DuckDuckGoClient;
pub use normalize::normalize;
pub use searxng::SearxngClient;
pub use select::select;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use surf_core::{ProviderKind, SearchError, SearchQuery, SearchResult};

/// One provider-native hit, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResult {
    pub title: String,
    pub url: String,
    pub snippet: Option<String>,
}

/// Capability shared by every provider.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Highest result count this provider will return.
    fn max_results(&self) -> usize;

    /// Run one provider round trip and return hits in provider order.
    /// `query.max_results` is already clamped to [`Self::max_results`].
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<RawResult>, SearchError>;
}

/// The configured search provider.
#[derive(Debug, Clone)]
pub enum SearchProvider {
    Searxng(SearxngClient),
    DuckDuckGo(DuckDuckGoClient),
    Brave(BraveClient),
}

impl SearchProvider {
    fn backend(&self) -> &dyn SearchBackend {
        match self {
            Self::Searxng(client) => client,
            Self::DuckDuckGo(client) => client,
            Self::Brave(client) => client,
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.backend().kind()
    }

    pub fn max_results(&self) -> usize {
        self.backend().max_results()
    }

    /// Run `query` against this provider.
    ///
    /// # Errors
    ///
    /// - `InvalidQuery` before any network traffic when the query is invalid
    /// - `ProviderUnavailable` when the provider cannot be reached in time
    /// - `ProviderError` on a non-2xx status or an unreadable body
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError> {
        query.validate()?;

        let backend = self.backend();
        let query = query.clamped(backend.max_results());
        let start = Instant::now();

        let raw = match backend.fetch(&query).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(provider = %backend.kind(), error = %err, "search failed");
                return Err(err);
            }
        };

        let native = raw.len();
        let results = normalize(backend.kind(), raw, query.max_results);

        tracing::info!(
            provider = %backend.kind(),
            native,
            returned = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search completed"
        );

        Ok(results)
    }
}

/// Map a transport failure to `ProviderUnavailable`.
pub(crate) fn unavailable(kind: ProviderKind, err: &reqwest::Error, timeout: Duration) -> SearchError {
    let reason = if err.is_timeout() {
        format!("no response within {}ms", timeout.as_millis())
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };
    SearchError::ProviderUnavailable { provider: kind.to_string(), reason }
}

/// Map a non-2xx status, or an unreadable 2xx body, to `ProviderError`.
pub(crate) fn provider_error(kind: ProviderKind, status: reqwest::StatusCode) -> SearchError {
    SearchError::ProviderError { provider: kind.to_string(), status: status.as_u16() }
}

/// Build the HTTP client a provider uses for every request.
pub(crate) fn http_client(kind: ProviderKind, user_agent: &str, timeout: Duration) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .use_rustls_tls()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| SearchError::Configuration {
            provider: kind.to_string(),
            reason: format!("failed to build HTTP client: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use surf_core::config::{BraveSettings, DuckDuckGoSettings, SearchConfig, SearxngSettings};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn searxng_body(count: usize) -> String {
        let results: Vec<_> = (1..=count)
            .map(|i| serde_json::json!({"title": format!("Result {i}"), "url": format!("https://example.com/{i}"), "content": format!("Snippet {i}")}))
            .collect();
        serde_json::json!({ "results": results }).to_string()
    }

    fn brave_body(count: usize) -> String {
        let results: Vec<_> = (1..=count)
            .map(|i| serde_json::json!({"title": format!("Result {i}"), "url": format!("https://example.com/{i}"), "description": format!("Snippet {i}")}))
            .collect();
        serde_json::json!({ "query": {"original": "q"}, "web": { "results": results } }).to_string()
    }

    fn ddg_body(count: usize) -> String {
        let mut html = String::from("<html><body><div class=\"results\">");
        for i in 1..=count {
            html.push_str(&format!(
                r#"<div class="result results_links web-result"><h2 class="result__title"><a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2F{i}&amp;rut=abc">Result {i}</a></h2><a class="result__snippet" href="x">Snippet {i}</a></div>"#
            ));
        }
        html.push_str("</div></body></html>");
        html
    }

    /// One provider of each kind, all pointed at `server`, each returning
    /// `count` native results.
    async fn providers(server: &MockServer, count: usize) -> Vec<SearchProvider> {
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(searxng_body(count)))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/web/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(brave_body(count)))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ddg_body(count)))
            .mount(server)
            .await;

        let config = |provider| SearchConfig {
            provider,
            searxng: SearxngSettings { instance_url: server.uri(), ..Default::default() },
            duckduckgo: DuckDuckGoSettings { base_url: format!("{}/html/", server.uri()), ..Default::default() },
            brave: BraveSettings { api_key: Some("test-key".into()), base_url: server.uri(), ..Default::default() },
        };

        vec![
            select(&config(ProviderKind::Searxng), "surf-test").unwrap(),
            select(&config(ProviderKind::DuckDuckGo), "surf-test").unwrap(),
            select(&config(ProviderKind::Brave), "surf-test").unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_quantum_computing_takes_first_three() {
        let server = MockServer::start().await;
        for provider in providers(&server, 5).await {
            let query = SearchQuery::new("quantum computing").with_max_results(3);
            let results = provider.search(&query).await.unwrap();

            assert_eq!(results.len(), 3, "provider {}", provider.kind());
            for (i, result) in results.iter().enumerate() {
                assert_eq!(result.rank, i + 1);
                assert_eq!(result.title, format!("Result {}", i + 1));
                assert_eq!(result.url, format!("https://example.com/{}", i + 1));
                assert_eq!(result.snippet, format!("Snippet {}", i + 1));
            }
        }
    }

    #[tokio::test]
    async fn test_result_count_is_min_of_native_and_requested() {
        for native in [0, 1, 4, 10] {
            let server = MockServer::start().await;
            for provider in providers(&server, native).await {
                for requested in [1, 3, 10] {
                    let query = SearchQuery::new("rust").with_max_results(requested);
                    let results = provider.search(&query).await.unwrap();
                    assert_eq!(results.len(), native.min(requested), "provider {}", provider.kind());
                    let ranks: Vec<_> = results.iter().map(|r| r.rank).collect();
                    assert_eq!(ranks, (1..=results.len()).collect::<Vec<_>>());
                }
            }
        }
    }

    #[tokio::test]
    async fn test_provider_ceiling_clamps_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(searxng_body(8)))
            .mount(&server)
            .await;

        let config = SearchConfig {
            provider: ProviderKind::Searxng,
            searxng: SearxngSettings { instance_url: server.uri(), max_results: 2, ..Default::default() },
            ..Default::default()
        };
        let provider = select(&config, "surf-test").unwrap();
        let results = provider.search(&SearchQuery::new("q").with_max_results(10)).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_query_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(searxng_body(1)))
            .expect(0)
            .mount(&server)
            .await;

        let config = SearchConfig {
            provider: ProviderKind::Searxng,
            searxng: SearxngSettings { instance_url: server.uri(), ..Default::default() },
            ..Default::default()
        };
        let provider = select(&config, "surf-test").unwrap();

        let err = provider.search(&SearchQuery::new("  ")).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));

        let err = provider.search(&SearchQuery::new("q").with_max_results(0)).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));

        let err = provider.search(&SearchQuery::new("q").with_max_results(11)).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_non_2xx_is_provider_error_for_every_variant() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let config = |provider| SearchConfig {
            provider,
            searxng: SearxngSettings { instance_url: server.uri(), ..Default::default() },
            duckduckgo: DuckDuckGoSettings { base_url: format!("{}/html/", server.uri()), ..Default::default() },
            brave: BraveSettings { api_key: Some("k".into()), base_url: server.uri(), ..Default::default() },
        };

        for kind in [ProviderKind::Searxng, ProviderKind::DuckDuckGo, ProviderKind::Brave] {
            let provider = select(&config(kind), "surf-test").unwrap();
            let err = provider.search(&SearchQuery::new("q")).await.unwrap_err();
            assert_eq!(err, SearchError::ProviderError { provider: kind.to_string(), status: 503 });
        }
    }

    #[tokio::test]
    async fn test_unreachable_is_provider_unavailable() {
        let config = SearchConfig {
            provider: ProviderKind::Searxng,
            searxng: SearxngSettings { instance_url: "http://127.0.0.1:1".into(), ..Default::default() },
            ..Default::default()
        };
        let provider = select(&config, "surf-test").unwrap();
        let err = provider.search(&SearchQuery::new("q")).await.unwrap_err();
        assert!(matches!(err, SearchError::ProviderUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_provider_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(searxng_body(1))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = SearchConfig {
            provider: ProviderKind::Searxng,
            searxng: SearxngSettings { instance_url: server.uri(), timeout_ms: 100, ..Default::default() },
            ..Default::default()
        };
        let provider = select(&config, "surf-test").unwrap();
        let err = provider.search(&SearchQuery::new("q")).await.unwrap_err();
        assert!(matches!(err, SearchError::ProviderUnavailable { .. }));
    }
}
