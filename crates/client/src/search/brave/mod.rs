//! Brave Web Search API client.
//!
//! - **Endpoint**: `{base_url}/web/search`, default base
//!   `https://api.search.brave.com/res/v1`
//! - **Authentication**: `X-Subscription-Token` header. A missing token is a
//!   configuration error raised at construction, before any network call.
//! - **Limits**: 400 chars / 50 words per query, at most 20 results.

pub mod request;
pub mod response;

pub use request::SearchRequest;
pub use response::BraveApiResponse;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use surf_core::config::BraveSettings;
use surf_core::{ProviderKind, SearchError, SearchQuery};
use url::Url;

use super::{RawResult, SearchBackend, http_client, provider_error, unavailable};

#[derive(Clone)]
pub struct BraveClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    timeout: Duration,
    max_results: usize,
}

impl std::fmt::Debug for BraveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BraveClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl BraveClient {
    /// # Errors
    ///
    /// `Configuration` when no API key is set or `base_url` is unusable.
    pub fn new(settings: &BraveSettings, user_agent: &str) -> Result<Self, SearchError> {
        let config_error = |reason: String| SearchError::Configuration { provider: ProviderKind::Brave.to_string(), reason };

        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| config_error("api_key is not set (SURF_SEARCH__BRAVE__API_KEY)".into()))?
            .to_string();

        let base = settings.base_url.trim().trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/web/search"))
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .ok_or_else(|| config_error(format!("invalid base_url: {:?}", settings.base_url)))?;

        let timeout = settings.timeout();
        Ok(Self {
            http: http_client(ProviderKind::Brave, user_agent, timeout)?,
            endpoint,
            api_key,
            timeout,
            max_results: settings.max_results,
        })
    }
}

#[async_trait]
impl SearchBackend for BraveClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Brave
    }

    fn max_results(&self) -> usize {
        self.max_results
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<RawResult>, SearchError> {
        let kind = self.kind();
        let req = SearchRequest::from_query(query);
        req.validate()?;

        tracing::debug!(endpoint = %self.endpoint, query = %req.q, count = req.count, "brave request");

        let response = self
            .http
            .get(self.endpoint.clone())
            .header("X-Subscription-Token", &self.api_key)
            .header(header::ACCEPT, "application/json")
            .query(&req)
            .send()
            .await
            .map_err(|e| unavailable(kind, &e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            if matches!(status.as_u16(), 401 | 403) {
                tracing::warn!(%status, "brave rejected the subscription token");
            }
            return Err(provider_error(kind, status));
        }

        let bytes = response.bytes().await.map_err(|e| unavailable(kind, &e, self.timeout))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let parsed: BraveApiResponse = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(error = %e, "unreadable brave response");
            provider_error(kind, status)
        })?;

        Ok(parsed.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use surf_core::TimeRange;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(server: &MockServer) -> BraveSettings {
        BraveSettings { api_key: Some("test-key".into()), base_url: server.uri(), ..Default::default() }
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        for api_key in [None, Some(String::new()), Some("   ".into())] {
            let settings = BraveSettings { api_key, ..Default::default() };
            let err = BraveClient::new(&settings, "surf-test").unwrap_err();
            assert!(matches!(err, SearchError::Configuration { ref provider, .. } if provider == "brave"));
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let settings = BraveSettings { api_key: Some("super-secret".into()), ..Default::default() };
        let client = BraveClient::new(&settings, "surf-test").unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }

    #[tokio::test]
    async fn test_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/web/search"))
            .and(header("X-Subscription-Token", "test-key"))
            .and(query_param("q", "rust async"))
            .and(query_param("count", "4"))
            .and(query_param("country", "GB"))
            .and(query_param("search_lang", "en"))
            .and(query_param("freshness", "pw"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": {"original": "rust async"},
                "web": {"results": [{"title": "Tokio", "url": "https://tokio.rs/", "description": "Async runtime"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = BraveClient::new(&settings(&server), "surf-test").unwrap();
        let query = SearchQuery::new("rust async")
            .with_max_results(4)
            .with_language("en-GB")
            .with_time_range(TimeRange::Week);

        let raw = client.fetch(&query).await.unwrap();
        assert_eq!(raw, vec![RawResult {
            title: "Tokio".into(),
            url: "https://tokio.rs/".into(),
            snippet: Some("Async runtime".into())
        }]);
    }

    #[tokio::test]
    async fn test_auth_failure_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/web/search"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = BraveClient::new(&settings(&server), "surf-test").unwrap();
        let err = client.fetch(&SearchQuery::new("q")).await.unwrap_err();
        assert_eq!(err, SearchError::ProviderError { provider: "brave".into(), status: 401 });
    }

    #[tokio::test]
    async fn test_overlong_query_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = BraveClient::new(&settings(&server), "surf-test").unwrap();
        let query = SearchQuery::new(vec!["word"; 60].join(" "));
        let err = client.fetch(&query).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_empty_body_is_zero_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = BraveClient::new(&settings(&server), "surf-test").unwrap();
        assert!(client.fetch(&SearchQuery::new("q")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_body_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"web\": "))
            .mount(&server)
            .await;

        let client = BraveClient::new(&settings(&server), "surf-test").unwrap();
        let err = client.fetch(&SearchQuery::new("q")).await.unwrap_err();
        assert!(matches!(err, SearchError::ProviderError { status: 200, .. }));
    }
}
