//! SearXNG JSON API client.
//!
//! `GET {instance}/search?q=..&format=json&language=..&pageno=1`, with HTTP
//! basic auth when both credentials are configured. The instance must have
//! the `json` output format enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use surf_core::config::SearxngSettings;
use surf_core::{ProviderKind, SearchError, SearchQuery};
use url::Url;

use super::{RawResult, SearchBackend, http_client, provider_error, unavailable};

const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Debug, Clone)]
pub struct SearxngClient {
    http: reqwest::Client,
    endpoint: Url,
    auth: Option<(String, String)>,
    timeout: Duration,
    max_results: usize,
}

impl SearxngClient {
    /// # Errors
    ///
    /// `Configuration` when the instance URL is not an absolute http(s) URL
    /// or only one half of the basic-auth pair is set.
    pub fn new(settings: &SearxngSettings, user_agent: &str) -> Result<Self, SearchError> {
        let config_error = |reason: String| SearchError::Configuration { provider: ProviderKind::Searxng.to_string(), reason };

        let base = settings.instance_url.trim().trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/search"))
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .ok_or_else(|| config_error(format!("invalid instance_url: {:?}", settings.instance_url)))?;

        let non_blank = |value: &Option<String>| value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(String::from);
        let auth = match (non_blank(&settings.auth_username), non_blank(&settings.auth_password)) {
            (Some(user), Some(pass)) => Some((user, pass)),
            (None, None) => None,
            _ => return Err(config_error("auth_username and auth_password must be set together".into())),
        };

        let timeout = settings.timeout();
        Ok(Self {
            http: http_client(ProviderKind::Searxng, user_agent, timeout)?,
            endpoint,
            auth,
            timeout,
            max_results: settings.max_results,
        })
    }

    fn params(query: &SearchQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.query_text.trim().to_string()),
            ("format", "json".to_string()),
            ("language", query.language.clone().unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())),
            ("pageno", "1".to_string()),
        ];
        if let Some(range) = query.time_range {
            params.push(("time_range", range.as_str().to_string()));
        }
        params
    }
}

#[derive(Debug, Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearxngResult>,
}

#[derive(Debug, Deserialize)]
struct SearxngResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl SearchBackend for SearxngClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Searxng
    }

    fn max_results(&self) -> usize {
        self.max_results
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<RawResult>, SearchError> {
        let kind = self.kind();
        let mut request = self.http.get(self.endpoint.clone()).query(&Self::params(query));
        if let Some((user, pass)) = &self.auth {
            request = request.basic_auth(user, Some(pass));
        }

        tracing::debug!(endpoint = %self.endpoint, query = %query.query_text, "searxng request");

        let response = request.send().await.map_err(|e| unavailable(kind, &e, self.timeout))?;
        let status = response.status();
        if !status.is_success() {
            return Err(provider_error(kind, status));
        }

        let body = response.bytes().await.map_err(|e| unavailable(kind, &e, self.timeout))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let parsed: SearxngResponse = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(error = %e, "unreadable searxng response");
            provider_error(kind, status)
        })?;

        Ok(parsed
            .results
            .into_iter()
            .map(|r| RawResult { title: r.title, url: r.url, snippet: r.content })
            .collect())
    }
}
