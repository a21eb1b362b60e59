//! HTTP fetch pipeline with a hard size ceiling and a single wall-clock bound.
//!
//! ### URL Canonicalization
//! - Trim whitespace, require an absolute `http`/`https` URL
//! - Lowercase host, remove fragments
//! - Preserve query string
//!
//! ### Safety Gates
//! - Max redirects: 5 (configurable)
//! - Max body bytes: 10MB (configurable). The body is read chunk by chunk and
//!   the fetch fails with `TooLarge` as soon as the ceiling is crossed; no
//!   partial body is ever returned.
//! - One timeout covers connect, headers and the full body read.
//!
//! No retries happen here.

pub mod url;

use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use reqwest::{Client, StatusCode, Url, header};
use surf_core::{AppConfig, FetchError};

pub use url::{UrlError, canonicalize, with_default_scheme};

/// Result of a fetch: the response, or a typed failure.
pub type FetchOutcome = Result<FetchResponse, FetchError>;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "surf/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 10MB)
    pub max_bytes: usize,

    /// Default request timeout when the caller gives none (default: 30s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "surf/0.1".to_string(),
            max_bytes: 10 * 1024 * 1024,
            timeout: Duration::from_millis(30_000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_content_bytes,
            timeout: config.fetch_timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The canonicalized URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header, verbatim
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// HTTP fetch client with size and time bounds.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| FetchError::ConnectionFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL, returning raw bytes and metadata.
    ///
    /// `timeout` overrides the configured default for this call only.
    pub async fn fetch(&self, url_str: &str, timeout: Option<Duration>) -> FetchOutcome {
        let url = canonicalize(url_str).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        let timeout = timeout.unwrap_or(self.config.timeout);
        let start = Instant::now();

        let response = match tokio::time::timeout(timeout, self.fetch_within(url.clone(), timeout)).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::debug!("fetch of {} abandoned after {:?}", url, timeout);
                return Err(FetchError::Timeout { after_ms: timeout.as_millis() as u64 });
            }
        };

        let (final_url, status, content_type, bytes) = response;
        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            fetch_ms,
            bytes.len()
        );

        Ok(FetchResponse { url, final_url, status, content_type, bytes, fetch_ms })
    }

    /// Request + bounded body read. The caller enforces the overall deadline.
    async fn fetch_within(
        &self, url: Url, timeout: Duration,
    ) -> Result<(Url, StatusCode, Option<String>, Bytes), FetchError> {
        let mut response = self
            .http
            .get(url)
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,text/plain;q=0.8,*/*;q=0.5",
            )
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(&e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus { code: status.as_u16() });
        }

        let limit = self.config.max_bytes;
        if let Some(len) = response.content_length()
            && len > limit as u64
        {
            tracing::debug!("declared length {} exceeds {}", len, limit);
            return Err(FetchError::TooLarge { limit });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let capacity = response.content_length().map_or(8 * 1024, |len| len as usize);
        let mut body = BytesMut::with_capacity(capacity.min(limit));
        while let Some(chunk) = response.chunk().await.map_err(|e| transport_error(&e, timeout))? {
            if body.len() + chunk.len() > limit {
                tracing::debug!("body of {} crossed {} bytes, aborting", final_url, limit);
                return Err(FetchError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok((final_url, status, content_type, body.freeze()))
    }
}

fn transport_error(err: &reqwest::Error, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout { after_ms: timeout.as_millis() as u64 }
    } else if err.is_redirect() {
        FetchError::ConnectionFailed(format!("redirect limit exceeded: {}", err))
    } else {
        FetchError::ConnectionFailed(err.to_string())
    }
}
