//! Unified error types for surf.
//!
//! Every failure the core can produce is a typed value. The outer layer maps
//! each kind onto a stable JSON-RPC error code (see `From<Error> for McpError`).

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Failures while retrieving or classifying a remote resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The URL is not an absolute http(s) URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Connect + body read did not finish in time.
    #[error("FETCH_TIMEOUT: no complete response after {after_ms}ms")]
    Timeout { after_ms: u64 },

    /// DNS, TCP, TLS, redirect-limit or mid-body transport failure.
    #[error("CONNECTION_FAILED: {0}")]
    ConnectionFailed(String),

    /// Body exceeded the configured ceiling.
    #[error("FETCH_TOO_LARGE: body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    /// Final response was not 2xx.
    #[error("HTTP_ERROR: status {code}")]
    HttpStatus { code: u16 },

    /// Declared media type is not on the text allowlist.
    #[error("UNSUPPORTED_CONTENT_TYPE: {0}")]
    UnsupportedContentType(String),
}

/// Failures while selecting a provider or running a search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Empty text, out-of-range result count, or provider-specific limits.
    #[error("INVALID_QUERY: {0}")]
    InvalidQuery(String),

    /// Selected provider is missing mandatory configuration.
    #[error("CONFIGURATION_ERROR: {provider}: {reason}")]
    Configuration { provider: String, reason: String },

    /// Provider could not be reached or timed out.
    #[error("PROVIDER_UNAVAILABLE: {provider}: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    /// Provider answered with a failure status or an unreadable body.
    #[error("PROVIDER_ERROR: {provider} returned status {status}")]
    ProviderError { provider: String, status: u16 },
}

/// Unified error type for surf operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Search(#[from] SearchError),

    /// Invalid tool parameters (e.g., unknown output format).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Stable JSON-RPC error code for this failure kind.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidInput(_) => -32602,
            Error::Fetch(FetchError::InvalidUrl(_)) => -32003,
            Error::Fetch(FetchError::Timeout { .. }) => -32006,
            Error::Fetch(FetchError::TooLarge { .. }) => -32007,
            Error::Fetch(FetchError::HttpStatus { .. }) => -32008,
            Error::Fetch(FetchError::ConnectionFailed(_)) => -32013,
            Error::Fetch(FetchError::UnsupportedContentType(_)) => -32014,
            Error::Search(SearchError::InvalidQuery(_)) => -32602,
            Error::Search(SearchError::Configuration { .. }) => -32020,
            Error::Search(SearchError::ProviderUnavailable { .. }) => -32021,
            Error::Search(SearchError::ProviderError { .. }) => -32022,
        }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        McpError { code: ErrorCode(err.code()), message: err.to_string().into(), data: None }
    }
}

impl From<FetchError> for McpError {
    fn from(err: FetchError) -> Self {
        Error::from(err).into()
    }
}

impl From<SearchError> for McpError {
    fn from(err: SearchError) -> Self {
        Error::from(err).into()
    }
}
