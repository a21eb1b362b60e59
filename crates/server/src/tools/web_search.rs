//! web_search tool implementation.
//!
//! Runs a query against the provider selected at start-up.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use surf_client::SearchProvider;
use surf_core::model::DEFAULT_MAX_RESULTS;
use surf_core::{SearchQuery, SearchResult, TimeRange};

use crate::format::{OutputFormat, results_markdown};

/// Input parameters for web_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// Search query (required).
    pub query: String,

    /// Number of results (1-10, default 5).
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Locale tag such as "en-US" or "fr-FR".
    #[serde(default = "default_language")]
    pub language: String,

    /// Recency filter: day, week, month or year.
    #[serde(default)]
    pub time_range: Option<TimeRange>,

    /// Output format: "json" (default) or "markdown".
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for WebSearchParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: default_max_results(),
            language: default_language(),
            time_range: None,
            format: OutputFormat::default(),
        }
    }
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_language() -> String {
    "en-US".into()
}

/// Output structure for web_search tool in JSON format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchOutput {
    pub query: String,
    /// Provider that answered (searxng, duckduckgo, brave).
    pub provider: String,
    pub results: Vec<SearchResult>,
}

/// Implementation of the web_search tool.
pub async fn search_impl(provider: &SearchProvider, params: WebSearchParams) -> Result<CallToolResult, McpError> {
    let mut query = SearchQuery::new(params.query.trim())
        .with_max_results(params.max_results)
        .with_language(params.language);
    if let Some(range) = params.time_range {
        query = query.with_time_range(range);
    }

    let results = provider.search(&query).await?;

    let text = match params.format {
        OutputFormat::Markdown => results_markdown(&results),
        OutputFormat::Json => {
            let output = WebSearchOutput { query: query.query_text, provider: provider.kind().to_string(), results };
            serde_json::to_string_pretty(&output).map_err(|e| McpError::internal_error(e.to_string(), None))?
        }
    };

    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    use surf_client::select;
    use surf_core::ProviderKind;
    use surf_core::config::{SearchConfig, SearxngSettings};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn text_of(result: &CallToolResult) -> String {
        result.content[0].as_text().map(|t| t.text.clone()).unwrap_or_default()
    }

    fn searxng(server: &MockServer) -> SearchProvider {
        let config = SearchConfig {
            provider: ProviderKind::Searxng,
            searxng: SearxngSettings { instance_url: server.uri(), ..Default::default() },
            ..Default::default()
        };
        select(&config, "surf-test").unwrap()
    }

    async fn mount_results(server: &MockServer, count: usize) {
        let results: Vec<_> = (1..=count)
            .map(|i| serde_json::json!({"title": format!("Result {i}"), "url": format!("https://example.com/{i}"), "content": format!("About {i}")}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "quantum computing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": results })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_search_json_output() {
        let server = MockServer::start().await;
        mount_results(&server, 5).await;
        let provider = searxng(&server);

        let params = WebSearchParams { query: "quantum computing".into(), max_results: 3, ..Default::default() };
        let result = search_impl(&provider, params).await.unwrap();
        let output: WebSearchOutput = serde_json::from_str(&text_of(&result)).unwrap();

        assert_eq!(output.query, "quantum computing");
        assert_eq!(output.provider, "searxng");
        assert_eq!(output.results.len(), 3);
        assert_eq!(output.results.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_search_markdown_output() {
        let server = MockServer::start().await;
        mount_results(&server, 1).await;
        let provider = searxng(&server);

        let params = WebSearchParams {
            query: "quantum computing".into(),
            format: OutputFormat::Markdown,
            ..Default::default()
        };
        let text = text_of(&search_impl(&provider, params).await.unwrap());
        assert_eq!(text, "# Search Results\n\n## 1. Result 1\n\n**URL**: https://example.com/1\n\nAbout 1\n\n---");
    }

    #[tokio::test]
    async fn test_search_invalid_query() {
        let server = MockServer::start().await;
        let provider = searxng(&server);

        let params = WebSearchParams { query: "   ".into(), ..Default::default() };
        let err = search_impl(&provider, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);

        let params = WebSearchParams { query: "q".into(), max_results: 11, ..Default::default() };
        let err = search_impl(&provider, params).await.unwrap_err();
        assert!(err.message.contains("INVALID_QUERY"));
    }

    #[tokio::test]
    async fn test_search_provider_failure_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        let provider = searxng(&server);

        let params = WebSearchParams { query: "q".into(), ..Default::default() };
        let err = search_impl(&provider, params).await.unwrap_err();
        assert_eq!(err.code.0, -32022);
    }

    #[test]
    fn test_params_defaults() {
        let params: WebSearchParams = serde_json::from_str(r#"{"query": "rust"}"#).unwrap();
        assert_eq!(params.max_results, 5);
        assert_eq!(params.language, "en-US");
        assert_eq!(params.time_range, None);
        assert_eq!(params.format, OutputFormat::Json);

        let params: WebSearchParams = serde_json::from_str(r#"{"query": "rust", "time_range": "week"}"#).unwrap();
        assert_eq!(params.time_range, Some(TimeRange::Week));
    }
}
