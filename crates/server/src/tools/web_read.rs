//! web_read tool implementation.
//!
//! Fetches a URL through the read pipeline and returns the cleaned document.

use std::time::Duration;

use chrono::Utc;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use surf_client::Reader;
use surf_client::fetch::with_default_scheme;
use surf_core::Error;

use crate::format::{OutputFormat, document_markdown, timestamp};

/// Longest per-call timeout a caller may ask for.
const MAX_TIMEOUT_MS: u64 = 5 * 60 * 1000;

/// Input parameters for web_read tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebReadParams {
    /// The URL to read. `https://` is assumed when no scheme is given.
    pub url: String,

    /// Output format: "json" (default) or "markdown".
    #[serde(default)]
    pub format: OutputFormat,

    /// Request timeout in milliseconds, overriding the configured default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Output structure for web_read tool in JSON format.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebReadOutput {
    pub title: String,
    /// Final URL after redirects.
    pub url: String,
    /// One of html, plain_text, json.
    pub content_type: String,
    pub content: String,
    /// ISO8601 timestamp of when the content was fetched.
    pub fetched_at: String,
}

/// Implementation of the web_read tool.
pub async fn read_impl(reader: &Reader, params: WebReadParams) -> Result<CallToolResult, McpError> {
    let url = params.url.trim();
    if url.is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let timeout = match params.timeout_ms {
        Some(ms) if ms == 0 || ms > MAX_TIMEOUT_MS => {
            return Err(Error::InvalidInput(format!("timeout_ms must be between 1 and {MAX_TIMEOUT_MS}")).into());
        }
        other => other.map(Duration::from_millis),
    };

    let doc = reader.read(&with_default_scheme(url), timeout).await?;
    let fetched_at = Utc::now();

    let text = match params.format {
        OutputFormat::Markdown => document_markdown(&doc, &fetched_at),
        OutputFormat::Json => {
            let output = WebReadOutput {
                title: doc.title().to_string(),
                url: doc.url().to_string(),
                content_type: doc.content_type().to_string(),
                content: doc.content().to_string(),
                fetched_at: timestamp(&fetched_at),
            };
            serde_json::to_string_pretty(&output).map_err(|e| McpError::internal_error(e.to_string(), None))?
        }
    };

    Ok(CallToolResult::success(vec![Content::text(text)]))
}
