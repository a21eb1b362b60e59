//! Pass-through extraction for plain text and JSON payloads.

use serde_json::Value;
use url::Url;

use super::render::longest_backtick_run;
use super::title::title_from_url;

/// Longest title taken from a document body, in chars.
const MAX_TITLE_CHARS: usize = 200;

/// Keys probed, in order, for a JSON document title.
const JSON_TITLE_KEYS: &[&str] = &["title", "name", "id", "key"];

/// First non-empty line of `text`, or the URL-derived title.
pub fn plain_title(text: &str, url: &Url) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.chars().take(MAX_TITLE_CHARS).collect())
        .unwrap_or_else(|| title_from_url(url))
}

/// A JSON payload prepared for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonBody {
    pub title: String,
    pub text: String,
    /// Backtick fence to wrap `text` in, set when the payload was valid and
    /// pretty-printed.
    pub fence: Option<String>,
}

impl JsonBody {
    /// Opening and closing fence lines around a body.
    pub fn fence_lines(&self) -> Option<(String, String)> {
        self.fence.as_ref().map(|fence| (format!("{fence}json\n"), format!("\n{fence}")))
    }

    pub fn render(&self) -> String {
        match self.fence_lines() {
            Some((open, close)) => format!("{open}{}{close}", self.text),
            None => self.text.clone(),
        }
    }
}

/// Title and body for a JSON payload.
///
/// Valid JSON is pretty-printed for a `json` code fence. Invalid JSON
/// passes through unchanged so the caller still sees the payload.
pub fn json_body(text: &str) -> JsonBody {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "invalid json passed through as text");
            return JsonBody { title: "Invalid JSON Document".to_string(), text: text.to_string(), fence: None };
        }
    };

    let title = value
        .as_object()
        .and_then(|object| JSON_TITLE_KEYS.iter().find_map(|key| object.get(*key)))
        .map(|field| match field {
            Value::String(s) => format!("JSON: {}", s.chars().take(MAX_TITLE_CHARS).collect::<String>()),
            other => format!("JSON: {other}"),
        })
        .unwrap_or_else(|| "JSON Document".to_string());

    let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| text.to_string());
    let fence = "`".repeat(longest_backtick_run(&pretty).max(2) + 1);
    JsonBody { title, text: pretty, fence: Some(fence) }
}
