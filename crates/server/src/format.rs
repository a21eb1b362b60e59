//! Rendering of tool outputs.
//!
//! JSON is the default. Markdown output prefixes a read with a YAML
//! front-matter header and lays search results out as numbered sections.

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use surf_core::{Document, SearchResult};

/// Output format requested by a tool caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    #[serde(alias = "md")]
    Markdown,
}

pub fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Read output as Markdown with front-matter.
///
/// ```text
/// ---
/// title: <title>
/// source: <final url>
/// fetched_at: <RFC3339>
/// content_type: html
/// ---
///
/// <content>
/// ```
pub fn document_markdown(doc: &Document, fetched_at: &DateTime<Utc>) -> String {
    format!(
        "---\ntitle: {title}\nsource: {source}\nfetched_at: {timestamp}\ncontent_type: {kind}\n---\n\n{content}\n",
        title = escape_yaml(doc.title()),
        source = doc.url().as_str(),
        timestamp = timestamp(fetched_at),
        kind = doc.content_type(),
        content = doc.content()
    )
}

/// Search output as Markdown; `No results found.` for an empty list.
pub fn results_markdown(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }

    let mut out = String::from("# Search Results\n\n");
    for result in results {
        out.push_str(&format!("## {}. {}\n\n", result.rank, result.title));
        out.push_str(&format!("**URL**: {}\n\n", result.url));
        if !result.snippet.is_empty() {
            out.push_str(&result.snippet);
            out.push_str("\n\n");
        }
        out.push_str("---\n\n");
    }
    out.truncate(out.trim_end().len());
    out
}

/// Quote a front-matter scalar when plain YAML would misread it.
fn escape_yaml(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s.contains(['\n', '"', '#'])
        || s.contains(": ")
        || s.ends_with(':')
        || s.starts_with(['-', '[', '{', '\'', '!', '&', '*', '|', '>', '%', '@', '`', ' ']);

    if needs_quotes {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use surf_core::ContentKind;
    use url::Url;

    fn fetched_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-20T00:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_document_markdown() {
        let doc = Document::new(
            "Test Title".into(),
            Url::parse("https://example.com/post").unwrap(),
            "# Heading\n\nContent".into(),
            ContentKind::Html,
        );
        assert_eq!(
            document_markdown(&doc, &fetched_at()),
            "---\ntitle: Test Title\nsource: https://example.com/post\nfetched_at: 2025-01-20T00:00:00Z\n\
             content_type: html\n---\n\n# Heading\n\nContent\n"
        );
    }

    #[test]
    fn test_results_markdown() {
        let results = vec![
            SearchResult { title: "One".into(), url: "https://a.example/".into(), snippet: "first".into(), rank: 1 },
            SearchResult { title: "Two".into(), url: "https://b.example/".into(), snippet: String::new(), rank: 2 },
        ];
        assert_eq!(
            results_markdown(&results),
            "# Search Results\n\n## 1. One\n\n**URL**: https://a.example/\n\nfirst\n\n---\n\n\
             ## 2. Two\n\n**URL**: https://b.example/\n\n---"
        );
    }

    #[test]
    fn test_no_results() {
        assert_eq!(results_markdown(&[]), "No results found.");
    }

    #[test]
    fn test_escape_yaml() {
        assert_eq!(escape_yaml("simple text"), "simple text");
        assert_eq!(escape_yaml(""), "\"\"");
        assert_eq!(escape_yaml("Title: Subtitle"), "\"Title: Subtitle\"");
        assert_eq!(escape_yaml("a:b"), "a:b");
        assert_eq!(escape_yaml("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(escape_yaml("line1\nline2"), "\"line1\\nline2\"");
        assert_eq!(escape_yaml("- item"), "\"- item\"");
    }

    #[test]
    fn test_format_aliases() {
        let parsed: OutputFormat = serde_json::from_str("\"md\"").unwrap();
        assert_eq!(parsed, OutputFormat::Markdown);
        let parsed: OutputFormat = serde_json::from_str("\"markdown\"").unwrap();
        assert_eq!(parsed, OutputFormat::Markdown);
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }
}
