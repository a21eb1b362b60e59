//! Request-scoped value types shared by the read and search pipelines.
//!
//! Everything here is built once per request and never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SearchError;

/// Upper bound on results any caller may ask for in a single query.
pub const MAX_RESULTS_LIMIT: usize = 10;

/// Default number of results when the caller does not say.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Classification of a fetched payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Html,
    PlainText,
    Json,
    UnsupportedBinary,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::PlainText => "plain_text",
            Self::Json => "json",
            Self::UnsupportedBinary => "unsupported_binary",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a read operation.
///
/// Fields are private so a constructed document cannot be altered; use the
/// accessors or serialize it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    title: String,
    url: Url,
    content: String,
    content_type: ContentKind,
}

impl Document {
    pub fn new(title: String, url: Url, content: String, content_type: ContentKind) -> Self {
        Self { title, url, content, content_type }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Absolute URL the content was fetched from, after redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_type(&self) -> ContentKind {
        self.content_type
    }
}

/// One normalized search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    /// Short excerpt; empty when the provider gave none.
    pub snippet: String,
    /// 1-based position in the provider's own ordering.
    pub rank: usize,
}

/// Recency filter understood by every provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl FromStr for TimeRange {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(SearchError::InvalidQuery(format!(
                "invalid time_range: {other} (expected day, week, month or year)"
            ))),
        }
    }
}

/// Input parameters for a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query_text: String,
    pub max_results: usize,
    /// Locale tag such as `en-US`.
    pub language: Option<String>,
    pub time_range: Option<TimeRange>,
}

impl SearchQuery {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self { query_text: query_text.into(), max_results: DEFAULT_MAX_RESULTS, language: None, time_range: None }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = Some(time_range);
        self
    }

    /// Check the query text and result count.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidQuery` if the text is blank or
    /// `max_results` is outside `1..=MAX_RESULTS_LIMIT`.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.query_text.trim().is_empty() {
            return Err(SearchError::InvalidQuery("query cannot be empty".into()));
        }

        if !(1..=MAX_RESULTS_LIMIT).contains(&self.max_results) {
            return Err(SearchError::InvalidQuery(format!(
                "max_results must be between 1 and {MAX_RESULTS_LIMIT}, got {}",
                self.max_results
            )));
        }

        if let Some(language) = &self.language
            && language.trim().is_empty()
        {
            return Err(SearchError::InvalidQuery("language cannot be blank".into()));
        }

        Ok(())
    }

    /// Copy of this query with `max_results` lowered to `ceiling` if needed.
    pub fn clamped(&self, ceiling: usize) -> Self {
        Self { max_results: self.max_results.min(ceiling.max(1)), ..self.clone() }
    }

    /// Region part of the locale tag (`US` for `en-US`), upper-cased.
    pub fn region(&self) -> Option<String> {
        self.language
            .as_deref()
            .and_then(|tag| tag.split(['-', '_']).nth(1))
            .filter(|region| !region.is_empty())
            .map(str::to_ascii_uppercase)
    }

    /// Primary language subtag (`en` for `en-US`), lower-cased.
    pub fn primary_language(&self) -> Option<String> {
        self.language
            .as_deref()
            .and_then(|tag| tag.split(['-', '_']).next())
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map(str::to_ascii_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = SearchQuery::new("rust");
        assert_eq!(query.max_results, DEFAULT_MAX_RESULTS);
        assert!(query.language.is_none());
        assert!(query.time_range.is_none());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_query_empty_text() {
        let query = SearchQuery::new("   ");
        assert!(matches!(query.validate(), Err(SearchError::InvalidQuery(_))));
    }

    #[test]
    fn test_query_max_results_bounds() {
        assert!(SearchQuery::new("q").with_max_results(0).validate().is_err());
        assert!(SearchQuery::new("q").with_max_results(11).validate().is_err());
        assert!(SearchQuery::new("q").with_max_results(1).validate().is_ok());
        assert!(SearchQuery::new("q").with_max_results(10).validate().is_ok());
    }

    #[test]
    fn test_query_clamped_to_ceiling() {
        let query = SearchQuery::new("q").with_max_results(8);
        assert_eq!(query.clamped(5).max_results, 5);
        assert_eq!(query.clamped(10).max_results, 8);
        assert_eq!(query.clamped(0).max_results, 1);
    }

    #[test]
    fn test_locale_parts() {
        let query = SearchQuery::new("q").with_language("fr-fr");
        assert_eq!(query.region().as_deref(), Some("FR"));
        assert_eq!(query.primary_language().as_deref(), Some("fr"));

        let bare = SearchQuery::new("q").with_language("de");
        assert_eq!(bare.region(), None);
        assert_eq!(bare.primary_language().as_deref(), Some("de"));
    }

    #[test]
    fn test_time_range_parse() {
        assert_eq!("Week".parse::<TimeRange>().unwrap(), TimeRange::Week);
        assert!("fortnight".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_document_accessors() {
        let url = Url::parse("https://example.com/a").unwrap();
        let doc = Document::new("A".into(), url.clone(), "body".into(), ContentKind::Html);
        assert_eq!(doc.title(), "A");
        assert_eq!(doc.url(), &url);
        assert_eq!(doc.content(), "body");
        assert_eq!(doc.content_type(), ContentKind::Html);
    }

    #[test]
    fn test_content_kind_display() {
        assert_eq!(ContentKind::PlainText.to_string(), "plain_text");
        assert_eq!(ContentKind::UnsupportedBinary.to_string(), "unsupported_binary");
    }
}
