//! Brave Search API request parameters and validation.

use serde::Serialize;
use surf_core::{SearchError, SearchQuery, TimeRange};

/// Longest query the API accepts, in chars.
const MAX_QUERY_CHARS: usize = 400;

/// Longest query the API accepts, in words.
const MAX_QUERY_WORDS: usize = 50;

/// Highest `count` the API accepts.
const MAX_COUNT: u8 = 20;

/// Query string of a `GET /web/search` call.
///
/// See <https://api-dashboard.search.brave.com/app/documentation/web-search/get-started>.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub q: String,

    /// Number of results (1-20).
    pub count: u8,

    /// ISO 3166-1 alpha-2 country, upper-case.
    pub country: String,

    /// ISO 639-1 content language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_lang: Option<String>,

    /// Recency preset: pd|pw|pm|py.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freshness: Option<&'static str>,
}

impl SearchRequest {
    /// Request for `query`, already clamped to the provider ceiling.
    pub fn from_query(query: &SearchQuery) -> Self {
        Self {
            q: query.query_text.trim().to_string(),
            count: u8::try_from(query.max_results).unwrap_or(MAX_COUNT).min(MAX_COUNT),
            country: query.region().unwrap_or_else(|| "US".to_string()),
            search_lang: query.primary_language(),
            freshness: query.time_range.map(freshness),
        }
    }

    /// Check the API's own limits.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` when the query is empty or exceeds 400 chars or 50
    /// words, or when `count` is outside 1-20.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.q.is_empty() {
            return Err(SearchError::InvalidQuery("query cannot be empty".into()));
        }

        let chars = self.q.chars().count();
        if chars > MAX_QUERY_CHARS {
            return Err(SearchError::InvalidQuery(format!(
                "query too long: {chars} chars (max {MAX_QUERY_CHARS})"
            )));
        }

        let words = self.q.split_whitespace().count();
        if words > MAX_QUERY_WORDS {
            return Err(SearchError::InvalidQuery(format!(
                "query too long: {words} words (max {MAX_QUERY_WORDS})"
            )));
        }

        if !(1..=MAX_COUNT).contains(&self.count) {
            return Err(SearchError::InvalidQuery(format!("count must be between 1 and {MAX_COUNT}")));
        }

        Ok(())
    }
}

fn freshness(range: TimeRange) -> &'static str {
    match range {
        TimeRange::Day => "pd",
        TimeRange::Week => "pw",
        TimeRange::Month => "pm",
        TimeRange::Year => "py",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_defaults() {
        let req = SearchRequest::from_query(&SearchQuery::new("rust").with_max_results(3));
        assert_eq!(req.q, "rust");
        assert_eq!(req.count, 3);
        assert_eq!(req.country, "US");
        assert_eq!(req.search_lang, None);
        assert_eq!(req.freshness, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_from_query_locale_and_range() {
        let query = SearchQuery::new("nachrichten").with_language("de-at").with_time_range(TimeRange::Day);
        let req = SearchRequest::from_query(&query);
        assert_eq!(req.country, "AT");
        assert_eq!(req.search_lang.as_deref(), Some("de"));
        assert_eq!(req.freshness, Some("pd"));
    }

    #[test]
    fn test_query_too_long_chars() {
        let req = SearchRequest { q: "a".repeat(401), count: 5, ..Default::default() };
        assert!(matches!(req.validate(), Err(SearchError::InvalidQuery(_))));

        let req = SearchRequest { q: "a".repeat(400), count: 5, ..Default::default() };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_query_too_many_words() {
        let req = SearchRequest { q: vec!["w"; 51].join(" "), count: 5, ..Default::default() };
        assert!(matches!(req.validate(), Err(SearchError::InvalidQuery(_))));
    }

    #[test]
    fn test_invalid_count() {
        for count in [0, 21] {
            let req = SearchRequest { q: "test".into(), count, ..Default::default() };
            assert!(req.validate().is_err(), "count {count}");
        }
    }

    #[test]
    fn test_serialized_params() {
        let req = SearchRequest::from_query(&SearchQuery::new("q").with_time_range(TimeRange::Year));
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, serde_json::json!({"q": "q", "count": 5, "country": "US", "freshness": "py"}));
    }
}
