//! Brave Search API response types.

use serde::Deserialize;

use crate::search::RawResult;

/// Body of a `GET /web/search` response. Only the web vertical is read.
#[derive(Debug, Default, Deserialize)]
pub struct BraveApiResponse {
    #[serde(default)]
    pub web: Option<WebResults>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebResults {
    #[serde(default)]
    pub results: Vec<WebResult>,
}

#[derive(Debug, Deserialize)]
pub struct WebResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl BraveApiResponse {
    /// Web hits in API order.
    pub fn into_raw(self) -> Vec<RawResult> {
        self.web
            .map(|web| {
                web.results
                    .into_iter()
                    .map(|r| RawResult { title: r.title, url: r.url, snippet: r.description })
                    .collect()
            })
            .unwrap_or_default()
    }
}
