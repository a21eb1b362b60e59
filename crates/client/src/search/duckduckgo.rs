//! DuckDuckGo HTML endpoint client.
//!
//! Posts the query form to `html.duckduckgo.com/html/` and scrapes the
//! result page. Result links point at a `/l/?uddg=` redirect; the target
//! URL is recovered from that parameter.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use surf_core::config::DuckDuckGoSettings;
use surf_core::{ProviderKind, SearchError, SearchQuery, TimeRange};
use url::Url;

use super::{RawResult, SearchBackend, http_client, provider_error, unavailable};

/// The HTML endpoint serves a bot wall to non-browser agents.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Region code used when the locale has no dedicated mapping.
const WORLDWIDE: &str = "wt-wt";

static RESULT_BLOCK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.result").expect("invalid selector"));
static RESULT_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.result__a").expect("invalid selector"));
static RESULT_SNIPPET: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result__snippet").expect("invalid selector"));

#[derive(Debug, Clone)]
pub struct DuckDuckGoClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
    max_results: usize,
}

impl DuckDuckGoClient {
    /// # Errors
    ///
    /// `Configuration` when `base_url` is not an absolute http(s) URL.
    pub fn new(settings: &DuckDuckGoSettings) -> Result<Self, SearchError> {
        let endpoint = Url::parse(settings.base_url.trim())
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .ok_or_else(|| SearchError::Configuration {
                provider: ProviderKind::DuckDuckGo.to_string(),
                reason: format!("invalid base_url: {:?}", settings.base_url),
            })?;

        let timeout = settings.timeout();
        Ok(Self {
            http: http_client(ProviderKind::DuckDuckGo, BROWSER_USER_AGENT, timeout)?,
            endpoint,
            timeout,
            max_results: settings.max_results,
        })
    }
}

/// `kl` region parameter for a locale tag.
fn region_code(language: Option<&str>) -> &'static str {
    let Some(tag) = language else {
        return WORLDWIDE;
    };
    match tag.trim().replace('_', "-").to_ascii_lowercase().as_str() {
        "en-us" => "us-en",
        "en-gb" => "uk-en",
        "en-ca" => "ca-en",
        "en-au" => "au-en",
        "fr-fr" => "fr-fr",
        "de-de" => "de-de",
        "es-es" => "es-es",
        "it-it" => "it-it",
        "ja-jp" => "jp-jp",
        _ => WORLDWIDE,
    }
}

/// `df` recency parameter.
fn date_filter(range: TimeRange) -> &'static str {
    match range {
        TimeRange::Day => "d",
        TimeRange::Week => "w",
        TimeRange::Month => "m",
        TimeRange::Year => "y",
    }
}

/// Recover the destination of a result link.
///
/// Redirect links (`//duckduckgo.com/l/?uddg=<encoded>`) yield the decoded
/// `uddg` target. Other DuckDuckGo-internal links, such as ad click-throughs,
/// yield `None`.
fn unwrap_redirect(href: &str) -> Option<String> {
    let base = Url::parse("https://duckduckgo.com/").ok()?;
    let url = base.join(href.trim()).ok()?;

    let internal = url.host_str().is_some_and(|host| host == "duckduckgo.com" || host.ends_with(".duckduckgo.com"));
    if !internal {
        return Some(url.to_string());
    }

    url.query_pairs().find(|(key, _)| key == "uddg").map(|(_, target)| target.into_owned())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Scrape result entries from a result page, skipping sponsored blocks.
fn parse_results(html: &str) -> Vec<RawResult> {
    let document = Html::parse_document(html);

    let blocks: Vec<_> = document
        .select(&RESULT_BLOCK)
        .filter(|block| !block.value().classes().any(|class| class == "result--ad"))
        .collect();

    blocks
        .into_iter()
        .filter_map(|block| {
            let link = block.select(&RESULT_LINK).next()?;
            let url = unwrap_redirect(link.value().attr("href")?)?;
            let snippet = block.select(&RESULT_SNIPPET).next().map(element_text);
            Some(RawResult { title: element_text(link), url, snippet })
        })
        .collect()
}

#[async_trait]
impl SearchBackend for DuckDuckGoClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DuckDuckGo
    }

    fn max_results(&self) -> usize {
        self.max_results
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<RawResult>, SearchError> {
        let kind = self.kind();
        let mut form = vec![
            ("q", query.query_text.trim().to_string()),
            ("kl", region_code(query.language.as_deref()).to_string()),
        ];
        if let Some(range) = query.time_range {
            form.push(("df", date_filter(range).to_string()));
        }

        tracing::debug!(endpoint = %self.endpoint, query = %query.query_text, "duckduckgo request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| unavailable(kind, &e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(provider_error(kind, status));
        }

        let html = response.text().await.map_err(|e| unavailable(kind, &e, self.timeout))?;
        Ok(parse_results(&html))
    }
}
