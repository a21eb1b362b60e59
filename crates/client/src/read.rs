//! Fetch, classify and clean a single URL into a [`Document`].

use std::time::{Duration, Instant};

use encoding_rs::{Encoding, UTF_8};
use surf_core::config::ContentTypeAllowlist;
use surf_core::{AppConfig, ContentKind, Document, FetchError};

use crate::classify::classify;
use crate::extract::HtmlCleaner;
use crate::fetch::{FetchClient, FetchConfig};

/// The read pipeline. Holds only immutable policy plus a pooled HTTP client,
/// so one instance serves concurrent reads.
#[derive(Debug, Clone)]
pub struct Reader {
    fetcher: FetchClient,
    cleaner: HtmlCleaner,
    allowlist: ContentTypeAllowlist,
}

impl Reader {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: FetchClient::new(FetchConfig::from(config))?,
            cleaner: HtmlCleaner::from_config(config),
            allowlist: config.content_types.clone(),
        })
    }

    /// Read `url` and return its cleaned content.
    ///
    /// Relative links resolve against the final URL after redirects, and the
    /// document carries that URL.
    ///
    /// # Errors
    ///
    /// Any [`FetchError`]; `UnsupportedContentType` when the declared type
    /// is missing or not on the allowlist. Nothing is parsed in that case.
    pub async fn read(&self, url: &str, timeout: Option<Duration>) -> Result<Document, FetchError> {
        let start = Instant::now();
        let response = self.fetcher.fetch(url, timeout).await?;

        let kind = classify(response.content_type.as_deref(), &self.allowlist);
        if kind == ContentKind::UnsupportedBinary {
            let declared = response.content_type.as_deref().unwrap_or("none").to_string();
            tracing::debug!(url = %response.final_url, content_type = %declared, "rejected content type");
            return Err(FetchError::UnsupportedContentType(declared));
        }

        let text = decode_body(&response.bytes, response.content_type.as_deref());
        let base = &response.final_url;
        let document = match kind {
            ContentKind::Html => self.cleaner.process(&text, base),
            ContentKind::Json => self.cleaner.process_json(&text, base),
            ContentKind::PlainText | ContentKind::UnsupportedBinary => self.cleaner.process_text(&text, base),
        };

        tracing::info!(
            url = %response.url,
            final_url = %response.final_url,
            content_type = %kind,
            fetch_ms = response.fetch_ms,
            total_ms = start.elapsed().as_millis() as u64,
            content_bytes = document.content().len(),
            "read completed"
        );

        Ok(document)
    }
}

/// Body bytes as text in the declared charset.
///
/// UTF-8 when no charset is declared or the label is unknown. A leading
/// byte-order mark wins over the label and is dropped. Malformed sequences
/// become U+FFFD.
fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, used, malformed) = encoding.decode(bytes);
    if malformed {
        tracing::debug!(encoding = used.name(), "body contained malformed sequences");
    }
    text.into_owned()
}

/// `charset` parameter of a Content-Type value.
fn charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim().eq_ignore_ascii_case("charset").then(|| value.trim().trim_matches('"'))
    })
}
