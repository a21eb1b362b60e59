//! Readable content extraction from HTML, plain text and JSON payloads.
//!
//! ### Pipeline
//! 1. Lenient parse: tag-soup tokenizer feeding a recovering tree builder.
//!    Malformed markup degrades structure but never errors.
//! 2. Noise removal: configured tags, hidden elements, class/id signatures.
//! 3. Title selection (meta, `<title>`, headings, URL).
//! 4. Link and image resolution against the page URL.
//! 5. Markdown-flavoured rendering.
//! 6. Whitespace normalization and the content size cap.
//!
//! ### Pass-through
//! - Input with no elements at all takes the plain-text path, so running the
//!   cleaner over its own output is a no-op.
//! - JSON is pretty-printed in a code fence; invalid JSON passes through.

pub mod entities;
pub mod links;
pub mod noise;
pub mod normalize;
pub mod render;
pub mod text;
pub mod title;
pub mod tokenizer;
pub mod tree;

pub use links::resolve_links;
pub use noise::NoiseFilter;
pub use normalize::normalize_whitespace;
pub use title::{extract_title, title_from_url};
pub use tree::Tree;

use surf_core::config::NoiseConfig;
use surf_core::{AppConfig, ContentKind, Document};
use url::Url;

use normalize::truncate_to_boundary;

/// Turns fetched payloads into [`Document`]s.
///
/// Holds only read-only policy; one instance serves concurrent requests.
#[derive(Debug, Clone)]
pub struct HtmlCleaner {
    noise: NoiseFilter,
    max_content_bytes: usize,
}

impl HtmlCleaner {
    pub fn new(noise: &NoiseConfig, max_content_bytes: usize) -> Self {
        Self { noise: NoiseFilter::new(noise), max_content_bytes }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.noise, config.max_content_bytes)
    }

    /// Clean an HTML payload fetched from `base_url`.
    pub fn process(&self, raw_html: &str, base_url: &Url) -> Document {
        let mut tree = Tree::parse(raw_html);
        if !tree.has_elements() {
            let title = text::plain_title(raw_html, base_url);
            return Document::new(title, base_url.clone(), self.finish(raw_html), ContentKind::Html);
        }

        let removed = self.noise.strip(&mut tree);
        let title = extract_title(&tree, base_url);
        let resolved = resolve_links(&mut tree, base_url);
        let content = self.finish(&render::render(&tree));

        tracing::debug!(
            url = %base_url,
            noise_removed = removed,
            links_resolved = resolved,
            content_bytes = content.len(),
            "cleaned html"
        );

        Document::new(title, base_url.clone(), content, ContentKind::Html)
    }

    /// Plain-text pass-through: whitespace normalized, title from the first
    /// non-empty line.
    pub fn process_text(&self, text: &str, base_url: &Url) -> Document {
        let title = text::plain_title(text, base_url);
        Document::new(title, base_url.clone(), self.finish(text), ContentKind::PlainText)
    }

    /// JSON pass-through: pretty-printed when valid, verbatim otherwise.
    ///
    /// When the cap cuts a pretty-printed body, the cut happens inside the
    /// fence and the closing fence is kept.
    pub fn process_json(&self, raw: &str, base_url: &Url) -> Document {
        let body = text::json_body(raw);
        let content = match body.fence_lines() {
            Some((open, close)) if open.len() + close.len() < self.max_content_bytes => {
                let budget = self.max_content_bytes - open.len() - close.len();
                format!("{open}{}{close}", self.finish_within(&body.text, budget))
            }
            _ => self.finish(&body.render()),
        };
        Document::new(body.title, base_url.clone(), content, ContentKind::Json)
    }

    fn finish(&self, content: &str) -> String {
        self.finish_within(content, self.max_content_bytes)
    }

    /// Normalize, cap at `limit` bytes, and normalize again so a cut never
    /// leaves trailing whitespace behind.
    fn finish_within(&self, content: &str, limit: usize) -> String {
        let normalized = normalize_whitespace(content);
        if normalized.len() <= limit {
            return normalized;
        }
        tracing::debug!(bytes = normalized.len(), limit, "content truncated");
        normalize_whitespace(truncate_to_boundary(&normalized, limit))
    }
}
