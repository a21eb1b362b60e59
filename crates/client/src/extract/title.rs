//! Document title selection.
//!
//! First non-empty candidate wins:
//! 1. `og:title`, then `twitter:title` meta
//! 2. `<title>`
//! 3. first `<h1>`, then the first heading of any level
//! 4. the last URL path segment, humanized, or the host for a bare domain

use percent_encoding::percent_decode_str;
use url::Url;

use super::normalize::collapse_whitespace;
use super::tree::Tree;

const META_KEYS: &[&str] = &["og:title", "twitter:title"];

/// Pick a title for `tree`. Never empty.
pub fn extract_title(tree: &Tree, url: &Url) -> String {
    meta_title(tree)
        .or_else(|| element_title(tree))
        .or_else(|| heading_title(tree))
        .unwrap_or_else(|| title_from_url(url))
}

fn meta_title(tree: &Tree) -> Option<String> {
    let metas: Vec<_> = tree.elements_named("meta").into_iter().filter_map(|id| tree.element(id)).collect();

    META_KEYS.iter().find_map(|key| {
        metas.iter().find_map(|meta| {
            let names = [meta.attr("property"), meta.attr("name")];
            let matches = names.iter().flatten().any(|n| n.trim().eq_ignore_ascii_case(key));
            if !matches {
                return None;
            }
            meta.attr("content").map(collapse_whitespace).filter(|t| !t.is_empty())
        })
    })
}

fn element_title(tree: &Tree) -> Option<String> {
    tree.elements_named("title")
        .into_iter()
        .map(|id| collapse_whitespace(&tree.text_content(id)))
        .find(|t| !t.is_empty())
}

fn heading_title(tree: &Tree) -> Option<String> {
    let headings: Vec<_> = tree
        .descendants(tree.root())
        .into_iter()
        .filter_map(|id| tree.element(id).and_then(|el| el.heading_level()).map(|level| (id, level)))
        .collect();

    let text = |id| collapse_whitespace(&tree.text_content(id));

    headings
        .iter()
        .filter(|(_, level)| *level == 1)
        .map(|(id, _)| text(*id))
        .find(|t| !t.is_empty())
        .or_else(|| headings.iter().map(|(id, _)| text(*id)).find(|t| !t.is_empty()))
}

/// Title derived from the URL alone: `/docs/getting-started.html` becomes
/// "Getting started". Falls back to the host, then the full URL.
pub fn title_from_url(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .map(|s| humanize(&s))
        .filter(|s| !s.is_empty());

    segment
        .or_else(|| url.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

fn humanize(segment: &str) -> String {
    let is_extension = |ext: &str| (1..=5).contains(&ext.len()) && ext.bytes().all(|b| b.is_ascii_alphanumeric());
    let stem = match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && is_extension(ext) => stem,
        _ => segment,
    };
    let spaced = collapse_whitespace(&stem.replace(['-', '_', '+'], " "));

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
