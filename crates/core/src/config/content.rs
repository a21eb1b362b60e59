//! Read-pipeline policy data: accepted media types and HTML noise signatures.

use serde::{Deserialize, Serialize};

/// Text-like media types the read pipeline accepts, grouped by extractor.
///
/// Entries are media-type essences (`type/subtype`, no parameters) and are
/// matched exactly after lower-casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentTypeAllowlist {
    pub html: Vec<String>,
    pub plain_text: Vec<String>,
    pub json: Vec<String>,
}

impl Default for ContentTypeAllowlist {
    fn default() -> Self {
        Self {
            html: strings(&["text/html", "application/xhtml+xml"]),
            plain_text: strings(&[
                "text/plain",
                "text/markdown",
                "text/xml",
                "application/xml",
                "text/csv",
                "text/css",
                "text/javascript",
                "application/javascript",
                "text/yaml",
                "application/x-yaml",
            ]),
            json: strings(&["application/json", "application/ld+json"]),
        }
    }
}

/// Heuristic noise signatures for HTML cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Element names removed wholesale, children included.
    pub tags: Vec<String>,

    /// `class`/`id` tokens that mark an element as noise. An attribute value
    /// is split on whitespace, `-` and `_`; any token equal to an entry
    /// (case-insensitive) matches.
    pub tokens: Vec<String>,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            tags: strings(&[
                "script", "style", "noscript", "template", "svg", "math", "iframe", "frame", "frameset", "object",
                "embed", "applet", "video", "audio", "canvas", "source", "track", "map", "nav", "footer", "aside",
                "form", "button", "input", "select", "textarea", "dialog",
            ]),
            tokens: strings(&[
                "nav",
                "navbar",
                "navigation",
                "menu",
                "breadcrumb",
                "breadcrumbs",
                "sidebar",
                "footer",
                "ad",
                "ads",
                "advert",
                "adverts",
                "advertisement",
                "advertising",
                "sponsor",
                "sponsored",
                "promo",
                "cookie",
                "cookies",
                "consent",
                "gdpr",
                "banner",
                "popup",
                "modal",
                "newsletter",
                "subscribe",
                "share",
                "sharing",
                "social",
                "related",
                "comments",
            ]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
