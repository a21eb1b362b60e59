//! Content-type classification for fetched payloads.
//!
//! Pure and total: every declared type maps to exactly one `ContentKind`.
//! Anything not on the allowlist, including a missing header, is
//! `UnsupportedBinary` and must be rejected before parsing.

use surf_core::ContentKind;
use surf_core::config::ContentTypeAllowlist;

/// Media-type essence of a `Content-Type` value: parameters stripped,
/// whitespace trimmed, lower-cased.
pub fn essence(declared: &str) -> String {
    declared.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

/// Decide which extractor applies to a payload with the given declared type.
pub fn classify(declared: Option<&str>, allowlist: &ContentTypeAllowlist) -> ContentKind {
    let Some(declared) = declared else {
        return ContentKind::UnsupportedBinary;
    };

    let essence = essence(declared);
    if essence.is_empty() {
        return ContentKind::UnsupportedBinary;
    }

    let listed = |entries: &[String]| entries.iter().any(|entry| entry.trim().eq_ignore_ascii_case(&essence));

    if listed(&allowlist.html) {
        ContentKind::Html
    } else if listed(&allowlist.json) {
        ContentKind::Json
    } else if listed(&allowlist.plain_text) {
        ContentKind::PlainText
    } else {
        ContentKind::UnsupportedBinary
    }
}
