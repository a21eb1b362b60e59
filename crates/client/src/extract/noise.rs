//! Noise removal: configured tags, hidden elements, and class/id signatures.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use surf_core::config::NoiseConfig;

use super::tree::{Element, NodeId, Tree};

/// Never removed by signature or visibility heuristics.
const PROTECTED: &[&str] = &["html", "head", "body", "main", "article"];

/// Code containers: heuristics do not apply inside them, tag removal still does.
const VERBATIM: &[&str] = &["pre", "code"];

static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*(?:display\s*:\s*none|visibility\s*:\s*hidden)\s*(?:!important\s*)?(?:;|$)")
        .expect("hidden style pattern is valid")
});

#[derive(Debug, Clone)]
pub struct NoiseFilter {
    tags: HashSet<String>,
    tokens: HashSet<String>,
}

impl NoiseFilter {
    pub fn new(config: &NoiseConfig) -> Self {
        let normalize = |items: &[String]| -> HashSet<String> {
            items.iter().map(|s| s.trim().to_ascii_lowercase()).filter(|s| !s.is_empty()).collect()
        };
        Self { tags: normalize(&config.tags), tokens: normalize(&config.tokens) }
    }

    /// Detach every noise element from `tree`. Returns how many subtrees were
    /// removed.
    pub fn strip(&self, tree: &mut Tree) -> usize {
        let mut doomed = Vec::new();
        let mut stack: Vec<(NodeId, bool)> = vec![(tree.root(), false)];

        while let Some((id, verbatim)) = stack.pop() {
            for &child in tree.children(id) {
                let Some(el) = tree.element(child) else {
                    continue;
                };
                let name = el.name.as_str();
                if self.tags.contains(name) {
                    doomed.push(child);
                    continue;
                }
                if !verbatim && !PROTECTED.contains(&name) && (is_hidden(el) || self.matches_signature(el)) {
                    doomed.push(child);
                    continue;
                }
                stack.push((child, verbatim || VERBATIM.contains(&name)));
            }
        }

        for &id in &doomed {
            tree.detach(id);
        }
        doomed.len()
    }

    fn matches_signature(&self, el: &Element) -> bool {
        if self.tokens.is_empty() {
            return false;
        }
        ["class", "id", "role"]
            .iter()
            .filter_map(|key| el.attr(key))
            .flat_map(|value| value.split(|c: char| c.is_whitespace() || c == '-' || c == '_'))
            .any(|token| !token.is_empty() && self.tokens.contains(&token.to_ascii_lowercase()))
    }
}

fn is_hidden(el: &Element) -> bool {
    el.attr("hidden").is_some()
        || el.attr("aria-hidden").is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
        || el.attr("style").is_some_and(|style| HIDDEN_STYLE.is_match(style))
}
