//! Whitespace normalization for rendered and plain-text content.
//!
//! Outside fenced code blocks: trailing whitespace is stripped from every
//! line, runs of blank lines collapse to one, and the text is trimmed at
//! both ends. Lines inside a fence pass through untouched, including fences
//! nested in a `> ` blockquote. The function is idempotent and never
//! lengthens its input.

/// Normalize line structure. See the module docs for the rules.
pub fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut fence: Option<usize> = None;
    let mut pending_blank = false;

    for line in text.lines() {
        if let Some(open) = fence {
            lines.push(line);
            if closes_fence(line, open) {
                fence = None;
            }
            continue;
        }

        let line = line.trim_end();
        if line.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }
        if pending_blank {
            lines.push("");
            pending_blank = false;
        }

        let line = if lines.is_empty() { line.trim_start() } else { line };
        fence = opens_fence(line);
        lines.push(line);
    }

    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_bytes`, backing off to a char boundary.
pub fn truncate_to_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// `line` with leading indentation and blockquote markers removed.
fn unquoted(line: &str) -> &str {
    line.trim_start_matches(|c: char| c == '>' || c.is_whitespace())
}

/// Backtick count of a fence opener, if `line` is one.
fn opens_fence(line: &str) -> Option<usize> {
    let ticks = unquoted(line).bytes().take_while(|b| *b == b'`').count();
    (ticks >= 3).then_some(ticks)
}

fn closes_fence(line: &str, open: usize) -> bool {
    let trimmed = unquoted(line).trim_end();
    trimmed.len() >= open && trimmed.bytes().all(|b| b == b'`')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_collapses_blank_lines() {
        let input = "\n\n  Title  \n\n\n\nBody line   \n\t\nEnd\n\n";
        assert_eq!(normalize_whitespace(input), "Title\n\nBody line\n\nEnd");
    }

    #[test]
    fn test_preserves_fenced_content() {
        let input = "Intro\n\n```rust\nfn main() {   \n\n\n    let x = 1;\n}\n```\n\n\nAfter";
        assert_eq!(
            normalize_whitespace(input),
            "Intro\n\n```rust\nfn main() {   \n\n\n    let x = 1;\n}\n```\n\nAfter"
        );
    }

    #[test]
    fn test_longer_fence_not_closed_by_shorter() {
        let input = "````\n```\ninner  \n```\n````\ntail  ";
        assert_eq!(normalize_whitespace(input), "````\n```\ninner  \n```\n````\ntail");
    }

    #[test]
    fn test_preserves_quoted_fence() {
        let input = "> ```\n> a   \n>\n>\n> b  \n> ```\n> after   ";
        assert_eq!(normalize_whitespace(input), "> ```\n> a   \n>\n>\n> b  \n> ```\n> after");
    }

    #[test]
    fn test_crlf_input() {
        assert_eq!(normalize_whitespace("a\r\n\r\n\r\nb\r\n"), "a\n\nb");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "  lead\n\n\n  indented  \n```\n  code  \n\n\n```\n\n",
            "```\nunclosed\n\n   \n",
            "",
            "\n\n\n",
            "one\ntwo",
        ];
        for sample in samples {
            let once = normalize_whitespace(sample);
            assert_eq!(normalize_whitespace(&once), once, "sample: {sample:?}");
            assert!(once.len() <= sample.len());
        }
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_truncate_to_boundary() {
        assert_eq!(truncate_to_boundary("hello", 10), "hello");
        assert_eq!(truncate_to_boundary("hello", 3), "hel");
        // 'é' is two bytes; cutting inside it backs off.
        assert_eq!(truncate_to_boundary("aé", 2), "a");
        assert_eq!(truncate_to_boundary("", 0), "");
    }
}
