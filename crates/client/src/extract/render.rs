//! Markdown-flavoured rendering of a cleaned tree.
//!
//! Block elements become paragraphs separated by blank lines. Inline runs
//! are whitespace-collapsed the way a browser would lay them out, except
//! inside `<pre>`, which is emitted verbatim in a code fence.

use std::sync::LazyLock;

use regex::Regex;

use super::tree::{Element, NodeData, NodeId, Tree};

/// Never rendered, whatever the noise configuration says.
const SKIPPED: &[&str] = &["head", "title", "meta", "link", "base", "script", "style", "template"];

const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "center", "dd", "details", "dialog", "dir", "div",
    "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "html", "li", "main", "menu", "nav", "ol", "p", "pre", "section", "summary", "table", "ul",
];

/// Upper bound on `colspan` padding.
const MAX_COLSPAN: usize = 32;

static LANGUAGE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:language|lang)-([A-Za-z0-9_+#.-]+)").expect("language class pattern is valid")
});

/// Render the body of `tree` (or the whole document when there is no
/// `<body>`) to Markdown. Output is not yet whitespace-normalized.
pub fn render(tree: &Tree) -> String {
    let start = tree.elements_named("body").first().copied().unwrap_or(tree.root());
    Renderer { tree }.blocks(start, "\n\n")
}

struct Renderer<'a> {
    tree: &'a Tree,
}

impl Renderer<'_> {
    /// Render the children of `id` as a sequence of blocks joined by `separator`.
    fn blocks(&self, id: NodeId, separator: &str) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut inline = String::new();

        for &child in self.tree.children(id) {
            match &self.tree.node(child).data {
                NodeData::Text(text) => push_collapsed(&mut inline, text),
                NodeData::Element(el) if SKIPPED.contains(&el.name.as_str()) => {}
                NodeData::Element(el) if BLOCKS.contains(&el.name.as_str()) => {
                    flush(&mut inline, &mut out);
                    let block = self.block(child, el);
                    if !block.trim().is_empty() {
                        out.push(block);
                    }
                }
                NodeData::Element(el) => self.inline(child, el, &mut inline),
                NodeData::Document => {}
            }
        }
        flush(&mut inline, &mut out);

        out.join(separator)
    }

    fn block(&self, id: NodeId, el: &Element) -> String {
        if let Some(level) = el.heading_level() {
            let text = self.inline_line(id);
            return if text.is_empty() { text } else { format!("{} {text}", "#".repeat(level)) };
        }

        match el.name.as_str() {
            "hr" => "---".to_string(),
            "pre" => self.code_block(id, el),
            "blockquote" => quote(&self.blocks(id, "\n\n")),
            "ul" | "menu" | "dir" => self.list(id, None),
            "ol" => {
                let start = el.attr("start").and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(1);
                self.list(id, Some(start))
            }
            "li" => indent_item("- ", &self.blocks(id, "\n")),
            "table" => self.table(id),
            "dl" => self.blocks(id, "\n"),
            "dd" => indent_item(": ", &self.blocks(id, "\n")),
            _ => self.blocks(id, "\n\n"),
        }
    }

    fn inline(&self, id: NodeId, el: &Element, out: &mut String) {
        match el.name.as_str() {
            "br" => out.push('\n'),
            "img" => {
                if let Some(alt) = el.attr("alt") {
                    push_collapsed(out, alt);
                }
            }
            "a" => {
                let text = self.inline_line(id);
                if text.is_empty() {
                    return;
                }
                match el.attr("href") {
                    Some(href) => out.push_str(&format!("[{}]({})", escape_link_text(&text), link_target(href))),
                    None => out.push_str(&text),
                }
            }
            "strong" | "b" => self.wrapped(id, "**", out),
            "em" | "i" | "cite" | "dfn" => self.wrapped(id, "*", out),
            "del" | "s" | "strike" => self.wrapped(id, "~~", out),
            "code" | "kbd" | "samp" | "tt" => {
                let code = collapse_spaces(&self.tree.text_content(id));
                let code = code.trim();
                if !code.is_empty() {
                    out.push_str(&code_span(code));
                }
            }
            "q" => self.wrapped(id, "\"", out),
            _ => self.inline_children(id, out),
        }
    }

    fn inline_children(&self, id: NodeId, out: &mut String) {
        for &child in self.tree.children(id) {
            match &self.tree.node(child).data {
                NodeData::Text(text) => push_collapsed(out, text),
                NodeData::Element(el) if SKIPPED.contains(&el.name.as_str()) => {}
                NodeData::Element(el) => self.inline(child, el, out),
                NodeData::Document => {}
            }
        }
    }

    /// Inline content of `id` flattened to a single trimmed line.
    fn inline_line(&self, id: NodeId) -> String {
        let mut buf = String::new();
        self.inline_children(id, &mut buf);
        collapse_spaces(&buf.replace('\n', " ")).trim().to_string()
    }

    /// Wrap the inline content of `id` in `marker`, keeping surrounding
    /// whitespace outside the markers.
    fn wrapped(&self, id: NodeId, marker: &str, out: &mut String) {
        let mut buf = String::new();
        self.inline_children(id, &mut buf);
        let inner = collapse_spaces(&buf.replace('\n', " "));
        let trimmed = inner.trim();
        if trimmed.is_empty() {
            push_collapsed(out, &inner);
            return;
        }
        if inner.starts_with(' ') {
            push_collapsed(out, " ");
        }
        out.push_str(marker);
        out.push_str(trimmed);
        out.push_str(marker);
        if inner.ends_with(' ') {
            out.push(' ');
        }
    }

    fn code_block(&self, id: NodeId, el: &Element) -> String {
        let raw = self.tree.text_content(id);
        let body = raw.strip_prefix('\n').unwrap_or(&raw).trim_end_matches(['\n', '\r']);
        if body.trim().is_empty() {
            return String::new();
        }

        let language = self
            .tree
            .children(id)
            .iter()
            .filter_map(|child| self.tree.element(*child))
            .find(|child| child.name == "code")
            .and_then(language_of)
            .or_else(|| language_of(el))
            .unwrap_or_default();

        let fence = "`".repeat(longest_backtick_run(body).max(2) + 1);
        format!("{fence}{language}\n{body}\n{fence}")
    }

    fn list(&self, id: NodeId, start: Option<i64>) -> String {
        let mut items: Vec<String> = Vec::new();
        let mut number = start.unwrap_or(1);

        for &child in self.tree.children(id) {
            match &self.tree.node(child).data {
                NodeData::Element(el) if el.name == "li" => {
                    let marker = match start {
                        Some(_) => format!("{number}. "),
                        None => "- ".to_string(),
                    };
                    number += 1;
                    let body = self.blocks(child, "\n");
                    if !body.trim().is_empty() {
                        items.push(indent_item(&marker, &body));
                    }
                }
                NodeData::Element(el) if matches!(el.name.as_str(), "ul" | "ol") => {
                    // A list nested directly in a list belongs to the previous item.
                    let nested = self.block(child, el);
                    if nested.trim().is_empty() {
                        continue;
                    }
                    let nested = indent(&nested, "  ");
                    match items.last_mut() {
                        Some(last) => {
                            last.push('\n');
                            last.push_str(&nested);
                        }
                        None => items.push(nested),
                    }
                }
                NodeData::Element(el) if !SKIPPED.contains(&el.name.as_str()) => {
                    let text = if BLOCKS.contains(&el.name.as_str()) {
                        self.block(child, el)
                    } else {
                        let mut buf = String::new();
                        self.inline(child, el, &mut buf);
                        collapse_spaces(&buf).trim().to_string()
                    };
                    if !text.trim().is_empty() {
                        items.push(text);
                    }
                }
                NodeData::Text(text) if !text.trim().is_empty() => items.push(collapse_spaces(text).trim().to_string()),
                _ => {}
            }
        }

        items.join("\n")
    }

    fn table(&self, id: NodeId) -> String {
        let mut caption = None;
        let mut rows: Vec<Vec<String>> = Vec::new();

        for &child in self.tree.children(id) {
            let Some(el) = self.tree.element(child) else {
                continue;
            };
            match el.name.as_str() {
                "caption" => caption = Some(self.inline_line(child)).filter(|c| !c.is_empty()),
                "tr" => rows.extend(self.row(child)),
                "thead" | "tbody" | "tfoot" => {
                    for &row in self.tree.children(child) {
                        if self.tree.element(row).is_some_and(|r| r.name == "tr") {
                            rows.extend(self.row(row));
                        }
                    }
                }
                _ => {}
            }
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return caption.unwrap_or_default();
        }

        let mut lines = Vec::with_capacity(rows.len() + 1);
        for (i, mut row) in rows.into_iter().enumerate() {
            row.resize(width, String::new());
            lines.push(format!("| {} |", row.join(" | ")));
            if i == 0 {
                lines.push(format!("|{}", " --- |".repeat(width)));
            }
        }

        let table = lines.join("\n");
        match caption {
            Some(caption) => format!("{caption}\n\n{table}"),
            None => table,
        }
    }

    /// Cells of one `<tr>`, or `None` for a row without cells.
    fn row(&self, id: NodeId) -> Option<Vec<String>> {
        let mut cells = Vec::new();
        for &child in self.tree.children(id) {
            let Some(el) = self.tree.element(child) else {
                continue;
            };
            if el.name != "td" && el.name != "th" {
                continue;
            }
            cells.push(self.inline_line(child).replace('|', "\\|"));
            let span = el.attr("colspan").and_then(|s| s.trim().parse::<usize>().ok()).unwrap_or(1);
            for _ in 1..span.clamp(1, MAX_COLSPAN) {
                cells.push(String::new());
            }
        }
        (!cells.is_empty()).then_some(cells)
    }
}

fn flush(inline: &mut String, out: &mut Vec<String>) {
    let text = inline
        .split('\n')
        .map(|line| collapse_spaces(line).trim().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();
    if !text.is_empty() {
        out.push(text.to_string());
    }
    inline.clear();
}

/// Append `text` with whitespace runs folded to one space.
fn push_collapsed(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !out.ends_with(' ') && !out.ends_with('\n') {
                out.push(' ');
            }
        } else {
            out.push(ch);
        }
    }
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_collapsed(&mut out, text);
    out
}

/// Prefix the first line with `marker` and indent continuation lines to
/// line up under the item text.
fn indent_item(marker: &str, body: &str) -> String {
    let pad = " ".repeat(marker.len());
    body.lines()
        .enumerate()
        .map(|(i, line)| match (i, line.is_empty()) {
            (0, _) => format!("{marker}{line}"),
            (_, true) => String::new(),
            _ => format!("{pad}{line}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent(body: &str, pad: &str) -> String {
    body.lines()
        .map(|line| if line.is_empty() { String::new() } else { format!("{pad}{line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote(body: &str) -> String {
    body.lines()
        .map(|line| if line.is_empty() { ">".to_string() } else { format!("> {line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

fn code_span(code: &str) -> String {
    let fence = "`".repeat(longest_backtick_run(code) + 1);
    if fence.len() > 1 { format!("{fence} {code} {fence}") } else { format!("`{code}`") }
}

pub(super) fn longest_backtick_run(text: &str) -> usize {
    text.split(|c: char| c != '`').map(str::len).max().unwrap_or(0)
}

fn language_of(el: &Element) -> Option<String> {
    let class = el.attr("class")?;
    LANGUAGE_CLASS.captures(class).map(|c| c[1].to_ascii_lowercase())
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

fn link_target(href: &str) -> String {
    if href.contains([' ', '(', ')']) { format!("<{href}>") } else { href.to_string() }
}
