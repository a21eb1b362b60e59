//! Arena-backed document tree built from the token stream.
//!
//! Building follows a small subset of the browser recovery rules so that
//! common tag soup lands in a sensible shape:
//! - paragraphs, list items, definition terms, table rows and cells, and
//!   options close implicitly when a sibling starts
//! - block-level starts close an open paragraph
//! - void elements never take children
//! - end tags with no open match are ignored
//! - comments and doctypes are discarded
//! - nesting stops at [`MAX_DEPTH`]; deeper elements become leaves and
//!   their content lands in the deepest open element

use super::tokenizer::{Token, Tokenizer};

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: &str, value: String) {
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, key: &str) {
        self.attrs.retain(|(k, _)| k != key);
    }

    /// Heading level for `h1`..`h6`.
    pub fn heading_level(&self) -> Option<usize> {
        heading_level(&self.name)
    }
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

/// Starting one of these closes an open `<p>`.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "dialog", "div", "dl", "dd", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "menu", "nav", "ol", "p", "pre", "section", "summary", "table", "ul",
];

/// Elements allowed inside `<head>`. Anything else implies the body started.
const HEAD_CONTENT: &[&str] = &["base", "link", "meta", "noscript", "script", "style", "template", "title"];

/// Search limits for closing an open element.
const SCOPE: &[&str] = &["applet", "caption", "html", "marquee", "object", "table", "td", "template", "th"];
const BUTTON_SCOPE: &[&str] = &["applet", "button", "caption", "html", "marquee", "object", "table", "td", "template", "th"];
const LIST_SCOPE: &[&str] = &["applet", "caption", "html", "marquee", "object", "ol", "table", "td", "template", "th", "ul"];
const DEFINITION_SCOPE: &[&str] = &["applet", "caption", "dl", "html", "marquee", "object", "table", "td", "template", "th"];
const TABLE_SCOPE: &[&str] = &["html", "table", "template"];
const ROW_SCOPE: &[&str] = &["html", "table", "template", "tr"];

/// Deepest element nesting kept in the tree. Rendering recurses once per
/// level, so this bounds its stack use.
pub const MAX_DEPTH: usize = 256;

pub fn heading_level(name: &str) -> Option<usize> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

impl Tree {
    /// Build a tree from arbitrary input. Never fails.
    pub fn parse(html: &str) -> Self {
        let mut builder = Builder::new();
        for token in Tokenizer::new(html) {
            builder.token(token);
        }
        builder.tree
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// True when any element survived parsing.
    pub fn has_elements(&self) -> bool {
        self.nodes.iter().any(|n| matches!(n.data, NodeData::Element(_)))
    }

    /// Unlink `id` from its parent. The node stays in the arena but is no
    /// longer reachable from the root.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|child| *child != id);
        }
    }

    /// Reachable descendants of `id` in document order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// Reachable elements named `name`, in document order.
    pub fn elements_named(&self, name: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(|el| el.name == name))
            .collect()
    }

    /// Concatenated text under `id`, verbatim. `<br>` contributes a newline.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for &child in self.children(id) {
            match &self.nodes[child].data {
                NodeData::Text(text) => out.push_str(text),
                NodeData::Element(el) if el.name == "br" => out.push('\n'),
                NodeData::Element(_) => self.collect_text(child, out),
                NodeData::Document => {}
            }
        }
    }
}

struct Builder {
    tree: Tree,
    /// Open elements, innermost last. Index 0 is the document node.
    stack: Vec<NodeId>,
}

impl Builder {
    fn new() -> Self {
        let root = Node { data: NodeData::Document, parent: None, children: Vec::new() };
        Self { tree: Tree { nodes: vec![root] }, stack: vec![0] }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(0)
    }

    fn current_name(&self) -> Option<&str> {
        self.tree.element(self.current()).map(|el| el.name.as_str())
    }

    fn token(&mut self, token: Token) {
        match token {
            Token::StartTag { name, attrs, self_closing } => self.start_tag(name, attrs, self_closing),
            Token::EndTag { name } => self.end_tag(&name),
            Token::Text(text) => self.text(text),
            Token::Comment(_) | Token::Doctype => {}
        }
    }

    fn append(&mut self, data: NodeData) -> NodeId {
        let parent = self.current();
        let id = self.tree.nodes.len();
        self.tree.nodes.push(Node { data, parent: Some(parent), children: Vec::new() });
        self.tree.nodes[parent].children.push(id);
        id
    }

    fn text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if self.current_name() == Some("head") && !text.trim().is_empty() {
            self.stack.pop();
        }

        let last = self.tree.nodes[self.current()].children.last().copied();
        if let Some(last) = last
            && let NodeData::Text(existing) = &mut self.tree.nodes[last].data
        {
            existing.push_str(&text);
            return;
        }
        self.append(NodeData::Text(text));
    }

    /// Position in the stack of the innermost open `name`, searching no
    /// deeper than the first element from `limits`.
    fn in_scope(&self, names: &[&str], limits: &[&str]) -> Option<usize> {
        for (pos, &id) in self.stack.iter().enumerate().rev() {
            let Some(el) = self.tree.element(id) else {
                return None;
            };
            if names.contains(&el.name.as_str()) {
                return Some(pos);
            }
            if limits.contains(&el.name.as_str()) {
                return None;
            }
        }
        None
    }

    fn close_in_scope(&mut self, names: &[&str], limits: &[&str]) -> bool {
        match self.in_scope(names, limits) {
            Some(pos) => {
                self.stack.truncate(pos);
                true
            }
            None => false,
        }
    }

    fn is_open(&self, name: &str) -> bool {
        self.stack.iter().any(|&id| self.tree.element(id).is_some_and(|el| el.name == name))
    }

    fn start_tag(&mut self, name: String, attrs: Vec<(String, String)>, self_closing: bool) {
        if matches!(name.as_str(), "html" | "body" | "head") && self.is_open(&name) {
            return;
        }
        if self.current_name() == Some("head") && !HEAD_CONTENT.contains(&name.as_str()) {
            self.stack.pop();
        }

        match name.as_str() {
            "li" => {
                self.close_in_scope(&["li"], LIST_SCOPE);
            }
            "dt" | "dd" => {
                self.close_in_scope(&["dt", "dd"], DEFINITION_SCOPE);
            }
            "tr" => {
                self.close_in_scope(&["tr"], TABLE_SCOPE);
            }
            "td" | "th" => {
                self.close_in_scope(&["td", "th"], ROW_SCOPE);
            }
            "thead" | "tbody" | "tfoot" => {
                self.close_in_scope(&["thead", "tbody", "tfoot"], TABLE_SCOPE);
            }
            "option" | "optgroup" => {
                if self.current_name() == Some("option") {
                    self.stack.pop();
                }
            }
            "a" => {
                self.close_in_scope(&["a"], SCOPE);
            }
            _ => {}
        }

        if CLOSES_P.contains(&name.as_str()) {
            self.close_in_scope(&["p"], BUTTON_SCOPE);
        }
        if heading_level(&name).is_some() && self.current_name().is_some_and(|n| heading_level(n).is_some()) {
            self.stack.pop();
        }

        let void = self_closing || VOID.contains(&name.as_str());
        let id = self.append(NodeData::Element(Element { name, attrs }));
        if !void && self.stack.len() <= MAX_DEPTH {
            self.stack.push(id);
        }
    }

    fn end_tag(&mut self, name: &str) {
        if VOID.contains(&name) || matches!(name, "html" | "body") {
            return;
        }

        let limits: &[&str] = match name {
            "td" | "th" => ROW_SCOPE,
            "tr" | "thead" | "tbody" | "tfoot" | "caption" => TABLE_SCOPE,
            "table" => &["html", "template"],
            "li" => LIST_SCOPE,
            "dt" | "dd" => DEFINITION_SCOPE,
            "p" => BUTTON_SCOPE,
            _ => SCOPE,
        };

        if self.close_in_scope(&[name], limits) {
            return;
        }
        if heading_level(name).is_some() {
            self.close_in_scope(&["h1", "h2", "h3", "h4", "h5", "h6"], SCOPE);
        }
    }
}
