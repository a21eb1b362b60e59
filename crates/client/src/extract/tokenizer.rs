//! Forgiving tag-soup tokenizer.
//!
//! Never fails: unterminated constructs degrade to text or are dropped, and
//! a stray `<` that does not open markup is literal text. Tag and attribute
//! names are lower-cased; text and attribute values are entity-decoded.

use super::entities;

/// Elements whose content is not markup. Text runs until the matching
/// end tag.
const RAW_TEXT: &[&str] = &["script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes"];

/// Raw-text elements whose content still has character references decoded.
const ESCAPABLE_RAW_TEXT: &[&str] = &["textarea", "title"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag { name: String, attrs: Vec<(String, String)>, self_closing: bool },
    EndTag { name: String },
    Text(String),
    Comment(String),
    Doctype,
}

pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    raw_text: Option<String>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0, raw_text: None }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn starts_markup(byte: u8) -> bool {
        byte.is_ascii_alphabetic() || matches!(byte, b'/' | b'!' | b'?')
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.bytes()[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Consume text up to the next byte that opens markup.
    fn read_text(&mut self) -> Token {
        let bytes = self.bytes();
        let start = self.pos;
        let mut i = start;
        while i < bytes.len() {
            if bytes[i] == b'<' && i > start && i + 1 < bytes.len() && Self::starts_markup(bytes[i + 1]) {
                break;
            }
            i += 1;
        }
        self.pos = i;
        Token::Text(entities::decode(&self.input[start..i]).into_owned())
    }

    /// Consume the body of a raw-text element up to, not including, its end tag.
    fn read_raw_text(&mut self, element: &str) -> Option<Token> {
        let rest = self.rest();
        let close = format!("</{element}");
        let end = find_ascii_case_insensitive(rest, &close).unwrap_or(rest.len());
        self.pos += end;

        let body = &rest[..end];
        if body.is_empty() {
            return None;
        }
        let text = if ESCAPABLE_RAW_TEXT.contains(&element) {
            entities::decode(body).into_owned()
        } else {
            body.to_string()
        };
        Some(Token::Text(text))
    }

    /// Consume `<!-- ... -->`. An unterminated comment runs to the end of input.
    fn read_comment(&mut self) -> Token {
        let body_start = self.pos + 4;
        match self.input[body_start..].find("-->") {
            Some(end) => {
                self.pos = body_start + end + 3;
                Token::Comment(self.input[body_start..body_start + end].to_string())
            }
            None => {
                self.pos = self.input.len();
                Token::Comment(self.input[body_start..].to_string())
            }
        }
    }

    /// Consume `<!...>` or `<?...>` up to the next `>`.
    fn read_bogus(&mut self) -> Token {
        let rest = self.rest();
        let is_doctype = rest.as_bytes().get(2..9).is_some_and(|b| b.eq_ignore_ascii_case(b"doctype"));
        let end = rest.find('>').map(|i| i + 1).unwrap_or(rest.len());
        let body = rest[2..end].trim_end_matches('>');
        self.pos += end;
        if is_doctype { Token::Doctype } else { Token::Comment(body.to_string()) }
    }

    fn read_name(&mut self) -> String {
        let bytes = self.bytes();
        let start = self.pos;
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if b.is_ascii_whitespace() || b == b'/' || b == b'>' {
                break;
            }
            self.pos += 1;
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    /// Consume `</name ...>`.
    fn read_end_tag(&mut self) -> Option<Token> {
        self.pos += 2;
        let name = self.read_name();
        let rest = self.rest();
        match rest.find('>') {
            Some(i) => self.pos += i + 1,
            None => self.pos = self.input.len(),
        }
        if name.is_empty() { None } else { Some(Token::EndTag { name }) }
    }

    /// Consume `<name attr=value ...>`. A tag cut off by end of input is
    /// dropped.
    fn read_start_tag(&mut self) -> Option<Token> {
        self.pos += 1;
        let name = self.read_name();
        let mut attrs: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let bytes = self.bytes();
            if self.pos >= bytes.len() {
                return None;
            }
            match bytes[self.pos] {
                b'>' => {
                    self.pos += 1;
                    break;
                }
                b'/' => {
                    self.pos += 1;
                    if self.pos < bytes.len() && bytes[self.pos] == b'>' {
                        self.pos += 1;
                        self_closing = true;
                        break;
                    }
                }
                _ => {
                    let (key, value) = self.read_attribute();
                    if !key.is_empty() && !attrs.iter().any(|(k, _)| *k == key) {
                        attrs.push((key, value));
                    }
                }
            }
        }

        if !self_closing && RAW_TEXT.contains(&name.as_str()) {
            self.raw_text = Some(name.clone());
        }
        Some(Token::StartTag { name, attrs, self_closing })
    }

    fn read_attribute(&mut self) -> (String, String) {
        let bytes = self.bytes();
        let start = self.pos;
        // A leading '=' belongs to the name.
        if bytes[self.pos] == b'=' {
            self.pos += 1;
        }
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if b.is_ascii_whitespace() || matches!(b, b'/' | b'>' | b'=') {
                break;
            }
            self.pos += 1;
        }
        let key = self.input[start..self.pos].to_ascii_lowercase();

        self.skip_whitespace();
        if self.pos >= bytes.len() || bytes[self.pos] != b'=' {
            return (key, String::new());
        }
        self.pos += 1;
        self.skip_whitespace();
        if self.pos >= bytes.len() {
            return (key, String::new());
        }

        let raw = match bytes[self.pos] {
            quote @ (b'"' | b'\'') => {
                let value_start = self.pos + 1;
                match bytes[value_start..].iter().position(|b| *b == quote) {
                    Some(len) => {
                        self.pos = value_start + len + 1;
                        &self.input[value_start..value_start + len]
                    }
                    None => {
                        self.pos = bytes.len();
                        &self.input[value_start..]
                    }
                }
            }
            _ => {
                let value_start = self.pos;
                while self.pos < bytes.len() && !bytes[self.pos].is_ascii_whitespace() && bytes[self.pos] != b'>' {
                    self.pos += 1;
                }
                &self.input[value_start..self.pos]
            }
        };

        (key, entities::decode(raw).into_owned())
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.pos >= self.input.len() {
                return None;
            }

            if let Some(element) = self.raw_text.take() {
                if let Some(token) = self.read_raw_text(&element) {
                    return Some(token);
                }
                continue;
            }

            let bytes = self.bytes();
            let next = bytes.get(self.pos + 1).copied();
            if bytes[self.pos] != b'<' || !next.is_some_and(Self::starts_markup) {
                return Some(self.read_text());
            }

            let token = match next {
                Some(b'!') if self.rest().starts_with("<!--") => Some(self.read_comment()),
                Some(b'!' | b'?') => Some(self.read_bogus()),
                Some(b'/') => match bytes.get(self.pos + 2) {
                    Some(b) if b.is_ascii_alphabetic() => self.read_end_tag(),
                    _ => Some(self.read_bogus()),
                },
                _ => self.read_start_tag(),
            };

            if let Some(token) = token {
                return Some(token);
            }
        }
    }
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    (0..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}
