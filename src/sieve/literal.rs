//! Leaf values of the grammar: strings, string lists, multi-line text,
//! numbers and comments. Each one decodes from its token text and writes
//! itself back in canonical form through `Display`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::sieve::lexer::QUOTED_TEXT;

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(QUOTED_TEXT).expect("valid regex"));

static MULTI_LINE_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i:text):[ \t]*(?:#([^\r\n]*))?\r\n").expect("valid regex"));

/// A `"..."` string, holding the decoded value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedString(pub String);

impl QuotedString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Decodes a quoted-string token, quotes included.
    pub fn from_token(token: &str) -> Self {
        let inner = token
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(token);
        Self(unescape(inner))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuotedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_sieve_string(&self.0))
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

pub fn escape_sieve_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// An ordered `[...]` list of strings. Order is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringList(pub Vec<QuotedString>);

impl StringList {
    pub fn from_token(token: &str) -> Self {
        Self(
            QUOTED
                .find_iter(token)
                .map(|m| QuotedString::from_token(m.as_str()))
                .collect(),
        )
    }

    pub fn single(value: QuotedString) -> Self {
        Self(vec![value])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(QuotedString::value)
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.0.push(QuotedString::new(value));
    }
}

impl<S: Into<String>> FromIterator<S> for StringList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(QuotedString::new).collect())
    }
}

impl fmt::Display for StringList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}

/// A `text:` string running up to a line holding a single `.`.
///
/// `value` keeps the CRLF ending each body line (RFC 5228 section 2.4.2).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiLine {
    pub value: String,
    /// Hash comment written after `text:` on the opening line.
    pub comment: Option<String>,
}

impl MultiLine {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            comment: None,
        }
    }

    /// Decodes a multi-line token whose line endings are already CRLF.
    pub fn from_token(token: &str) -> Self {
        let (comment, body) = match MULTI_LINE_HEAD.captures(token) {
            Some(caps) => (
                caps.get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|c| !c.is_empty()),
                &token[caps.get(0).map_or(0, |m| m.end())..],
            ),
            None => (None, token),
        };
        let body = body
            .strip_suffix(".\r\n")
            .or_else(|| body.strip_suffix('.'))
            .unwrap_or(body);
        let value = body
            .split_inclusive("\r\n")
            .map(|line| if line.starts_with("..") { &line[1..] } else { line })
            .collect();
        Self { value, comment }
    }
}

impl fmt::Display for MultiLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("text:")?;
        if let Some(comment) = &self.comment {
            write!(f, " # {comment}")?;
        }
        f.write_str("\r\n")?;
        for line in self.value.split_inclusive("\r\n") {
            if line.starts_with('.') {
                f.write_str(".")?;
            }
            f.write_str(line)?;
            if !line.ends_with("\r\n") {
                f.write_str("\r\n")?;
            }
        }
        f.write_str(".\r\n")
    }
}

/// A number as written, e.g. `100` or `10M`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Number(pub String);

impl Default for Number {
    fn default() -> Self {
        Self("0".to_string())
    }
}

impl Number {
    pub fn new(value: u64) -> Self {
        Self(value.to_string())
    }

    /// The value with any K/M/G quantifier applied; `None` on overflow.
    pub fn value(&self) -> Option<u64> {
        let (digits, shift) = match self.0.chars().last() {
            Some('K' | 'k') => (&self.0[..self.0.len() - 1], 10),
            Some('M' | 'm') => (&self.0[..self.0.len() - 1], 20),
            Some('G' | 'g') => (&self.0[..self.0.len() - 1], 30),
            _ => (self.0.as_str(), 0),
        };
        digits.parse::<u64>().ok()?.checked_mul(1u64 << shift)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Either string form; used where free text is customary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Text {
    Quoted(QuotedString),
    MultiLine(MultiLine),
}

impl Default for Text {
    fn default() -> Self {
        Self::Quoted(QuotedString::default())
    }
}

impl Text {
    pub fn value(&self) -> &str {
        match self {
            Self::Quoted(s) => s.value(),
            Self::MultiLine(m) => &m.value,
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quoted(s) => write!(f, "{s}"),
            Self::MultiLine(m) => write!(f, "{m}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comment {
    /// `# text`, stored trimmed.
    Hash(String),
    /// `/*text*/`, stored verbatim.
    Bracket(String),
}

impl Comment {
    pub fn from_hash_token(token: &str) -> Self {
        Self::Hash(token.strip_prefix('#').unwrap_or(token).trim().to_string())
    }

    pub fn from_bracket_token(token: &str) -> Self {
        let inner = token
            .strip_prefix("/*")
            .and_then(|s| s.strip_suffix("*/"))
            .unwrap_or(token);
        Self::Bracket(inner.to_string())
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Hash(t) | Self::Bracket(t) => t,
        }
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash(text) if text.is_empty() => f.write_str("#"),
            Self::Hash(text) => write!(f, "# {text}"),
            Self::Bracket(text) => write!(f, "/*{text}*/"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_string_unescapes() {
        let s = QuotedString::from_token(r#""a \"b\" c\\d""#);
        assert_eq!(s.value(), r#"a "b" c\d"#);
        assert_eq!(s.to_string(), r#""a \"b\" c\\d""#);
    }

    #[test]
    fn test_string_list_keeps_order() {
        let list = StringList::from_token("[\"a\", \"b\",\"c\"]");
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(list.to_string(), "[\"a\",\"b\",\"c\"]");
    }

    #[test]
    fn test_string_list_with_comma_inside_element() {
        let list = StringList::from_token(r#"["a, b", "c\"]"]"#);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["a, b", "c\"]"]);
    }

    #[test]
    fn test_empty_string_list() {
        let list = StringList::from_token("[]");
        assert!(list.is_empty());
        assert_eq!(list.to_string(), "[]");
    }

    #[test]
    fn test_multiline_decode_and_encode() {
        let ml = MultiLine::from_token("text: # reason\r\nHello\r\n..dotted\r\n.\r\n");
        assert_eq!(ml.comment.as_deref(), Some("reason"));
        assert_eq!(ml.value, "Hello\r\n.dotted\r\n");
        assert_eq!(ml.to_string(), "text: # reason\r\nHello\r\n..dotted\r\n.\r\n");
    }

    #[test]
    fn test_multiline_empty_body() {
        let ml = MultiLine::from_token("text:\r\n.\r\n");
        assert_eq!(ml.value, "");
        assert_eq!(ml.to_string(), "text:\r\n.\r\n");
    }

    #[test]
    fn test_multiline_single_empty_line() {
        let ml = MultiLine::from_token("text:\r\n\r\n.\r\n");
        assert_eq!(ml.value, "\r\n");
        assert_ne!(ml, MultiLine::from_token("text:\r\n.\r\n"));
        assert_eq!(ml.to_string(), "text:\r\n\r\n.\r\n");
    }

    #[test]
    fn test_multiline_new_without_final_crlf() {
        assert_eq!(MultiLine::new("Hi").to_string(), "text:\r\nHi\r\n.\r\n");
    }

    #[test]
    fn test_number_quantifiers() {
        assert_eq!(Number("100".into()).value(), Some(100));
        assert_eq!(Number("2K".into()).value(), Some(2048));
        assert_eq!(Number("1M".into()).value(), Some(1 << 20));
        assert_eq!(Number("3g".into()).value(), Some(3 << 30));
        assert_eq!(Number("99999999999999999999".into()).value(), None);
    }

    #[test]
    fn test_comments() {
        assert_eq!(Comment::from_hash_token("#  note \r\n"), Comment::Hash("note".into()));
        let c = Comment::from_bracket_token("/* keep me */");
        assert_eq!(c.text(), " keep me ");
        assert_eq!(c.to_string(), "/* keep me */");
    }
}
