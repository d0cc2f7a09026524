//! SIEVE script tokenizer (RFC 5228 section 8).
//!
//! All token shapes are composed into one alternation, tried in a fixed
//! precedence order at the current position. The trailing whitespace and
//! unknown alternatives between them cover every character, so scanning
//! never skips input.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// A double-quoted string with backslash escapes; may span lines.
pub(crate) const QUOTED_TEXT: &str = r#""(?:\\(?s:.)|[^"\\])*""#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `["a", "b"]`
    StringList,
    /// `"text"`
    QuotedString,
    /// `text:` CRLF ... CRLF `.` CRLF
    MultiLine,
    /// `# ...`
    HashComment,
    /// `/* ... */`
    BracketComment,
    /// `{`
    BlockStart,
    /// `}`
    BlockEnd,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    Comma,
    Semicolon,
    /// `:word`
    Tag,
    /// A bare word like `if`, `header`, `fileinto`.
    Identifier,
    /// Digits with an optional K/M/G quantifier.
    Number,
    Whitespace,
    /// Anything else; always a syntax error.
    Unknown,
}

/// Token patterns in precedence order. Inner groups must not capture.
const TOKEN_PATTERNS: &[(TokenKind, &str)] = &[
    (TokenKind::StringList, r#"\[\s*(?:"(?:\\(?s:.)|[^"\\])*"(?:\s*,\s*"(?:\\(?s:.)|[^"\\])*")*)?\s*\]"#),
    (TokenKind::QuotedString, QUOTED_TEXT),
    (TokenKind::MultiLine, r"(?i:text):[ \t]*(?:#[^\r\n]*)?\r\n(?:[^\r\n]*\r\n)*?\.(?:\r\n|\z)"),
    (TokenKind::HashComment, r"#[^\r\n]*"),
    (TokenKind::BracketComment, r"/\*(?s:.)*?\*/"),
    (TokenKind::BlockStart, r"\{"),
    (TokenKind::BlockEnd, r"\}"),
    (TokenKind::LeftParen, r"\("),
    (TokenKind::RightParen, r"\)"),
    (TokenKind::Comma, r","),
    (TokenKind::Semicolon, r";"),
    (TokenKind::Tag, r":[a-zA-Z_][a-zA-Z0-9_]*"),
    (TokenKind::Identifier, r"[a-zA-Z_][a-zA-Z0-9_]*"),
    (TokenKind::Number, r"[0-9]+[KMGkmg]?"),
    (TokenKind::Whitespace, r"[ \t\r\n]+"),
    (TokenKind::Unknown, r"[^ \t\r\n]+"),
];

/// Compiled once; shared read-only by every parse.
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    let composed = TOKEN_PATTERNS
        .iter()
        .map(|(_, pattern)| format!("({pattern})"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&composed).expect("token patterns are valid")
});

static LINE_ENDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n").expect("valid regex"));

/// Rewrites every line ending as CRLF, the protocol convention.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    LINE_ENDING.replace_all(text, "\r\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the token in the normalized script.
    pub offset: usize,
    /// 1-based line the token starts on.
    pub line: usize,
}

impl Token<'_> {
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Scans the token starting at `pos`, returning its kind, text and the
/// position just past it. `None` at end of input.
pub fn next_token(text: &str, pos: usize) -> Option<(TokenKind, &str, usize)> {
    if pos >= text.len() {
        return None;
    }
    let caps = TOKEN_REGEX.captures_at(text, pos)?;
    TOKEN_PATTERNS
        .iter()
        .enumerate()
        .find_map(|(i, (kind, _))| caps.get(i + 1).map(|m| (*kind, m)))
        .filter(|(_, m)| m.start() == pos)
        .map(|(kind, m)| (kind, m.as_str(), m.end()))
}

/// Iterator over the tokens of an already normalized script.
pub struct Tokenizer<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0, line: 1 }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let (kind, text, next) = next_token(self.text, self.pos)?;
        let token = Token {
            kind,
            text,
            offset: self.pos,
            line: self.line,
        };
        self.pos = next;
        self.line += text.matches('\n').count();
        Some(token)
    }
}

/// Tokenizes `input` after normalizing its line endings.
pub fn tokenize(input: &str) -> Vec<(TokenKind, String)> {
    let text = normalize_line_endings(input);
    Tokenizer::new(&text)
        .map(|t| (t.kind, t.text.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .into_iter()
            .map(|(k, _)| k)
            .filter(|k| *k != TokenKind::Whitespace)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = tokenize("require \"fileinto\";");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], (TokenKind::Identifier, "require".to_string()));
        assert_eq!(tokens[2], (TokenKind::QuotedString, "\"fileinto\"".to_string()));
        assert_eq!(tokens[3].0, TokenKind::Semicolon);
    }

    #[test]
    fn test_tags_and_strings() {
        let k = kinds("header :contains \"Subject\" \"SPAM\"");
        assert_eq!(
            k,
            vec![
                TokenKind::Identifier,
                TokenKind::Tag,
                TokenKind::QuotedString,
                TokenKind::QuotedString
            ]
        );
    }

    #[test]
    fn test_string_list_is_one_token() {
        let tokens = tokenize("[\"a\", \"b\"]");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].0, TokenKind::StringList);
    }

    #[test]
    fn test_empty_string_list() {
        assert_eq!(kinds("[ ]"), vec![TokenKind::StringList]);
    }

    #[test]
    fn test_escaped_quote_stays_inside_string() {
        let tokens = tokenize(r#""say \"hi\"" ;"#);
        assert_eq!(tokens[0], (TokenKind::QuotedString, r#""say \"hi\"""#.to_string()));
    }

    #[test]
    fn test_number_with_suffix() {
        let tokens = tokenize("100K");
        assert_eq!(tokens[0], (TokenKind::Number, "100K".to_string()));
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("# Filter: test\nkeep; /* a\nb */"),
            vec![
                TokenKind::HashComment,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::BracketComment
            ]
        );
    }

    #[test]
    fn test_multiline_string() {
        let tokens = tokenize("vacation text:\nline one\n.. dotted\n.\n;");
        let ml = tokens.iter().find(|(k, _)| *k == TokenKind::MultiLine).unwrap();
        assert_eq!(ml.1, "text:\r\nline one\r\n.. dotted\r\n.\r\n");
        assert_eq!(tokens.last().unwrap().0, TokenKind::Semicolon);
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(kinds("keep @x;"), vec![
            TokenKind::Identifier,
            TokenKind::Unknown,
        ]);
    }

    #[test]
    fn test_line_numbers_follow_newlines() {
        let text = normalize_line_endings("keep;\n/* one\ntwo */\nstop;");
        let stop = Tokenizer::new(&text)
            .find(|t| t.text == "stop")
            .unwrap();
        assert_eq!(stop.line, 4);
    }

    #[test]
    fn test_next_token_contract() {
        let text = "stop;";
        assert_eq!(next_token(text, 0), Some((TokenKind::Identifier, "stop", 4)));
        assert_eq!(next_token(text, 4), Some((TokenKind::Semicolon, ";", 5)));
        assert_eq!(next_token(text, 5), None);
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\nb\r\nc"), "a\r\nb\r\nc");
    }
}
