//! Errors raised while turning script text into a tree.

/// A structural violation found while parsing a script.
///
/// The first violation aborts the parse; no partial tree is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} on line {line} of {script}")]
pub struct SyntaxError {
    pub message: String,
    /// Name the caller gave the script, used only for context.
    pub script: String,
    /// 1-based line of the offending token.
    pub line: usize,
    /// Text surrounding the end of the offending token.
    pub snippet: String,
}

impl SyntaxError {
    pub(crate) fn new(message: impl Into<String>, script: &str, line: usize, text: &str, end: usize) -> Self {
        Self {
            message: message.into(),
            script: script.to_string(),
            line,
            snippet: snippet_around(text, end),
        }
    }
}

/// Up to 20 bytes before `end` and 10 after, clamped to char boundaries.
fn snippet_around(text: &str, end: usize) -> String {
    let mut start = end.saturating_sub(20);
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut stop = (end + 10).min(text.len());
    while stop < text.len() && !text.is_char_boundary(stop) {
        stop += 1;
    }
    text[start..stop].to_string()
}
