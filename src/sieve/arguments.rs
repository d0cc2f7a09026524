//! Pending arguments and the helpers node types use to consume them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::literal::{MultiLine, Number, QuotedString, StringList, Text};

/// One argument as written in the script, before a node claims it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    /// `:tag`, lowercased.
    Tag(String),
    String(QuotedString),
    MultiLine(MultiLine),
    StringList(StringList),
    Number(Number),
}

impl Argument {
    pub fn is_tag(&self) -> bool {
        matches!(self, Self::Tag(_))
    }

    pub fn as_tag(&self) -> Option<&str> {
        match self {
            Self::Tag(t) => Some(t),
            _ => None,
        }
    }

    /// The single string this argument holds, if it holds exactly one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.value()),
            Self::MultiLine(m) => Some(&m.value),
            Self::StringList(l) if l.len() == 1 => l.iter().next(),
            _ => None,
        }
    }

    fn into_string(self) -> Result<QuotedString, Self> {
        match self {
            Self::String(s) => Ok(s),
            Self::MultiLine(m) => Ok(QuotedString(m.value)),
            Self::StringList(mut l) if l.len() == 1 => Ok(l.0.remove(0)),
            other => Err(other),
        }
    }

    fn into_string_list(self) -> Result<StringList, Self> {
        match self {
            Self::StringList(l) => Ok(l),
            Self::String(s) => Ok(StringList::single(s)),
            Self::MultiLine(m) => Ok(StringList::single(QuotedString(m.value))),
            other => Err(other),
        }
    }

    fn into_text(self) -> Result<Text, Self> {
        match self {
            Self::MultiLine(m) => Ok(Text::MultiLine(m)),
            other => other.into_string().map(Text::Quoted),
        }
    }

    fn into_number(self) -> Result<Number, Self> {
        match self {
            Self::Number(n) => Ok(n),
            other => Err(other),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(t) => f.write_str(t),
            Self::String(s) => write!(f, "{s}"),
            Self::MultiLine(m) => write!(f, "{m}"),
            Self::StringList(l) => write!(f, "{l}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// The argument buffer handed to a node once its arguments are complete.
///
/// Nodes take their tagged arguments first, then pop positional ones
/// from the end. Whatever is left afterwards was not understood.
#[derive(Debug, Default)]
pub struct Arguments {
    items: Vec<Argument>,
}

impl Arguments {
    pub fn new(items: Vec<Argument>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_remaining(self) -> Vec<Argument> {
        self.items
    }

    /// Removes every occurrence of a value-less `tag`.
    pub fn flag(&mut self, tag: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|a| a.as_tag() != Some(tag));
        before != self.items.len()
    }

    /// Removes the first of `tags` present and returns its name.
    pub fn one_of(&mut self, tags: &[&str]) -> Option<String> {
        let i = self
            .items
            .iter()
            .position(|a| a.as_tag().is_some_and(|t| tags.contains(&t)))?;
        match self.items.remove(i) {
            Argument::Tag(t) => Some(t),
            _ => None,
        }
    }

    pub fn tagged_string(&mut self, tag: &str) -> Option<QuotedString> {
        self.tagged_as(tag, Argument::into_string)
    }

    pub fn tagged_string_list(&mut self, tag: &str) -> Option<StringList> {
        self.tagged_as(tag, Argument::into_string_list)
    }

    pub fn tagged_number(&mut self, tag: &str) -> Option<Number> {
        self.tagged_as(tag, Argument::into_number)
    }

    fn tagged_as<T>(&mut self, tag: &str, convert: fn(Argument) -> Result<T, Argument>) -> Option<T> {
        let i = self.items.iter().position(|a| a.as_tag() == Some(tag))?;
        let value = self.items.get(i + 1).filter(|a| !a.is_tag())?.clone();
        let converted = convert(value).ok()?;
        self.items.drain(i..i + 2);
        Some(converted)
    }

    /// Pops the trailing positional argument, if it is not a tag.
    pub fn pop(&mut self) -> Option<Argument> {
        if self.items.last().is_some_and(|a| !a.is_tag()) {
            self.items.pop()
        } else {
            None
        }
    }

    pub fn pop_string(&mut self) -> Option<QuotedString> {
        self.pop_as(Argument::into_string)
    }

    pub fn pop_string_list(&mut self) -> Option<StringList> {
        self.pop_as(Argument::into_string_list)
    }

    pub fn pop_text(&mut self) -> Option<Text> {
        self.pop_as(Argument::into_text)
    }

    pub fn pop_number(&mut self) -> Option<Number> {
        self.pop_as(Argument::into_number)
    }

    fn pop_as<T>(&mut self, convert: fn(Argument) -> Result<T, Argument>) -> Option<T> {
        let arg = self.pop()?;
        match convert(arg) {
            Ok(value) => Some(value),
            Err(arg) => {
                self.items.push(arg);
                None
            }
        }
    }
}

/// Writes space-separated words, skipping the separator before the first.
pub(crate) struct Words<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    first: bool,
}

impl<'a, 'b> Words<'a, 'b> {
    pub(crate) fn new(f: &'a mut fmt::Formatter<'b>) -> Self {
        Self { f, first: true }
    }

    /// Continues a line that already holds a word.
    pub(crate) fn after(f: &'a mut fmt::Formatter<'b>) -> Self {
        Self { f, first: false }
    }

    pub(crate) fn word(&mut self, word: impl fmt::Display) -> fmt::Result {
        if !self.first {
            self.f.write_str(" ")?;
        }
        self.first = false;
        write!(self.f, "{word}")
    }

    pub(crate) fn flag(&mut self, on: bool, tag: &str) -> fmt::Result {
        if on {
            self.word(tag)?;
        }
        Ok(())
    }

    pub(crate) fn tagged(&mut self, tag: &str, value: Option<&impl fmt::Display>) -> fmt::Result {
        if let Some(value) = value {
            self.word(tag)?;
            self.word(value)?;
        }
        Ok(())
    }

    pub(crate) fn all<T: fmt::Display>(&mut self, words: &[T]) -> fmt::Result {
        words.iter().try_for_each(|w| self.word(w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(t: &str) -> Argument {
        Argument::Tag(t.to_string())
    }

    fn string(s: &str) -> Argument {
        Argument::String(QuotedString::new(s))
    }

    #[test]
    fn test_tagged_then_positional() {
        let mut args = Arguments::new(vec![
            tag(":days"),
            Argument::Number(Number::new(7)),
            tag(":mime"),
            tag(":subject"),
            string("Away"),
            string("reason"),
        ]);
        assert_eq!(args.tagged_number(":days"), Some(Number::new(7)));
        assert!(args.flag(":mime"));
        assert_eq!(args.tagged_string(":subject"), Some(QuotedString::new("Away")));
        assert_eq!(args.pop_string(), Some(QuotedString::new("reason")));
        assert!(args.is_empty());
    }

    #[test]
    fn test_tag_without_value_is_left_alone() {
        let mut args = Arguments::new(vec![tag(":subject"), tag(":mime")]);
        assert_eq!(args.tagged_string(":subject"), None);
        assert_eq!(args.into_remaining().len(), 2);
    }

    #[test]
    fn test_pop_wrong_type_keeps_argument() {
        let mut args = Arguments::new(vec![Argument::Number(Number::new(1))]);
        assert_eq!(args.pop_string(), None);
        assert_eq!(args.pop_number(), Some(Number::new(1)));
    }

    #[test]
    fn test_pop_string_list_accepts_single_string() {
        let mut args = Arguments::new(vec![string("From")]);
        assert_eq!(args.pop_string_list().unwrap().iter().collect::<Vec<_>>(), vec!["From"]);
    }

    #[test]
    fn test_one_of() {
        let mut args = Arguments::new(vec![tag(":under"), Argument::Number(Number::new(5))]);
        assert_eq!(args.one_of(&[":over", ":under"]).as_deref(), Some(":under"));
        assert_eq!(args.one_of(&[":over", ":under"]), None);
    }
}
