//! RFC 5173: `body`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::{Arguments, Words};
use crate::sieve::ast::PushArguments;
use crate::sieve::literal::StringList;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyTransform {
    Raw,
    /// `:content <content-types>`
    Content(StringList),
    Text,
}

impl fmt::Display for BodyTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str(":raw"),
            Self::Content(types) => write!(f, ":content {types}"),
            Self::Text => f.write_str(":text"),
        }
    }
}

/// `body [body-transform] <key-list: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyTest {
    pub transform: Option<BodyTransform>,
    pub key_list: StringList,
}

impl PushArguments for BodyTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.transform = if let Some(types) = args.tagged_string_list(":content") {
            Some(BodyTransform::Content(types))
        } else if args.flag(":raw") {
            Some(BodyTransform::Raw)
        } else if args.flag(":text") {
            Some(BodyTransform::Text)
        } else {
            None
        };
        if let Some(keys) = args.pop_string_list() {
            self.key_list = keys;
        }
    }
}

impl fmt::Display for BodyTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        if let Some(transform) = &self.transform {
            w.word(transform)?;
        }
        w.word(&self.key_list)
    }
}
