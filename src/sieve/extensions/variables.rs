//! RFC 5229: `set` and `string`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::{Arguments, Words};
use crate::sieve::ast::PushArguments;
use crate::sieve::literal::{QuotedString, StringList};

const MODIFIERS: &[&str] = &[
    ":lower",
    ":upper",
    ":lowerfirst",
    ":upperfirst",
    ":quotewildcard",
    ":length",
];

/// `set [modifier...] <name: string> <value: string>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetCommand {
    /// Modifier tags in source order.
    pub modifiers: Vec<String>,
    pub name: QuotedString,
    pub value: QuotedString,
}

impl SetCommand {
    pub fn name(&self) -> &str {
        self.name.value()
    }

    pub fn value(&self) -> &str {
        self.value.value()
    }
}

impl PushArguments for SetCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        while let Some(modifier) = args.one_of(MODIFIERS) {
            self.modifiers.push(modifier);
        }
        if let Some(value) = args.pop_string() {
            self.value = value;
        }
        if let Some(name) = args.pop_string() {
            self.name = name;
        }
    }
}

impl fmt::Display for SetCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        w.all(&self.modifiers)?;
        w.word(&self.name)?;
        w.word(&self.value)
    }
}

/// `string <source: string-list> <key-list: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringTest {
    pub source: StringList,
    pub key_list: StringList,
}

impl PushArguments for StringTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(keys) = args.pop_string_list() {
            self.key_list = keys;
        }
        if let Some(source) = args.pop_string_list() {
            self.source = source;
        }
    }
}

impl fmt::Display for StringTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.source, self.key_list)
    }
}
