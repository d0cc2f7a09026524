//! RFC 5183: `environment`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::Arguments;
use crate::sieve::ast::PushArguments;
use crate::sieve::literal::{QuotedString, StringList};

/// `environment <name: string> <key-list: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentTest {
    pub name: QuotedString,
    pub key_list: StringList,
}

impl PushArguments for EnvironmentTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(keys) = args.pop_string_list() {
            self.key_list = keys;
        }
        if let Some(name) = args.pop_string() {
            self.name = name;
        }
    }
}

impl fmt::Display for EnvironmentTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.key_list)
    }
}
