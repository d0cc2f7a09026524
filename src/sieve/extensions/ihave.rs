//! RFC 5463: `ihave` and `error`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::Arguments;
use crate::sieve::ast::PushArguments;
use crate::sieve::literal::{QuotedString, StringList};

/// `ihave <capabilities: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IHaveTest {
    pub capabilities: StringList,
}

impl PushArguments for IHaveTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(capabilities) = args.pop_string_list() {
            self.capabilities = capabilities;
        }
    }
}

impl fmt::Display for IHaveTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.capabilities)
    }
}

/// `error <message: string>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorCommand {
    pub message: QuotedString,
}

impl PushArguments for ErrorCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(message) = args.pop_string() {
            self.message = message;
        }
    }
}

impl fmt::Display for ErrorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
