//! RFC 5429: `reject` and `ereject`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::Arguments;
use crate::sieve::ast::PushArguments;
use crate::sieve::literal::Text;

/// `reject`/`ereject <reason: string>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RejectCommand {
    pub reason: Text,
}

impl PushArguments for RejectCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(reason) = args.pop_text() {
            self.reason = reason;
        }
    }
}

impl fmt::Display for RejectCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}
