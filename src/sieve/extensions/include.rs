//! RFC 6609: `include` (`return` carries no arguments).
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::{Arguments, Words};
use crate::sieve::ast::PushArguments;
use crate::sieve::literal::QuotedString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Personal,
    Global,
}

impl Location {
    pub fn as_sieve(&self) -> &'static str {
        match self {
            Self::Personal => ":personal",
            Self::Global => ":global",
        }
    }

    pub fn from_sieve(s: &str) -> Option<Self> {
        match s {
            ":personal" => Some(Self::Personal),
            ":global" => Some(Self::Global),
            _ => None,
        }
    }
}

/// `include [:personal / :global] [:once] [:optional] <value: string>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncludeCommand {
    pub location: Option<Location>,
    pub once: bool,
    pub optional: bool,
    pub value: QuotedString,
}

impl PushArguments for IncludeCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.location = args
            .one_of(&[":personal", ":global"])
            .and_then(|t| Location::from_sieve(&t));
        self.once = args.flag(":once");
        self.optional = args.flag(":optional");
        if let Some(value) = args.pop_string() {
            self.value = value;
        }
    }
}

impl fmt::Display for IncludeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        if let Some(location) = &self.location {
            w.word(location.as_sieve())?;
        }
        w.flag(self.once, ":once")?;
        w.flag(self.optional, ":optional")?;
        w.word(&self.value)
    }
}
