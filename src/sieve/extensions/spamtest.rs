//! RFC 5235: `spamtest` and `virustest`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::{Arguments, Words};
use crate::sieve::ast::PushArguments;
use crate::sieve::literal::QuotedString;

/// `spamtest [:percent] <value: string>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpamTest {
    /// Only valid with the `spamtestplus` capability.
    pub percent: bool,
    pub value: QuotedString,
}

impl PushArguments for SpamTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.percent = args.flag(":percent");
        if let Some(value) = args.pop_string() {
            self.value = value;
        }
    }
}

impl fmt::Display for SpamTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        w.flag(self.percent, ":percent")?;
        w.word(&self.value)
    }
}

/// `virustest <value: string>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirusTest {
    pub value: QuotedString,
}

impl PushArguments for VirusTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(value) = args.pop_string() {
            self.value = value;
        }
    }
}

impl fmt::Display for VirusTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
