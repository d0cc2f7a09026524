//! RFC 5230: `vacation` (with the RFC 6131 `:seconds` parameter).
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::{Arguments, Words};
use crate::sieve::ast::PushArguments;
use crate::sieve::literal::{Number, QuotedString, StringList, Text};

/// `vacation [:days n | :seconds n] [:subject s] [:from s] [:addresses l]
/// [:mime] [:handle s] <reason: string>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VacationCommand {
    pub days: Option<Number>,
    pub seconds: Option<Number>,
    pub subject: Option<QuotedString>,
    pub from: Option<QuotedString>,
    pub addresses: Option<StringList>,
    pub mime: bool,
    pub handle: Option<QuotedString>,
    pub reason: Text,
}

impl PushArguments for VacationCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.days = args.tagged_number(":days");
        self.seconds = args.tagged_number(":seconds");
        self.subject = args.tagged_string(":subject");
        self.from = args.tagged_string(":from");
        self.addresses = args.tagged_string_list(":addresses");
        self.handle = args.tagged_string(":handle");
        self.mime = args.flag(":mime");
        if let Some(reason) = args.pop_text() {
            self.reason = reason;
        }
    }
}

impl fmt::Display for VacationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        w.tagged(":days", self.days.as_ref())?;
        w.tagged(":seconds", self.seconds.as_ref())?;
        w.tagged(":subject", self.subject.as_ref())?;
        w.tagged(":from", self.from.as_ref())?;
        w.tagged(":addresses", self.addresses.as_ref())?;
        w.flag(self.mime, ":mime")?;
        w.tagged(":handle", self.handle.as_ref())?;
        w.word(&self.reason)
    }
}
