//! Control and action commands of the base language (RFC 5228 sections 3 and 4).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::{Arguments, Words};
use crate::sieve::ast::{Item, PushArguments, Test};
use crate::sieve::literal::{QuotedString, StringList};

/// `if`, `elsif` or `else`: one test (none for `else`) and a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionalCommand {
    pub test: Option<Test>,
    pub commands: Vec<Item>,
}

/// `require <capabilities: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequireCommand {
    pub capabilities: StringList,
}

impl PushArguments for RequireCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(list) = args.pop_string_list() {
            self.capabilities = list;
        }
    }
}

impl fmt::Display for RequireCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.capabilities)
    }
}

/// `keep [:flags <list-of-flags>]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeepCommand {
    /// RFC 5232 `:flags`.
    pub flags: Option<StringList>,
}

impl PushArguments for KeepCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.flags = args.tagged_string_list(":flags");
    }
}

impl fmt::Display for KeepCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Words::new(f).tagged(":flags", self.flags.as_ref())
    }
}

/// `fileinto [:copy] [:create] [:flags <list>] <mailbox: string>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileIntoCommand {
    /// RFC 3894.
    pub copy: bool,
    /// RFC 5490.
    pub create: bool,
    /// RFC 5232.
    pub flags: Option<StringList>,
    pub mailbox: QuotedString,
}

impl PushArguments for FileIntoCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.flags = args.tagged_string_list(":flags");
        self.copy = args.flag(":copy");
        self.create = args.flag(":create");
        if let Some(mailbox) = args.pop_string() {
            self.mailbox = mailbox;
        }
    }
}

impl fmt::Display for FileIntoCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        w.flag(self.copy, ":copy")?;
        w.flag(self.create, ":create")?;
        w.tagged(":flags", self.flags.as_ref())?;
        w.word(&self.mailbox)
    }
}

/// `redirect [:copy] <address: string>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedirectCommand {
    pub copy: bool,
    pub address: QuotedString,
}

impl PushArguments for RedirectCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.copy = args.flag(":copy");
        if let Some(address) = args.pop_string() {
            self.address = address;
        }
    }
}

impl fmt::Display for RedirectCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        w.flag(self.copy, ":copy")?;
        w.word(&self.address)
    }
}
