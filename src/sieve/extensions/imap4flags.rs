//! RFC 5232: `setflag`, `addflag`, `removeflag` and `hasflag`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::{Arguments, Words};
use crate::sieve::ast::PushArguments;
use crate::sieve::literal::{QuotedString, StringList};

/// `setflag`/`addflag`/`removeflag [<variablename: string>] <list-of-flags>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlagCommand {
    pub variable: Option<QuotedString>,
    pub flags: StringList,
}

impl PushArguments for FlagCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(flags) = args.pop_string_list() {
            self.flags = flags;
        }
        self.variable = args.pop_string();
    }
}

impl fmt::Display for FlagCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        if let Some(variable) = &self.variable {
            w.word(variable)?;
        }
        w.word(&self.flags)
    }
}

/// `hasflag [<variable-list: string-list>] <list-of-flags: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HasFlagTest {
    pub variables: Option<StringList>,
    pub flags: StringList,
}

impl PushArguments for HasFlagTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(flags) = args.pop_string_list() {
            self.flags = flags;
        }
        self.variables = args.pop_string_list();
    }
}

impl fmt::Display for HasFlagTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        if let Some(variables) = &self.variables {
            w.word(variables)?;
        }
        w.word(&self.flags)
    }
}
