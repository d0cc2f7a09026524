//! RFC 5293: `addheader` and `deleteheader`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::{Arguments, Words};
use crate::sieve::ast::{MatchType, PushArguments};
use crate::sieve::literal::{Number, QuotedString, StringList};

/// `addheader [:last] <field-name: string> <value: string>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddHeaderCommand {
    pub last: bool,
    pub field_name: QuotedString,
    pub value: QuotedString,
}

impl PushArguments for AddHeaderCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.last = args.flag(":last");
        if let Some(value) = args.pop_string() {
            self.value = value;
        }
        if let Some(name) = args.pop_string() {
            self.field_name = name;
        }
    }
}

impl fmt::Display for AddHeaderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        w.flag(self.last, ":last")?;
        w.word(&self.field_name)?;
        w.word(&self.value)
    }
}

/// `deleteheader [:index <fieldno> [:last]] [COMPARATOR] [MATCH-TYPE]
/// <field-name: string> [<value-patterns: string-list>]`
///
/// The only command that takes a match-type and comparator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteHeaderCommand {
    pub index: Option<Number>,
    pub last: bool,
    pub match_type: Option<MatchType>,
    pub comparator: Option<String>,
    pub field_name: QuotedString,
    pub value_patterns: Option<StringList>,
}

impl PushArguments for DeleteHeaderCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.index = args.tagged_number(":index");
        self.last = args.flag(":last");
        let trailing = args.pop_string_list();
        match args.pop_string() {
            Some(name) => {
                self.field_name = name;
                self.value_patterns = trailing;
            }
            None => {
                if let Some(name) = trailing.and_then(|l| l.0.into_iter().next()) {
                    self.field_name = name;
                }
            }
        }
    }
}

impl fmt::Display for DeleteHeaderCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        w.tagged(":index", self.index.as_ref())?;
        w.flag(self.last, ":last")?;
        if let Some(comparator) = &self.comparator {
            w.word(":comparator")?;
            w.word(QuotedString::new(comparator.as_str()))?;
        }
        if let Some(match_type) = &self.match_type {
            w.word(match_type)?;
        }
        w.word(&self.field_name)?;
        if let Some(patterns) = &self.value_patterns {
            w.word(patterns)?;
        }
        Ok(())
    }
}
