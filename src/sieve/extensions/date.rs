//! RFC 5260: `date` and `currentdate`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::{Arguments, Words};
use crate::sieve::ast::PushArguments;
use crate::sieve::literal::{QuotedString, StringList};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    /// `:zone "+0100"`
    Zone(QuotedString),
    /// `:originalzone`, only valid for `date`.
    Original,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zone(zone) => write!(f, ":zone {zone}"),
            Self::Original => f.write_str(":originalzone"),
        }
    }
}

fn take_zone(args: &mut Arguments) -> Option<Zone> {
    if let Some(zone) = args.tagged_string(":zone") {
        Some(Zone::Zone(zone))
    } else if args.flag(":originalzone") {
        Some(Zone::Original)
    } else {
        None
    }
}

/// `date [zone] <header-name: string> <date-part: string> <key-list: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateTest {
    pub zone: Option<Zone>,
    pub header_name: QuotedString,
    pub date_part: QuotedString,
    pub key_list: StringList,
}

impl PushArguments for DateTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.zone = take_zone(args);
        if let Some(keys) = args.pop_string_list() {
            self.key_list = keys;
        }
        if let Some(part) = args.pop_string() {
            self.date_part = part;
        }
        if let Some(name) = args.pop_string() {
            self.header_name = name;
        }
    }
}

impl fmt::Display for DateTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        if let Some(zone) = &self.zone {
            w.word(zone)?;
        }
        w.word(&self.header_name)?;
        w.word(&self.date_part)?;
        w.word(&self.key_list)
    }
}

/// `currentdate [:zone <time-zone: string>] <date-part: string> <key-list: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentDateTest {
    pub zone: Option<Zone>,
    pub date_part: QuotedString,
    pub key_list: StringList,
}

impl PushArguments for CurrentDateTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.zone = take_zone(args);
        if let Some(keys) = args.pop_string_list() {
            self.key_list = keys;
        }
        if let Some(part) = args.pop_string() {
            self.date_part = part;
        }
    }
}

impl fmt::Display for CurrentDateTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        if let Some(zone) = &self.zone {
            w.word(zone)?;
        }
        w.word(&self.date_part)?;
        w.word(&self.key_list)
    }
}
