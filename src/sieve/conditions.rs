//! Tests of the base language (RFC 5228 section 5).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::{Arguments, Words};
use crate::sieve::ast::{PushArguments, Test};
use crate::sieve::literal::{Number, StringList};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressPart {
    All,
    Localpart,
    Domain,
    /// RFC 5233
    User,
    /// RFC 5233
    Detail,
}

impl AddressPart {
    const TAGS: &'static [&'static str] = &[":all", ":localpart", ":domain", ":user", ":detail"];

    pub fn as_sieve(&self) -> &'static str {
        match self {
            Self::All => ":all",
            Self::Localpart => ":localpart",
            Self::Domain => ":domain",
            Self::User => ":user",
            Self::Detail => ":detail",
        }
    }

    pub fn from_sieve(s: &str) -> Option<Self> {
        match s {
            ":all" => Some(Self::All),
            ":localpart" => Some(Self::Localpart),
            ":domain" => Some(Self::Domain),
            ":user" => Some(Self::User),
            ":detail" => Some(Self::Detail),
            _ => None,
        }
    }
}

impl fmt::Display for AddressPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sieve())
    }
}

/// `address`/`envelope [address-part] <header-list> <key-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressTest {
    pub address_part: Option<AddressPart>,
    pub header_list: StringList,
    pub key_list: StringList,
}

impl PushArguments for AddressTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.address_part = args
            .one_of(AddressPart::TAGS)
            .and_then(|t| AddressPart::from_sieve(&t));
        if let Some(keys) = args.pop_string_list() {
            self.key_list = keys;
        }
        if let Some(headers) = args.pop_string_list() {
            self.header_list = headers;
        }
    }
}

impl fmt::Display for AddressTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        if let Some(part) = &self.address_part {
            w.word(part)?;
        }
        w.word(&self.header_list)?;
        w.word(&self.key_list)
    }
}

/// The parenthesized tests of `allof`/`anyof`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestList(pub Vec<Test>);

impl TestList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Test> {
        self.0.iter()
    }
}

impl fmt::Display for TestList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, test) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{test}")?;
        }
        f.write_str(")")
    }
}

/// `exists <header-names: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExistsTest {
    pub header_names: StringList,
}

impl PushArguments for ExistsTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(names) = args.pop_string_list() {
            self.header_names = names;
        }
    }
}

impl fmt::Display for ExistsTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header_names)
    }
}

/// `header <header-names: string-list> <key-list: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderTest {
    pub header_names: StringList,
    pub key_list: StringList,
}

impl PushArguments for HeaderTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(keys) = args.pop_string_list() {
            self.key_list = keys;
        }
        if let Some(names) = args.pop_string_list() {
            self.header_names = names;
        }
    }
}

impl fmt::Display for HeaderTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.header_names, self.key_list)
    }
}

/// `not <test>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotTest {
    pub test: Option<Box<Test>>,
}

impl fmt::Display for NotTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.test {
            Some(test) => write!(f, "{test}"),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeComparator {
    #[default]
    Over,
    Under,
}

impl SizeComparator {
    pub fn as_sieve(&self) -> &'static str {
        match self {
            Self::Over => ":over",
            Self::Under => ":under",
        }
    }

    pub fn from_sieve(s: &str) -> Option<Self> {
        match s {
            ":over" => Some(Self::Over),
            ":under" => Some(Self::Under),
            _ => None,
        }
    }
}

impl fmt::Display for SizeComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sieve())
    }
}

/// `size <":over" / ":under"> <limit: number>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeTest {
    pub comparator: SizeComparator,
    pub limit: Number,
}

impl PushArguments for SizeTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(c) = args
            .one_of(&[":over", ":under"])
            .and_then(|t| SizeComparator::from_sieve(&t))
        {
            self.comparator = c;
        }
        if let Some(limit) = args.pop_number() {
            self.limit = limit;
        }
    }
}

impl fmt::Display for SizeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.comparator, self.limit)
    }
}
