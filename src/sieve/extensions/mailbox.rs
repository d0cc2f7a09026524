//! RFC 5490: `mailboxexists`, `metadata` and `metadataexists`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::Arguments;
use crate::sieve::ast::PushArguments;
use crate::sieve::literal::{QuotedString, StringList};

/// `mailboxexists <mailbox-names: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailboxExistsTest {
    pub mailbox_names: StringList,
}

impl PushArguments for MailboxExistsTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(names) = args.pop_string_list() {
            self.mailbox_names = names;
        }
    }
}

impl fmt::Display for MailboxExistsTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mailbox_names)
    }
}

/// `metadata <mailbox: string> <annotation-name: string> <key-list: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataTest {
    pub mailbox: QuotedString,
    pub annotation_name: QuotedString,
    pub key_list: StringList,
}

impl PushArguments for MetadataTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(keys) = args.pop_string_list() {
            self.key_list = keys;
        }
        if let Some(name) = args.pop_string() {
            self.annotation_name = name;
        }
        if let Some(mailbox) = args.pop_string() {
            self.mailbox = mailbox;
        }
    }
}

impl fmt::Display for MetadataTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.mailbox, self.annotation_name, self.key_list)
    }
}

/// `metadataexists <mailbox: string> <annotation-names: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataExistsTest {
    pub mailbox: QuotedString,
    pub annotation_names: StringList,
}

impl PushArguments for MetadataExistsTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(names) = args.pop_string_list() {
            self.annotation_names = names;
        }
        if let Some(mailbox) = args.pop_string() {
            self.mailbox = mailbox;
        }
    }
}

impl fmt::Display for MetadataExistsTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mailbox, self.annotation_names)
    }
}
