//! RFC 5435: `notify`, `valid_notify_method` and `notify_method_capability`.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::{Arguments, Words};
use crate::sieve::ast::PushArguments;
use crate::sieve::literal::{QuotedString, StringList};

/// `notify [:from s] [:importance <"1"/"2"/"3">] [:options l] [:message s] <method: string>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyCommand {
    pub from: Option<QuotedString>,
    pub importance: Option<QuotedString>,
    pub options: Option<StringList>,
    pub message: Option<QuotedString>,
    pub method: QuotedString,
}

impl PushArguments for NotifyCommand {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.from = args.tagged_string(":from");
        self.importance = args.tagged_string(":importance");
        self.options = args.tagged_string_list(":options");
        self.message = args.tagged_string(":message");
        if let Some(method) = args.pop_string() {
            self.method = method;
        }
    }
}

impl fmt::Display for NotifyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = Words::new(f);
        w.tagged(":from", self.from.as_ref())?;
        w.tagged(":importance", self.importance.as_ref())?;
        w.tagged(":options", self.options.as_ref())?;
        w.tagged(":message", self.message.as_ref())?;
        w.word(&self.method)
    }
}

/// `valid_notify_method <notification-uris: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidNotifyMethodTest {
    pub uris: StringList,
}

impl PushArguments for ValidNotifyMethodTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(uris) = args.pop_string_list() {
            self.uris = uris;
        }
    }
}

impl fmt::Display for ValidNotifyMethodTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uris)
    }
}

/// `notify_method_capability <uri: string> <capability: string> <key-list: string-list>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyMethodCapabilityTest {
    pub uri: QuotedString,
    pub capability: QuotedString,
    pub key_list: StringList,
}

impl PushArguments for NotifyMethodCapabilityTest {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(keys) = args.pop_string_list() {
            self.key_list = keys;
        }
        if let Some(capability) = args.pop_string() {
            self.capability = capability;
        }
        if let Some(uri) = args.pop_string() {
            self.uri = uri;
        }
    }
}

impl fmt::Display for NotifyMethodCapabilityTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.uri, self.capability, self.key_list)
    }
}
