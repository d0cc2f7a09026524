//! The table of known commands and tests, keyed by lowercase identifier.
//!
//! Each entry carries the capabilities it needs. A parse works against the
//! subset active for the server's capabilities; the table itself is built
//! once and never changes.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::sieve::ast::{Command, CommandBody, Node, Test, TestBody};
use crate::sieve::commands::*;
use crate::sieve::conditions::*;
use crate::sieve::extensions::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Command,
    Test,
}

#[derive(Debug)]
pub struct Definition {
    pub identifier: &'static str,
    /// Capabilities that must all be present for the entry to be active.
    pub requires: &'static [&'static str],
    prototype: Node,
}

impl Definition {
    pub fn kind(&self) -> NodeKind {
        match self.prototype {
            Node::Command(_) => NodeKind::Command,
            Node::Test(_) => NodeKind::Test,
        }
    }

    /// A fresh node with no arguments applied.
    pub fn instantiate(&self) -> Node {
        self.prototype.clone()
    }

    fn is_active<S: AsRef<str>>(&self, capabilities: &[S]) -> bool {
        self.requires
            .iter()
            .all(|r| capabilities.iter().any(|c| c.as_ref() == *r))
    }
}

fn command(identifier: &'static str, requires: &'static [&'static str], body: CommandBody) -> Definition {
    Definition {
        identifier,
        requires,
        prototype: Node::Command(Command::new(identifier, body)),
    }
}

fn test(identifier: &'static str, requires: &'static [&'static str], body: TestBody) -> Definition {
    Definition {
        identifier,
        requires,
        prototype: Node::Test(Test::new(identifier, body)),
    }
}

/// Every node type this crate models. `if`/`elsif`/`else` are not listed;
/// the parser handles them directly.
static DEFINITIONS: Lazy<Vec<Definition>> = Lazy::new(|| {
    use CommandBody as C;
    use TestBody as T;
    vec![
        // RFC 5228 control and action commands
        command("require", &[], C::Require(RequireCommand::default())),
        command("stop", &[], C::Stop),
        command("keep", &[], C::Keep(KeepCommand::default())),
        command("discard", &[], C::Discard),
        command("fileinto", &["fileinto"], C::FileInto(FileIntoCommand::default())),
        command("redirect", &[], C::Redirect(RedirectCommand::default())),
        // RFC 5228 tests
        test("address", &[], T::Address(AddressTest::default())),
        test("allof", &[], T::AllOf(TestList::default())),
        test("anyof", &[], T::AnyOf(TestList::default())),
        test("envelope", &["envelope"], T::Envelope(AddressTest::default())),
        test("exists", &[], T::Exists(ExistsTest::default())),
        test("false", &[], T::False),
        test("header", &[], T::Header(HeaderTest::default())),
        test("not", &[], T::Not(NotTest::default())),
        test("size", &[], T::Size(SizeTest::default())),
        test("true", &[], T::True),
        // RFC 5173
        test("body", &["body"], T::Body(BodyTest::default())),
        // RFC 5183
        test("environment", &["environment"], T::Environment(EnvironmentTest::default())),
        // RFC 5229
        command("set", &["variables"], C::Set(SetCommand::default())),
        test("string", &["variables"], T::String(StringTest::default())),
        // RFC 5230
        command("vacation", &["vacation"], C::Vacation(VacationCommand::default())),
        // RFC 5232
        command("setflag", &["imap4flags"], C::SetFlag(FlagCommand::default())),
        command("addflag", &["imap4flags"], C::AddFlag(FlagCommand::default())),
        command("removeflag", &["imap4flags"], C::RemoveFlag(FlagCommand::default())),
        test("hasflag", &["imap4flags"], T::HasFlag(HasFlagTest::default())),
        // RFC 5235
        test("spamtest", &["spamtest"], T::SpamTest(SpamTest::default())),
        test("virustest", &["virustest"], T::VirusTest(VirusTest::default())),
        // RFC 5260
        test("date", &["date"], T::Date(DateTest::default())),
        test("currentdate", &["date"], T::CurrentDate(CurrentDateTest::default())),
        // RFC 5293
        command("addheader", &["editheader"], C::AddHeader(AddHeaderCommand::default())),
        command("deleteheader", &["editheader"], C::DeleteHeader(DeleteHeaderCommand::default())),
        // RFC 5429
        command("ereject", &["ereject"], C::Ereject(RejectCommand::default())),
        command("reject", &["reject"], C::Reject(RejectCommand::default())),
        // RFC 5435
        command("notify", &["enotify"], C::Notify(NotifyCommand::default())),
        test("valid_notify_method", &["enotify"], T::ValidNotifyMethod(ValidNotifyMethodTest::default())),
        test(
            "notify_method_capability",
            &["enotify"],
            T::NotifyMethodCapability(NotifyMethodCapabilityTest::default()),
        ),
        // RFC 5463
        test("ihave", &["ihave"], T::IHave(IHaveTest::default())),
        command("error", &["ihave"], C::Error(ErrorCommand::default())),
        // RFC 5490
        test("mailboxexists", &["mailbox"], T::MailboxExists(MailboxExistsTest::default())),
        test("metadata", &["mboxmetadata"], T::Metadata(MetadataTest::default())),
        test("metadataexists", &["mboxmetadata"], T::MetadataExists(MetadataExistsTest::default())),
        // RFC 6609
        command("include", &["include"], C::Include(IncludeCommand::default())),
        command("return", &["include"], C::Return),
    ]
});

/// All definitions, in table order.
pub fn definitions() -> &'static [Definition] {
    &DEFINITIONS
}

/// Every capability some definition depends on, sorted and deduplicated.
pub fn known_capabilities() -> Vec<&'static str> {
    let mut caps: Vec<&'static str> = DEFINITIONS
        .iter()
        .flat_map(|d| d.requires.iter().copied())
        .collect();
    caps.sort_unstable();
    caps.dedup();
    caps
}

/// The definitions usable with one set of capabilities.
#[derive(Debug)]
pub struct ActiveRegistry {
    entries: HashMap<&'static str, &'static Definition>,
}

impl ActiveRegistry {
    /// Keeps entries with no requirement or whose requirements are all present.
    pub fn new<S: AsRef<str>>(capabilities: &[S]) -> Self {
        let entries = DEFINITIONS
            .iter()
            .filter(|d| d.is_active(capabilities))
            .map(|d| (d.identifier, d))
            .collect();
        Self { entries }
    }

    pub fn get(&self, identifier: &str) -> Option<&'static Definition> {
        self.entries.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_are_unique_and_lowercase() {
        let mut seen = std::collections::HashSet::new();
        for d in definitions() {
            assert_eq!(d.identifier, d.identifier.to_lowercase());
            assert!(seen.insert(d.identifier), "duplicate {}", d.identifier);
        }
    }

    #[test]
    fn test_core_entries_always_active() {
        let none: [&str; 0] = [];
        let active = ActiveRegistry::new(&none);
        assert!(active.get("stop").is_some());
        assert!(active.get("header").is_some());
        assert!(active.get("fileinto").is_none());
        assert!(active.get("vacation").is_none());
    }

    #[test]
    fn test_extension_needs_its_capability() {
        let active = ActiveRegistry::new(&["fileinto", "vacation"]);
        assert_eq!(active.get("fileinto").unwrap().kind(), NodeKind::Command);
        assert!(active.get("vacation").is_some());
        assert!(active.get("set").is_none());
    }

    #[test]
    fn test_capability_match_is_exact() {
        let active = ActiveRegistry::new(&["FileInto"]);
        assert!(active.get("fileinto").is_none());
    }

    #[test]
    fn test_instantiate_returns_fresh_node() {
        let active = ActiveRegistry::new(&["envelope"]);
        match active.get("envelope").unwrap().instantiate() {
            Node::Test(t) => {
                assert_eq!(t.identifier, "envelope");
                assert!(matches!(t.body, TestBody::Envelope(_)));
            }
            Node::Command(_) => panic!("Expected Test"),
        }
    }

    #[test]
    fn test_known_capabilities() {
        let caps = known_capabilities();
        assert!(caps.contains(&"imap4flags"));
        assert!(caps.windows(2).all(|w| w[0] < w[1]));
    }
}
