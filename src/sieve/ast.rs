//! AST node types for SIEVE scripts (RFC 5228).
//!
//! A script is an ordered list of commands and comments. Every parent owns
//! its children outright; there are no back references.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sieve::arguments::{Argument, Arguments, Words};
use crate::sieve::commands::*;
use crate::sieve::conditions::*;
use crate::sieve::emitter;
use crate::sieve::extensions::*;
use crate::sieve::literal::{Comment, QuotedString};

/// A parsed script together with the capabilities it needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub items: Vec<Item>,
    /// Explicit `require` capabilities plus those implied by node usage,
    /// in first-seen order without duplicates.
    pub requires: Vec<String>,
}

impl Script {
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.items.iter().filter_map(Item::as_command)
    }

    /// Identifiers that were kept as untyped placeholders, in source order.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut found = Vec::new();
        for item in &self.items {
            if let Item::Command(cmd) = item {
                collect_placeholders(cmd, &mut found);
            }
        }
        found
    }
}

fn collect_placeholders<'a>(cmd: &'a Command, found: &mut Vec<&'a str>) {
    match &cmd.body {
        CommandBody::Generic(_) => found.push(&cmd.identifier),
        CommandBody::Conditional(c) => {
            if let Some(test) = &c.test {
                collect_test_placeholders(test, found);
            }
            for child in c.commands.iter().filter_map(Item::as_command) {
                collect_placeholders(child, found);
            }
        }
        _ => {}
    }
}

fn collect_test_placeholders<'a>(test: &'a Test, found: &mut Vec<&'a str>) {
    match &test.body {
        TestBody::Generic(_) => found.push(&test.identifier),
        TestBody::AllOf(list) | TestBody::AnyOf(list) => {
            for t in &list.0 {
                collect_test_placeholders(t, found);
            }
        }
        TestBody::Not(not) => {
            if let Some(t) = &not.test {
                collect_test_placeholders(t, found);
            }
        }
        _ => {}
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        emitter::write_items(f, &self.items, 0)
    }
}

/// An entry of a command list: a command or a free-standing comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Command(Command),
    Comment(Comment),
}

impl Item {
    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(c) => Some(c),
            Self::Comment(_) => None,
        }
    }
}

/// Either kind of grammar node, as produced by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Command(Command),
    Test(Test),
}

/// Node-type independent handling of arguments.
pub trait PushArguments {
    /// Claims the arguments this node understands, leaving the rest.
    fn push_arguments(&mut self, args: &mut Arguments);
}

/// Untyped arguments of a placeholder node, kept in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericArguments {
    pub arguments: Vec<Argument>,
}

impl PushArguments for GenericArguments {
    fn push_arguments(&mut self, args: &mut Arguments) {
        self.arguments.extend(std::mem::take(args).into_remaining());
    }
}

impl fmt::Display for GenericArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Words::new(f).all(&self.arguments)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Lowercased identifier as written in the script.
    pub identifier: String,
    pub comments: Vec<Comment>,
    pub body: CommandBody,
}

impl Command {
    pub fn new(identifier: impl Into<String>, body: CommandBody) -> Self {
        Self {
            identifier: identifier.into(),
            comments: Vec::new(),
            body,
        }
    }

    /// A placeholder for an identifier with no active typed node.
    pub fn generic(identifier: impl Into<String>) -> Self {
        Self::new(identifier, CommandBody::Generic(GenericArguments::default()))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.body, CommandBody::Generic(_))
    }

    pub fn as_conditional(&self) -> Option<&ConditionalCommand> {
        match &self.body {
            CommandBody::Conditional(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        emitter::write_command(f, self, 0)
    }
}

/// Variant-specific part of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandBody {
    /// `if`, `elsif` or `else`.
    Conditional(ConditionalCommand),
    Require(RequireCommand),
    Stop,
    Keep(KeepCommand),
    Discard,
    FileInto(FileIntoCommand),
    Redirect(RedirectCommand),
    Set(SetCommand),
    Vacation(VacationCommand),
    SetFlag(FlagCommand),
    AddFlag(FlagCommand),
    RemoveFlag(FlagCommand),
    AddHeader(AddHeaderCommand),
    DeleteHeader(DeleteHeaderCommand),
    Reject(RejectCommand),
    Ereject(RejectCommand),
    Notify(NotifyCommand),
    Error(ErrorCommand),
    Include(IncludeCommand),
    Return,
    Generic(GenericArguments),
}

impl CommandBody {
    fn arguments_mut(&mut self) -> Option<&mut dyn PushArguments> {
        let body: &mut dyn PushArguments = match self {
            Self::Conditional(_) | Self::Stop | Self::Discard | Self::Return => return None,
            Self::Require(c) => c,
            Self::Keep(c) => c,
            Self::FileInto(c) => c,
            Self::Redirect(c) => c,
            Self::Set(c) => c,
            Self::Vacation(c) => c,
            Self::SetFlag(c) | Self::AddFlag(c) | Self::RemoveFlag(c) => c,
            Self::AddHeader(c) => c,
            Self::DeleteHeader(c) => c,
            Self::Reject(c) | Self::Ereject(c) => c,
            Self::Notify(c) => c,
            Self::Error(c) => c,
            Self::Include(c) => c,
            Self::Generic(c) => c,
        };
        Some(body)
    }

    /// Match-type and comparator slots, for commands that take them.
    pub(crate) fn matcher_mut(&mut self) -> Option<Matcher<'_>> {
        match self {
            Self::DeleteHeader(c) => Some(Matcher {
                match_type: &mut c.match_type,
                comparator: &mut c.comparator,
            }),
            _ => None,
        }
    }

    pub(crate) fn accepts_match_type(&self) -> bool {
        matches!(self, Self::DeleteHeader(_))
    }
}

impl PushArguments for CommandBody {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(body) = self.arguments_mut() {
            body.push_arguments(args);
        }
    }
}

impl fmt::Display for CommandBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conditional(c) => match &c.test {
                Some(test) => write!(f, "{test}"),
                None => Ok(()),
            },
            Self::Stop | Self::Discard | Self::Return => Ok(()),
            Self::Require(c) => write!(f, "{c}"),
            Self::Keep(c) => write!(f, "{c}"),
            Self::FileInto(c) => write!(f, "{c}"),
            Self::Redirect(c) => write!(f, "{c}"),
            Self::Set(c) => write!(f, "{c}"),
            Self::Vacation(c) => write!(f, "{c}"),
            Self::SetFlag(c) | Self::AddFlag(c) | Self::RemoveFlag(c) => write!(f, "{c}"),
            Self::AddHeader(c) => write!(f, "{c}"),
            Self::DeleteHeader(c) => write!(f, "{c}"),
            Self::Reject(c) | Self::Ereject(c) => write!(f, "{c}"),
            Self::Notify(c) => write!(f, "{c}"),
            Self::Error(c) => write!(f, "{c}"),
            Self::Include(c) => write!(f, "{c}"),
            Self::Generic(c) => write!(f, "{c}"),
        }
    }
}

/// Mutable view of a node's match-type and comparator.
pub(crate) struct Matcher<'a> {
    pub match_type: &'a mut Option<MatchType>,
    pub comparator: &'a mut Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    /// Lowercased identifier as written in the script.
    pub identifier: String,
    pub match_type: Option<MatchType>,
    pub comparator: Option<String>,
    pub comments: Vec<Comment>,
    pub body: TestBody,
}

impl Test {
    pub fn new(identifier: impl Into<String>, body: TestBody) -> Self {
        Self {
            identifier: identifier.into(),
            match_type: None,
            comparator: None,
            comments: Vec::new(),
            body,
        }
    }

    /// A placeholder for an identifier with no active typed node.
    pub fn generic(identifier: impl Into<String>) -> Self {
        Self::new(identifier, TestBody::Generic(GenericArguments::default()))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.body, TestBody::Generic(_))
    }

    /// The test-list of `allof`/`anyof`.
    pub fn test_list(&self) -> Option<&TestList> {
        match &self.body {
            TestBody::AllOf(list) | TestBody::AnyOf(list) => Some(list),
            _ => None,
        }
    }

    pub(crate) fn matcher_mut(&mut self) -> Matcher<'_> {
        Matcher {
            match_type: &mut self.match_type,
            comparator: &mut self.comparator,
        }
    }
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)?;
        for comment in &self.comments {
            emitter::write_attached_comment(f, comment)?;
        }
        let mut words = Words::after(f);
        if let Some(match_type) = &self.match_type {
            words.word(match_type)?;
        }
        if let Some(comparator) = &self.comparator {
            words.word(":comparator")?;
            words.word(QuotedString::new(comparator.as_str()))?;
        }
        let args = self.body.to_string();
        if !args.is_empty() {
            words.word(args)?;
        }
        Ok(())
    }
}

/// Variant-specific part of a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TestBody {
    Address(AddressTest),
    AllOf(TestList),
    AnyOf(TestList),
    Envelope(AddressTest),
    Exists(ExistsTest),
    False,
    Header(HeaderTest),
    Not(NotTest),
    Size(SizeTest),
    True,
    Body(BodyTest),
    Environment(EnvironmentTest),
    String(StringTest),
    HasFlag(HasFlagTest),
    SpamTest(SpamTest),
    VirusTest(VirusTest),
    Date(DateTest),
    CurrentDate(CurrentDateTest),
    ValidNotifyMethod(ValidNotifyMethodTest),
    NotifyMethodCapability(NotifyMethodCapabilityTest),
    IHave(IHaveTest),
    MailboxExists(MailboxExistsTest),
    Metadata(MetadataTest),
    MetadataExists(MetadataExistsTest),
    Generic(GenericArguments),
}

impl TestBody {
    fn arguments_mut(&mut self) -> Option<&mut dyn PushArguments> {
        let body: &mut dyn PushArguments = match self {
            Self::AllOf(_) | Self::AnyOf(_) | Self::Not(_) | Self::True | Self::False => return None,
            Self::Address(t) | Self::Envelope(t) => t,
            Self::Exists(t) => t,
            Self::Header(t) => t,
            Self::Size(t) => t,
            Self::Body(t) => t,
            Self::Environment(t) => t,
            Self::String(t) => t,
            Self::HasFlag(t) => t,
            Self::SpamTest(t) => t,
            Self::VirusTest(t) => t,
            Self::Date(t) => t,
            Self::CurrentDate(t) => t,
            Self::ValidNotifyMethod(t) => t,
            Self::NotifyMethodCapability(t) => t,
            Self::IHave(t) => t,
            Self::MailboxExists(t) => t,
            Self::Metadata(t) => t,
            Self::MetadataExists(t) => t,
            Self::Generic(t) => t,
        };
        Some(body)
    }
}

impl PushArguments for TestBody {
    fn push_arguments(&mut self, args: &mut Arguments) {
        if let Some(body) = self.arguments_mut() {
            body.push_arguments(args);
        }
    }
}

impl fmt::Display for TestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True | Self::False => Ok(()),
            Self::AllOf(list) | Self::AnyOf(list) => write!(f, "{list}"),
            Self::Not(t) => write!(f, "{t}"),
            Self::Address(t) | Self::Envelope(t) => write!(f, "{t}"),
            Self::Exists(t) => write!(f, "{t}"),
            Self::Header(t) => write!(f, "{t}"),
            Self::Size(t) => write!(f, "{t}"),
            Self::Body(t) => write!(f, "{t}"),
            Self::Environment(t) => write!(f, "{t}"),
            Self::String(t) => write!(f, "{t}"),
            Self::HasFlag(t) => write!(f, "{t}"),
            Self::SpamTest(t) => write!(f, "{t}"),
            Self::VirusTest(t) => write!(f, "{t}"),
            Self::Date(t) => write!(f, "{t}"),
            Self::CurrentDate(t) => write!(f, "{t}"),
            Self::ValidNotifyMethod(t) => write!(f, "{t}"),
            Self::NotifyMethodCapability(t) => write!(f, "{t}"),
            Self::IHave(t) => write!(f, "{t}"),
            Self::MailboxExists(t) => write!(f, "{t}"),
            Self::Metadata(t) => write!(f, "{t}"),
            Self::MetadataExists(t) => write!(f, "{t}"),
            Self::Generic(t) => write!(f, "{t}"),
        }
    }
}

/// Relational operator of `:value` / `:count` (RFC 5231).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationalOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl RelationalOp {
    pub fn as_sieve(&self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Eq => "eq",
            Self::Ne => "ne",
        }
    }

    pub fn from_sieve(s: &str) -> Option<Self> {
        match s {
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            _ => None,
        }
    }
}

impl fmt::Display for RelationalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sieve())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    Is,
    Contains,
    Matches,
    Regex,
    Value(RelationalOp),
    Count(RelationalOp),
}

impl MatchType {
    /// Parses the value-less match-type tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            ":is" => Some(Self::Is),
            ":contains" => Some(Self::Contains),
            ":matches" => Some(Self::Matches),
            ":regex" => Some(Self::Regex),
            _ => None,
        }
    }

    /// Builds a relational match-type from `:value`/`:count` and its operator.
    pub fn relational(tag: &str, op: RelationalOp) -> Option<Self> {
        match tag {
            ":value" => Some(Self::Value(op)),
            ":count" => Some(Self::Count(op)),
            _ => None,
        }
    }

    /// Capability a script must require to use this match-type.
    pub fn requires(&self) -> Option<&'static str> {
        match self {
            Self::Is | Self::Contains | Self::Matches => None,
            Self::Regex => Some("regex"),
            Self::Value(_) | Self::Count(_) => Some("relational"),
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Is => f.write_str(":is"),
            Self::Contains => f.write_str(":contains"),
            Self::Matches => f.write_str(":matches"),
            Self::Regex => f.write_str(":regex"),
            Self::Value(op) => write!(f, ":value \"{op}\""),
            Self::Count(op) => write!(f, ":count \"{op}\""),
        }
    }
}
