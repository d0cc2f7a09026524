//! State-machine SIEVE parser (RFC 5228 section 8).
//!
//! Tokens are consumed one at a time against a stack of open nodes. The
//! stack holds the path to each open node inside the tree being built, so
//! the tree stays a plain owned structure. Identifiers with no active typed
//! node become placeholders tagged with the original word.

use tracing::{debug, warn};

use crate::sieve::arguments::{Argument, Arguments};
use crate::sieve::ast::*;
use crate::sieve::commands::ConditionalCommand;
use crate::sieve::error::SyntaxError;
use crate::sieve::lexer::{normalize_line_endings, Token, TokenKind, Tokenizer};
use crate::sieve::literal::{Comment, MultiLine, Number, QuotedString, StringList};
use crate::sieve::registry::ActiveRegistry;

/// Comparators every implementation has; using them needs no `require`.
const BUILTIN_COMPARATORS: &[&str] = &["i;octet", "i;ascii-casemap"];

/// Parses `script` with the node types active for `capabilities`.
///
/// `name` only appears in error messages.
pub fn parse<S: AsRef<str>>(script: &str, name: &str, capabilities: &[S]) -> Result<Script, SyntaxError> {
    let registry = ActiveRegistry::new(capabilities);
    parse_with(script, name, &registry)
}

/// Parses `script` against an already filtered registry.
pub fn parse_with(script: &str, name: &str, registry: &ActiveRegistry) -> Result<Script, SyntaxError> {
    let text = normalize_line_endings(script);
    debug!(script = name, active = registry.len(), "parsing script");
    let parsed = Parser::new(name, &text, registry).run()?;
    debug!(
        script = name,
        items = parsed.items.len(),
        requires = ?parsed.requires,
        "parsed script"
    );
    Ok(parsed)
}

/// How an open node hangs off its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Top(usize),
    Child(usize),
    Test,
    Listed(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Conditional,
    Action,
    Negation,
    TestList,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parens {
    None,
    Open,
    Closed,
}

#[derive(Debug)]
struct Level {
    step: Step,
    role: Role,
    identifier: String,
    /// Conditional only: its `{` has been seen.
    block_open: bool,
    /// TestList only.
    parens: Parens,
    /// Takes match-type and comparator tags.
    matcher: bool,
}

impl Level {
    fn expects_test(&self) -> bool {
        match self.role {
            Role::Conditional => !self.block_open,
            Role::Negation => true,
            Role::TestList => self.parens == Parens::Open,
            Role::Action | Role::Test => false,
        }
    }
}

enum NodeMut<'a> {
    Command(&'a mut Command),
    Test(&'a mut Test),
}

impl<'a> NodeMut<'a> {
    fn descend(self, step: Step) -> Option<NodeMut<'a>> {
        match (self, step) {
            (NodeMut::Command(c), Step::Child(i)) => match &mut c.body {
                CommandBody::Conditional(cond) => match cond.commands.get_mut(i)? {
                    Item::Command(child) => Some(NodeMut::Command(child)),
                    Item::Comment(_) => None,
                },
                _ => None,
            },
            (NodeMut::Command(c), Step::Test) => match &mut c.body {
                CommandBody::Conditional(cond) => cond.test.as_mut().map(NodeMut::Test),
                _ => None,
            },
            (NodeMut::Test(t), Step::Test) => match &mut t.body {
                TestBody::Not(not) => not.test.as_deref_mut().map(NodeMut::Test),
                _ => None,
            },
            (NodeMut::Test(t), Step::Listed(i)) => match &mut t.body {
                TestBody::AllOf(list) | TestBody::AnyOf(list) => list.0.get_mut(i).map(NodeMut::Test),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Follows the open-node path down from the top-level items.
fn resolve<'a>(items: &'a mut [Item], levels: &[Level]) -> Option<NodeMut<'a>> {
    let (first, rest) = levels.split_first()?;
    let Step::Top(i) = first.step else {
        return None;
    };
    let mut node = match items.get_mut(i)? {
        Item::Command(c) => NodeMut::Command(c),
        Item::Comment(_) => return None,
    };
    for level in rest {
        node = node.descend(level.step)?;
    }
    Some(node)
}

fn role_of(node: &Node) -> (Role, bool) {
    match node {
        Node::Command(c) => match c.body {
            CommandBody::Conditional(_) => (Role::Conditional, false),
            _ => (Role::Action, c.body.accepts_match_type()),
        },
        Node::Test(t) => match t.body {
            TestBody::Not(_) => (Role::Negation, true),
            TestBody::AllOf(_) | TestBody::AnyOf(_) => (Role::TestList, true),
            _ => (Role::Test, true),
        },
    }
}

struct Parser<'a> {
    name: &'a str,
    text: &'a str,
    registry: &'a ActiveRegistry,
    items: Vec<Item>,
    levels: Vec<Level>,
    pending: Vec<Argument>,
    requires: Vec<String>,
}

impl<'a> Parser<'a> {
    fn new(name: &'a str, text: &'a str, registry: &'a ActiveRegistry) -> Self {
        Self {
            name,
            text,
            registry,
            items: Vec::new(),
            levels: Vec::new(),
            pending: Vec::new(),
            requires: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Script, SyntaxError> {
        for token in Tokenizer::new(self.text) {
            match token.kind {
                TokenKind::Identifier => self.identifier(&token)?,
                TokenKind::Tag => self.push_argument(Argument::Tag(token.text.to_lowercase()), &token)?,
                TokenKind::StringList => {
                    self.push_argument(Argument::StringList(StringList::from_token(token.text)), &token)?
                }
                TokenKind::QuotedString => {
                    self.push_argument(Argument::String(QuotedString::from_token(token.text)), &token)?
                }
                TokenKind::MultiLine => {
                    self.push_argument(Argument::MultiLine(MultiLine::from_token(token.text)), &token)?
                }
                TokenKind::Number => self.push_argument(Argument::Number(Number(token.text.to_string())), &token)?,
                TokenKind::HashComment => self.comment(Comment::from_hash_token(token.text)),
                TokenKind::BracketComment => self.comment(Comment::from_bracket_token(token.text)),
                TokenKind::Whitespace => {}
                TokenKind::Semicolon => self.semicolon(&token)?,
                TokenKind::BlockStart => self.block_start(&token)?,
                TokenKind::BlockEnd => self.block_end(&token)?,
                TokenKind::LeftParen => self.left_paren(&token)?,
                TokenKind::RightParen => self.right_paren(&token)?,
                TokenKind::Comma => self.comma(&token)?,
                TokenKind::Unknown => return Err(self.error(format!("Invalid token {}", token.text), &token)),
            }
        }
        self.flush();
        if !self.levels.is_empty() {
            debug!(script = self.name, open = self.levels.len(), "script ended with open commands");
        }
        Ok(Script {
            items: self.items,
            requires: self.requires,
        })
    }

    fn error(&self, message: impl Into<String>, token: &Token<'_>) -> SyntaxError {
        syntax_error(message, self.name, self.text, token)
    }

    fn require(&mut self, capability: &str) {
        if !self.requires.iter().any(|r| r == capability) {
            self.requires.push(capability.to_string());
        }
    }

    /// Hands the buffered arguments to the innermost open node.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut args = Arguments::new(std::mem::take(&mut self.pending));
        match resolve(&mut self.items, &self.levels) {
            Some(NodeMut::Command(c)) => c.body.push_arguments(&mut args),
            Some(NodeMut::Test(t)) => t.body.push_arguments(&mut args),
            None => {}
        }
        if !args.is_empty() {
            let identifier = self.levels.last().map(|l| l.identifier.as_str()).unwrap_or_default();
            warn!(
                script = self.name,
                identifier,
                unused = ?args.into_remaining(),
                "arguments not understood"
            );
        }
    }

    fn identifier(&mut self, token: &Token<'_>) -> Result<(), SyntaxError> {
        self.flush();
        let word = token.text.to_lowercase();
        let expects_test = self.levels.last().is_some_and(Level::expects_test);

        let definition = match word.as_str() {
            "if" | "elsif" | "else" => None,
            _ => self.registry.get(&word),
        };
        let node = match (word.as_str(), definition) {
            ("if" | "elsif" | "else", _) => Node::Command(Command::new(
                word.as_str(),
                CommandBody::Conditional(ConditionalCommand::default()),
            )),
            (_, Some(definition)) => {
                for capability in definition.requires {
                    self.require(capability);
                }
                definition.instantiate()
            }
            (_, None) => {
                warn!(
                    script = self.name,
                    line = token.line,
                    identifier = %word,
                    "unknown or inactive identifier, keeping a placeholder"
                );
                if expects_test {
                    Node::Test(Test::generic(word.as_str()))
                } else {
                    Node::Command(Command::generic(word.as_str()))
                }
            }
        };

        let (role, matcher) = role_of(&node);
        let step = self.attach(node, token)?;
        self.levels.push(Level {
            step,
            role,
            identifier: word,
            block_open: false,
            parens: Parens::None,
            matcher,
        });
        Ok(())
    }

    /// Places a new node under the innermost open node, or at top level.
    fn attach(&mut self, node: Node, token: &Token<'_>) -> Result<Step, SyntaxError> {
        let (name, text) = (self.name, self.text);
        let Some(parent) = self.levels.last() else {
            return match node {
                Node::Command(c) => {
                    self.items.push(Item::Command(c));
                    Ok(Step::Top(self.items.len() - 1))
                }
                Node::Test(t) => Err(syntax_error(
                    format!("Test \"{}\" not part of a control command", t.identifier),
                    name,
                    text,
                    token,
                )),
            };
        };
        let (role, block_open, parens) = (parent.role, parent.block_open, parent.parens);
        let parent_identifier = parent.identifier.clone();
        let lost = || syntax_error("Parser lost track of the open command", name, text, token);

        match (resolve(&mut self.items, &self.levels).ok_or_else(lost)?, node) {
            (NodeMut::Command(c), Node::Test(t)) if role == Role::Conditional && !block_open => {
                let CommandBody::Conditional(cond) = &mut c.body else {
                    return Err(lost());
                };
                if cond.test.is_some() {
                    return Err(syntax_error(
                        format!("Only one test allowed in \"{parent_identifier}\" command"),
                        name,
                        text,
                        token,
                    ));
                }
                cond.test = Some(t);
                Ok(Step::Test)
            }
            (NodeMut::Command(c), Node::Command(child)) if role == Role::Conditional && block_open => {
                let CommandBody::Conditional(cond) = &mut c.body else {
                    return Err(lost());
                };
                cond.commands.push(Item::Command(child));
                Ok(Step::Child(cond.commands.len() - 1))
            }
            (NodeMut::Test(t), Node::Test(child)) if role == Role::Negation => {
                let TestBody::Not(not) = &mut t.body else {
                    return Err(lost());
                };
                if not.test.is_some() {
                    return Err(syntax_error("Only one test allowed in \"not\" test", name, text, token));
                }
                not.test = Some(Box::new(child));
                Ok(Step::Test)
            }
            (NodeMut::Test(t), Node::Test(child)) if role == Role::TestList && parens == Parens::Open => {
                let (TestBody::AllOf(list) | TestBody::AnyOf(list)) = &mut t.body else {
                    return Err(lost());
                };
                list.0.push(child);
                Ok(Step::Listed(list.0.len() - 1))
            }
            (_, Node::Test(t)) => Err(syntax_error(
                format!("Test \"{}\" not allowed in \"{parent_identifier}\"", t.identifier),
                name,
                text,
                token,
            )),
            (_, Node::Command(c)) => Err(syntax_error(
                format!("Command \"{}\" not allowed in \"{parent_identifier}\"", c.identifier),
                name,
                text,
                token,
            )),
        }
    }

    fn push_argument(&mut self, arg: Argument, token: &Token<'_>) -> Result<(), SyntaxError> {
        let (matcher, conditional) = match self.levels.last() {
            Some(level) => (level.matcher, level.role == Role::Conditional),
            None => (false, true),
        };
        if conditional {
            return Err(self.error("Argument not part of command", token));
        }
        if matcher {
            if let Some(match_type) = arg.as_tag().and_then(MatchType::from_tag) {
                return self.set_match_type(match_type, token);
            }
            match self.pending.last().and_then(Argument::as_tag) {
                Some(tag @ (":value" | ":count")) => {
                    let tag = tag.to_string();
                    let match_type = arg
                        .as_str()
                        .and_then(RelationalOp::from_sieve)
                        .and_then(|op| MatchType::relational(&tag, op))
                        .ok_or_else(|| self.error(format!("Invalid relational match-type {tag} {arg}"), token))?;
                    self.pending.pop();
                    return self.set_match_type(match_type, token);
                }
                Some(":comparator") => {
                    let comparator = arg
                        .as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.error(format!("Invalid comparator {arg}"), token))?;
                    self.pending.pop();
                    if !BUILTIN_COMPARATORS.contains(&comparator.as_str()) {
                        self.require(&format!("comparator-{comparator}"));
                    }
                    let slot = self.matcher(token)?;
                    *slot.comparator = Some(comparator);
                    return Ok(());
                }
                _ => {}
            }
        }
        self.pending.push(arg);
        Ok(())
    }

    fn set_match_type(&mut self, match_type: MatchType, token: &Token<'_>) -> Result<(), SyntaxError> {
        if let Some(capability) = match_type.requires() {
            self.require(capability);
        }
        let slot = self.matcher(token)?;
        *slot.match_type = Some(match_type);
        Ok(())
    }

    fn matcher(&mut self, token: &Token<'_>) -> Result<Matcher<'_>, SyntaxError> {
        let (name, text) = (self.name, self.text);
        match resolve(&mut self.items, &self.levels) {
            Some(NodeMut::Test(t)) => Ok(t.matcher_mut()),
            Some(NodeMut::Command(c)) => c
                .body
                .matcher_mut()
                .ok_or_else(|| syntax_error("Match type not allowed here", name, text, token)),
            None => Err(syntax_error("Argument not part of command", name, text, token)),
        }
    }

    fn comment(&mut self, comment: Comment) {
        let Some(block_open) = self.levels.last().map(|l| l.block_open) else {
            self.items.push(Item::Comment(comment));
            return;
        };
        match resolve(&mut self.items, &self.levels) {
            Some(NodeMut::Command(c)) => match &mut c.body {
                CommandBody::Conditional(cond) if block_open => cond.commands.push(Item::Comment(comment)),
                _ => c.comments.push(comment),
            },
            Some(NodeMut::Test(t)) => t.comments.push(comment),
            None => {}
        }
    }

    fn semicolon(&mut self, token: &Token<'_>) -> Result<(), SyntaxError> {
        if self.levels.last().map(|l| l.role) != Some(Role::Action) {
            return Err(self.error("Semicolon not at end of command", token));
        }
        self.flush();
        if let Some(NodeMut::Command(c)) = resolve(&mut self.items, &self.levels) {
            if let CommandBody::Require(require) = &c.body {
                let capabilities: Vec<String> = require.capabilities.iter().map(str::to_string).collect();
                for capability in capabilities {
                    self.require(&capability);
                }
            }
        }
        self.levels.pop();
        Ok(())
    }

    fn block_start(&mut self, token: &Token<'_>) -> Result<(), SyntaxError> {
        self.flush();
        // Action commands take neither tests nor blocks (RFC 5228 section 2.9).
        loop {
            match self.levels.last().map(|l| (l.role, l.block_open, l.parens)) {
                Some((Role::Conditional, false, _)) => break,
                Some((Role::Conditional, true, _)) | None => {
                    return Err(self.error("Block start not part of control command", token))
                }
                Some((Role::TestList, _, Parens::Open)) => {
                    return Err(self.error("Test-list not closed before block start", token))
                }
                Some(_) => {
                    self.levels.pop();
                }
            }
        }
        if let Some(level) = self.levels.last_mut() {
            level.block_open = true;
        }
        Ok(())
    }

    fn block_end(&mut self, token: &Token<'_>) -> Result<(), SyntaxError> {
        match self.levels.last() {
            Some(level) if level.role == Role::Conditional && level.block_open => {
                self.levels.pop();
                Ok(())
            }
            _ => Err(self.error("Block end has no matching block start", token)),
        }
    }

    fn left_paren(&mut self, token: &Token<'_>) -> Result<(), SyntaxError> {
        self.flush();
        loop {
            match self.levels.last().map(|l| (l.role, l.parens)) {
                Some((Role::TestList, Parens::None)) => break,
                Some((Role::Test | Role::Negation, _)) => {
                    self.levels.pop();
                }
                _ => return Err(self.error("Test start not part of anyof/allof test", token)),
            }
        }
        if let Some(level) = self.levels.last_mut() {
            level.parens = Parens::Open;
        }
        Ok(())
    }

    /// Pops to the innermost test-list whose parenthesis is still open.
    fn unwind_to_test_list(&mut self, message: &str, token: &Token<'_>) -> Result<&mut Level, SyntaxError> {
        loop {
            match self.levels.last().map(|l| (l.role, l.parens)) {
                Some((Role::TestList, Parens::Open)) => break,
                Some((Role::Test | Role::Negation | Role::TestList, _)) => {
                    self.levels.pop();
                }
                _ => return Err(self.error(message, token)),
            }
        }
        let (name, text) = (self.name, self.text);
        self.levels
            .last_mut()
            .ok_or_else(|| syntax_error(message, name, text, token))
    }

    fn right_paren(&mut self, token: &Token<'_>) -> Result<(), SyntaxError> {
        self.flush();
        let level = self.unwind_to_test_list("Test end not part of test-list", token)?;
        level.parens = Parens::Closed;
        Ok(())
    }

    fn comma(&mut self, token: &Token<'_>) -> Result<(), SyntaxError> {
        self.flush();
        self.unwind_to_test_list("Comma not part of test-list", token)?;
        Ok(())
    }
}

fn syntax_error(message: impl Into<String>, name: &str, text: &str, token: &Token<'_>) -> SyntaxError {
    SyntaxError::new(message, name, token.line, text, token.end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sieve::conditions::AddressPart;
    use crate::sieve::literal::Text;

    const ALL: &[&str] = &[
        "fileinto", "envelope", "body", "environment", "variables", "vacation", "imap4flags",
        "spamtest", "virustest", "date", "editheader", "reject", "ereject", "enotify", "ihave",
        "mailbox", "mboxmetadata", "include", "relational", "regex",
    ];

    fn parse_all(input: &str) -> Script {
        parse(input, "test.sieve", ALL).unwrap()
    }

    fn top_command(script: &Script, i: usize) -> &Command {
        script.commands().nth(i).unwrap()
    }

    fn conditional(cmd: &Command) -> &ConditionalCommand {
        cmd.as_conditional().expect("Expected conditional")
    }

    #[test]
    fn test_parse_empty() {
        let script = parse_all("");
        assert!(script.items.is_empty());
        assert!(script.requires.is_empty());
    }

    #[test]
    fn test_if_true_stop() {
        let script = parse_all("if true { stop; }");
        assert_eq!(script.items.len(), 1);
        let cmd = top_command(&script, 0);
        assert_eq!(cmd.identifier, "if");
        let cond = conditional(cmd);
        assert!(matches!(cond.test.as_ref().unwrap().body, TestBody::True));
        assert_eq!(cond.commands.len(), 1);
        assert!(matches!(cond.commands[0].as_command().unwrap().body, CommandBody::Stop));
    }

    #[test]
    fn test_parse_require() {
        let script = parse("require [\"fileinto\"];", "x", &["fileinto"]).unwrap();
        assert_eq!(script.requires, vec!["fileinto"]);
    }

    #[test]
    fn test_require_without_capabilities_still_recorded() {
        let none: [&str; 0] = [];
        let script = parse("require [\"fileinto\", \"reject\"];", "x", &none).unwrap();
        assert_eq!(script.requires, vec!["fileinto", "reject"]);
    }

    #[test]
    fn test_unknown_command_is_placeholder() {
        let script = parse_all("unknownCmd;");
        let cmd = top_command(&script, 0);
        assert_eq!(cmd.identifier, "unknowncmd");
        assert!(cmd.is_placeholder());
        assert_eq!(script.placeholders(), vec!["unknowncmd"]);
    }

    #[test]
    fn test_inactive_extension_is_placeholder() {
        let none: [&str; 0] = [];
        let script = parse("fileinto :copy \"Junk\";", "x", &none).unwrap();
        let cmd = top_command(&script, 0);
        assert!(cmd.is_placeholder());
        assert!(script.requires.is_empty());
        assert_eq!(cmd.to_string(), "fileinto :copy \"Junk\";");
    }

    #[test]
    fn test_unknown_test_is_placeholder_test() {
        let script = parse_all("if x_custom \"a\" { keep; }");
        let test = conditional(top_command(&script, 0)).test.as_ref().unwrap();
        assert!(test.is_placeholder());
        assert_eq!(test.identifier, "x_custom");
    }

    #[test]
    fn test_unknown_command_inside_block_is_command() {
        let script = parse_all("if true { x_custom; stop; }");
        let cond = conditional(top_command(&script, 0));
        assert!(matches!(cond.test.as_ref().unwrap().body, TestBody::True));
        assert_eq!(cond.commands.len(), 2);
        assert!(cond.commands[0].as_command().unwrap().is_placeholder());
    }

    #[test]
    fn test_string_list_argument_order() {
        let script = parse_all("x_cmd [\"a\",\"b\"];");
        let CommandBody::Generic(args) = &top_command(&script, 0).body else {
            panic!("Expected placeholder");
        };
        let Argument::StringList(list) = &args.arguments[0] else {
            panic!("Expected StringList");
        };
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_anyof_with_block() {
        let script = parse_all("if anyof (true, false) { fileinto \"X\"; }");
        let cond = conditional(top_command(&script, 0));
        let list = cond.test.as_ref().unwrap().test_list().unwrap();
        assert_eq!(list.len(), 2);
        assert!(matches!(list.0[0].body, TestBody::True));
        assert!(matches!(list.0[1].body, TestBody::False));
        assert_eq!(cond.commands.len(), 1);
        let CommandBody::FileInto(f) = &cond.commands[0].as_command().unwrap().body else {
            panic!("Expected fileinto");
        };
        assert_eq!(f.mailbox.value(), "X");
        assert_eq!(script.requires, vec!["fileinto"]);
    }

    #[test]
    fn test_nested_test_lists() {
        let script = parse_all(
            "if anyof (allof (true, not false), header :is \"a\" \"b\", not exists \"x\") { keep; }",
        );
        let list = conditional(top_command(&script, 0))
            .test
            .as_ref()
            .unwrap()
            .test_list()
            .unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.0[0].test_list().unwrap().len(), 2);
        assert!(matches!(list.0[1].body, TestBody::Header(_)));
        assert!(matches!(list.0[2].body, TestBody::Not(_)));
    }

    #[test]
    fn test_header_arguments_and_match_type() {
        let script = parse_all("if header :contains [\"Subject\",\"X-Spam\"] \"SPAM\" { discard; }");
        let test = conditional(top_command(&script, 0)).test.as_ref().unwrap();
        assert_eq!(test.match_type, Some(MatchType::Contains));
        let TestBody::Header(h) = &test.body else {
            panic!("Expected header");
        };
        assert_eq!(h.header_names.iter().collect::<Vec<_>>(), vec!["Subject", "X-Spam"]);
        assert_eq!(h.key_list.iter().collect::<Vec<_>>(), vec!["SPAM"]);
    }

    #[test]
    fn test_relational_and_comparator() {
        let script = parse_all(
            "if header :value \"ge\" :comparator \"i;ascii-numeric\" \"X-Score\" \"5\" { keep; }",
        );
        let test = conditional(top_command(&script, 0)).test.as_ref().unwrap();
        assert_eq!(test.match_type, Some(MatchType::Value(RelationalOp::Ge)));
        assert_eq!(test.comparator.as_deref(), Some("i;ascii-numeric"));
        assert!(script.requires.contains(&"relational".to_string()));
        assert!(script.requires.contains(&"comparator-i;ascii-numeric".to_string()));
        assert_eq!(
            test.to_string(),
            "header :value \"ge\" :comparator \"i;ascii-numeric\" [\"X-Score\"] [\"5\"]"
        );
    }

    #[test]
    fn test_builtin_comparator_needs_no_require() {
        let script = parse_all("if header :comparator \"i;octet\" :is \"a\" \"b\" { keep; }");
        assert!(script.requires.iter().all(|r| !r.starts_with("comparator-")));
    }

    #[test]
    fn test_invalid_relational_operator() {
        let err = parse("if header :count \"xx\" \"a\" \"b\" { keep; }", "x", ALL).unwrap_err();
        assert!(err.message.starts_with("Invalid relational match-type"));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_match_type_tag_on_plain_command_stays_argument() {
        let script = parse_all("x_cmd :is \"a\";");
        assert_eq!(top_command(&script, 0).to_string(), "x_cmd :is \"a\";");
    }

    #[test]
    fn test_deleteheader_takes_match_type() {
        let script = parse_all("deleteheader :index 2 :matches \"Received\" \"*evil*\";");
        let CommandBody::DeleteHeader(d) = &top_command(&script, 0).body else {
            panic!("Expected deleteheader");
        };
        assert_eq!(d.match_type, Some(MatchType::Matches));
        assert_eq!(d.index.as_ref().and_then(Number::value), Some(2));
        assert_eq!(d.value_patterns.as_ref().map(StringList::len), Some(1));
    }

    #[test]
    fn test_address_part() {
        let script = parse_all("if address :is :domain \"From\" \"example.com\" { keep; }");
        let test = conditional(top_command(&script, 0)).test.as_ref().unwrap();
        let TestBody::Address(a) = &test.body else {
            panic!("Expected address");
        };
        assert_eq!(a.address_part, Some(AddressPart::Domain));
        assert_eq!(test.match_type, Some(MatchType::Is));
    }

    #[test]
    fn test_elsif_else_chain() {
        let script = parse_all(
            "if size :over 1M { discard; } elsif header :is \"X\" \"y\" { keep; } else { stop; }",
        );
        let ids: Vec<_> = script.commands().map(|c| c.identifier.as_str()).collect();
        assert_eq!(ids, vec!["if", "elsif", "else"]);
        assert!(conditional(top_command(&script, 2)).test.is_none());
    }

    #[test]
    fn test_nested_if() {
        let script = parse_all("if true { if false { stop; } keep; }");
        let outer = conditional(top_command(&script, 0));
        assert_eq!(outer.commands.len(), 2);
        let inner = conditional(outer.commands[0].as_command().unwrap());
        assert_eq!(inner.commands.len(), 1);
    }

    #[test]
    fn test_vacation_multiline() {
        let script = parse_all(
            "require \"vacation\";\nvacation :days 3 :subject \"Away\" text:\nI am away.\n..\n.\n;\n",
        );
        let CommandBody::Vacation(v) = &top_command(&script, 1).body else {
            panic!("Expected vacation");
        };
        assert_eq!(v.days.as_ref().and_then(Number::value), Some(3));
        assert!(matches!(&v.reason, Text::MultiLine(m) if m.value == "I am away.\r\n.\r\n"));
    }

    #[test]
    fn test_comments_are_kept() {
        let script = parse_all("# top\nif true {\n  # inside\n  keep;\n}\nstop /* trailing */;");
        assert!(matches!(&script.items[0], Item::Comment(Comment::Hash(t)) if t == "top"));
        let cond = conditional(top_command(&script, 0));
        assert!(matches!(&cond.commands[0], Item::Comment(Comment::Hash(t)) if t == "inside"));
        let stop = top_command(&script, 1);
        assert_eq!(stop.comments, vec![Comment::Bracket(" trailing ".into())]);
    }

    #[test]
    fn test_stray_block_end() {
        let err = parse("} ", "x", ALL).unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.message, "Block end has no matching block start");
    }

    #[test]
    fn test_mismatched_ordering() {
        assert!(parse("if true } stop; {", "x", ALL).is_err());
    }

    #[test]
    fn test_invalid_token_reports_line() {
        let err = parse("keep;\n\nstop @;", "rules.sieve", ALL).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("Invalid token"));
        assert_eq!(err.script, "rules.sieve");
    }

    #[test]
    fn test_argument_before_command() {
        let err = parse("\"loose\";", "x", ALL).unwrap_err();
        assert_eq!(err.message, "Argument not part of command");
    }

    #[test]
    fn test_argument_inside_block() {
        assert!(parse("if true { \"loose\" }", "x", ALL).is_err());
    }

    #[test]
    fn test_semicolon_without_command() {
        let err = parse("keep;;", "x", ALL).unwrap_err();
        assert_eq!(err.message, "Semicolon not at end of command");
    }

    #[test]
    fn test_unclosed_test_list_before_block() {
        let err = parse("if anyof (true, false { keep; }", "x", ALL).unwrap_err();
        assert_eq!(err.message, "Test-list not closed before block start");
    }

    #[test]
    fn test_unclosed_outer_test_list_before_block() {
        let err = parse("if allof (anyof (true), false { keep; }", "x", ALL).unwrap_err();
        assert_eq!(err.message, "Test-list not closed before block start");
    }

    #[test]
    fn test_comparator_requires_string() {
        let err = parse("if header :comparator 5 \"a\" \"b\" { keep; }", "x", ALL).unwrap_err();
        assert!(err.message.starts_with("Invalid comparator"));
    }

    #[test]
    fn test_comma_outside_test_list() {
        let err = parse("if true, false { keep; }", "x", ALL).unwrap_err();
        assert_eq!(err.message, "Comma not part of test-list");
    }

    #[test]
    fn test_paren_outside_test_list() {
        assert!(parse("if header (\"a\") { keep; }", "x", ALL).is_err());
        assert!(parse("keep);", "x", ALL).is_err());
    }

    #[test]
    fn test_missing_semicolon_before_block_end() {
        assert!(parse("if true { stop }", "x", ALL).is_err());
    }

    #[test]
    fn test_command_where_test_expected() {
        let err = parse("if stop; { keep; }", "x", ALL).unwrap_err();
        assert!(err.message.starts_with("Command \"stop\" not allowed"));
    }

    #[test]
    fn test_test_at_top_level() {
        assert!(parse("true;", "x", ALL).is_err());
    }

    #[test]
    fn test_unterminated_block_is_tolerated() {
        let script = parse_all("if true { keep;");
        assert_eq!(conditional(top_command(&script, 0)).commands.len(), 1);
    }

    #[test]
    fn test_identifiers_are_case_insensitive() {
        let script = parse_all("IF TRUE { FileInto \"A\"; }");
        let cond = conditional(top_command(&script, 0));
        assert!(matches!(
            cond.commands[0].as_command().unwrap().body,
            CommandBody::FileInto(_)
        ));
    }

    #[test]
    fn test_crlf_and_lf_inputs_agree() {
        let lf = parse_all("if true {\n  keep;\n}\n");
        let crlf = parse_all("if true {\r\n  keep;\r\n}\r\n");
        assert_eq!(lf, crlf);
    }
}
