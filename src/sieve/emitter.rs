//! Emit SIEVE script text from AST nodes.
//!
//! Output uses CRLF line endings and one tab per nesting level.

use std::fmt::{self, Write};

use crate::sieve::ast::*;
use crate::sieve::literal::{Comment, StringList};

pub fn emit(script: &Script) -> String {
    script.to_string()
}

/// Like [`emit`], but prepends one `require` for capabilities the script
/// uses without declaring them.
pub fn emit_with_requires(script: &Script) -> String {
    let missing = undeclared_requires(script);
    if missing.is_empty() {
        return emit(script);
    }
    let list: StringList = missing.into_iter().collect();
    format!("require {list};\r\n{script}")
}

/// Capabilities in `script.requires` that no top-level `require` names.
pub fn undeclared_requires(script: &Script) -> Vec<&str> {
    let declared: Vec<&str> = script
        .commands()
        .filter_map(|cmd| match &cmd.body {
            CommandBody::Require(r) => Some(r.capabilities.iter()),
            _ => None,
        })
        .flatten()
        .collect();
    script
        .requires
        .iter()
        .map(String::as_str)
        .filter(|r| !declared.contains(r))
        .collect()
}

pub(crate) fn write_items<W: Write>(out: &mut W, items: &[Item], indent: usize) -> fmt::Result {
    for item in items {
        match item {
            Item::Command(cmd) => write_command(out, cmd, indent)?,
            Item::Comment(comment) => write!(out, "{}{comment}", "\t".repeat(indent))?,
        }
        out.write_str("\r\n")?;
    }
    Ok(())
}

pub(crate) fn write_command<W: Write>(out: &mut W, cmd: &Command, indent: usize) -> fmt::Result {
    let prefix = "\t".repeat(indent);
    write!(out, "{prefix}{}", cmd.identifier)?;
    for comment in &cmd.comments {
        write_attached_comment(out, comment)?;
    }
    let args = cmd.body.to_string();
    if !args.is_empty() {
        write!(out, " {args}")?;
    }
    match &cmd.body {
        CommandBody::Conditional(c) if c.commands.is_empty() => out.write_str(" {}"),
        CommandBody::Conditional(c) => {
            out.write_str(" {\r\n")?;
            write_items(out, &c.commands, indent + 1)?;
            write!(out, "{prefix}}}")
        }
        _ => out.write_str(";"),
    }
}

/// Writes a comment owned by a node right after the node's identifier,
/// where the parser attaches it again.
pub(crate) fn write_attached_comment<W: Write>(out: &mut W, comment: &Comment) -> fmt::Result {
    match comment {
        Comment::Hash(_) => write!(out, " {comment}\r\n"),
        Comment::Bracket(_) => write!(out, " {comment}"),
    }
}
