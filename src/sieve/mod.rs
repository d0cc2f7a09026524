pub mod arguments;
pub mod ast;
pub mod commands;
pub mod conditions;
pub mod emitter;
pub mod error;
pub mod extensions;
pub mod lexer;
pub mod literal;
pub mod parser;
pub mod registry;

pub use ast::{Command, CommandBody, Item, MatchType, Node, RelationalOp, Script, Test, TestBody};
pub use error::SyntaxError;
pub use parser::{parse, parse_with};
pub use registry::{known_capabilities, ActiveRegistry};
