//! SIEVE (RFC 5228) mail filter scripts: tokenizer, parser, typed grammar
//! model and serializer.
//!
//! ```
//! let script = sieve_grammar::parse(
//!     "require \"fileinto\";\r\nif header :contains \"Subject\" \"[SPAM]\" { fileinto \"Junk\"; }",
//!     "spam.sieve",
//!     &["fileinto"],
//! )
//! .unwrap();
//! assert_eq!(script.requires, vec!["fileinto"]);
//! ```

pub mod config;
pub mod sieve;

pub use sieve::{emitter::emit, parse, parse_with, ActiveRegistry, Script, SyntaxError};
