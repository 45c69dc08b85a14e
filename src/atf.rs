//! ATF transliteration lines
//!
//! Control flow: the dialect [Extensions] select a [Grammar]; the [parser] drives the
//! [lexer] one token at a time, consults the [span] tracker on every bracket, and returns the
//! grapheme occurrences of the line or the first error.

pub mod corpus;
pub mod error;
pub mod extensions;
pub mod grammar;
pub mod language;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use error::{ErrorKind, ParseError};
pub use extensions::Extensions;
pub use grammar::Grammar;
pub use lexer::{tokenize, Lexer};
pub use parser::{parse_transliteration, GraphemeOccurrence};
pub use span::{SpanAttribute, SpanAttributes};
pub use token::{Delimiter, Token, TokenKind};
