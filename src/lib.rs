//! # atf
//!
//! A parser for single lines of ATF, the line-oriented plain-text markup used to
//! transliterate cuneiform texts.
//!
//! File Layout
//!
//! src/atf
//!   ├── extensions   Per-corpus dialect switches
//!   ├── grammar      What text constitutes a single grapheme (no state)
//!   ├── token        Token kinds and the fixed-spelling punctuation lexer
//!   ├── lexer        Longest-match tokenizer with one-token lookahead
//!   ├── span         Span attributes and the open-attribute tracker
//!   ├── language     Inline language codes
//!   ├── parser       Word/text grammar producing grapheme occurrences
//!   ├── error        Parse errors and their categories
//!   └── corpus       Batch ingestion of whole ATF documents
//!
//! The entry point is [parse_transliteration](atf::parse_transliteration). Each call is a pure
//! function of the line, the initial language and the dialect [Extensions](atf::Extensions),
//! so lines can be parsed from as many threads as one likes.

pub mod atf;

pub use atf::{
    parse_transliteration, tokenize, Delimiter, ErrorKind, Extensions, Grammar,
    GraphemeOccurrence, ParseError, SpanAttribute, SpanAttributes,
};
