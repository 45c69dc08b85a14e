//! Parse errors
//!
//!     A line either parses completely or fails at its first error; there is no in-line
//!     recovery and no partial result. The error keeps the whole line so that messages can
//!     point at the failure as `before☞after`.

use crate::atf::span::SpanAttribute;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An attribute already open was opened again.
    NestedAttribute(SpanAttribute),
    /// A close marker with no matching open.
    UnstartedAttribute(SpanAttribute),
    /// The line ended with the attribute still open.
    ///
    /// This is the end-of-input form of [ErrorKind::UnstartedAttribute]: the close marker
    /// that would match is missing rather than the open one. Consumers that group errors
    /// into the seven basic categories should count it as unstarted-attribute.
    UnclosedAttribute(SpanAttribute),
    /// Two delimiters with no grapheme between them.
    DoubleDelimiter,
    /// A grapheme directly follows content where a delimiter is required.
    MissingDelimiter,
    /// An ellipsis outside an open broken span.
    BreakageOutsideBrackets,
    /// A `%code` shift naming no known language.
    UnknownInlineLanguageCode(String),
    /// No token matches, or a token appears where the grammar allows none of its kind.
    GenericSyntaxError,
}

impl ErrorKind {
    /// Stable name for grouping errors in batch reports.
    pub fn category(&self) -> &'static str {
        match self {
            ErrorKind::NestedAttribute(_) => "nested-attribute",
            ErrorKind::UnstartedAttribute(_) => "unstarted-attribute",
            ErrorKind::UnclosedAttribute(_) => "unclosed-attribute",
            ErrorKind::DoubleDelimiter => "double-delimiter",
            ErrorKind::MissingDelimiter => "missing-delimiter",
            ErrorKind::BreakageOutsideBrackets => "breakage-outside-brackets",
            ErrorKind::UnknownInlineLanguageCode(_) => "unknown-inline-language-code",
            ErrorKind::GenericSyntaxError => "syntax-error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NestedAttribute(attribute) => write!(f, "Nested {}", attribute),
            ErrorKind::UnstartedAttribute(attribute) => write!(f, "Unstarted {}", attribute),
            ErrorKind::UnclosedAttribute(attribute) => write!(f, "Unclosed {}", attribute),
            ErrorKind::DoubleDelimiter => write!(f, "Double delimiter"),
            ErrorKind::MissingDelimiter => write!(f, "Missing delimiter"),
            ErrorKind::BreakageOutsideBrackets => write!(f, "Breakage outside brackets"),
            ErrorKind::UnknownInlineLanguageCode(code) => {
                write!(f, "Unknown inline language code %{}", code)
            }
            ErrorKind::GenericSyntaxError => write!(f, "Syntax error"),
        }
    }
}

/// A failed parse of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    /// The full line that failed.
    pub source: String,
    /// Byte offset of the failure in `source`.
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ErrorKind, source: &str, offset: usize) -> Self {
        Self {
            kind,
            source: source.to_string(),
            offset,
        }
    }

    /// The text before the failure.
    pub fn before(&self) -> &str {
        &self.source[..self.offset]
    }

    /// The text from the failure on.
    pub fn after(&self) -> &str {
        &self.source[self.offset..]
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}☞{}", self.kind, self.before(), self.after())
    }
}

impl std::error::Error for ParseError {}

impl Serialize for ParseError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParseError", 4)?;
        state.serialize_field("category", self.kind.category())?;
        state.serialize_field("message", &self.kind.to_string())?;
        state.serialize_field("offset", &self.offset)?;
        state.serialize_field("source", &self.source)?;
        state.end()
    }
}

impl From<ParseError> for String {
    fn from(err: ParseError) -> Self {
        err.to_string()
    }
}
