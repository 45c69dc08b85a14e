//! Span attributes
//!
//!     Markup properties such as breakage or uncertainty apply to a contiguous run of
//!     graphemes between an open and a close marker. Bracket nesting is never rebuilt as a
//!     tree: every grapheme simply records the set of attributes open when it was read.
//!
//!     The [SpanTracker] is the small state machine behind that set. An attribute may be open
//!     at most once; opening it again, or closing one that is not open, is an error. The
//!     determinative and the linguistic gloss save the delimiter state that was current when
//!     they opened and hand it back on close, so that `{d}inanna` joins `inanna` to whatever
//!     preceded the `{`.
//!
//!     The logogram marker `_` has a single spelling for both ends. It opens when a word or
//!     segment boundary just occurred (line start or a delimiter) and closes otherwise.

use crate::atf::error::ErrorKind;
use crate::atf::token::Delimiter;
use bitflags::bitflags;
use serde::{Serialize, Serializer};
use std::fmt;

/// The nine markup properties a grapheme can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpanAttribute {
    Logogram,
    Maybe,
    Determinative,
    Broken,
    Supplied,
    Excised,
    Implied,
    LinguisticGloss,
    DocumentGloss,
}

impl SpanAttribute {
    pub const ALL: [SpanAttribute; 9] = [
        SpanAttribute::Logogram,
        SpanAttribute::Maybe,
        SpanAttribute::Determinative,
        SpanAttribute::Broken,
        SpanAttribute::Supplied,
        SpanAttribute::Excised,
        SpanAttribute::Implied,
        SpanAttribute::LinguisticGloss,
        SpanAttribute::DocumentGloss,
    ];

    pub fn open_marker(self) -> &'static str {
        match self {
            SpanAttribute::Logogram => "_",
            SpanAttribute::Maybe => "(",
            SpanAttribute::Determinative => "{",
            SpanAttribute::Broken => "[",
            SpanAttribute::Supplied => "<",
            SpanAttribute::Excised => "<<",
            SpanAttribute::Implied => "<(",
            SpanAttribute::LinguisticGloss => "{{",
            SpanAttribute::DocumentGloss => "{(",
        }
    }

    pub fn close_marker(self) -> &'static str {
        match self {
            SpanAttribute::Logogram => "_",
            SpanAttribute::Maybe => ")",
            SpanAttribute::Determinative => "}",
            SpanAttribute::Broken => "]",
            SpanAttribute::Supplied => ">",
            SpanAttribute::Excised => ">>",
            SpanAttribute::Implied => ")>",
            SpanAttribute::LinguisticGloss => "}}",
            SpanAttribute::DocumentGloss => ")}",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpanAttribute::Logogram => "LOGOGRAM",
            SpanAttribute::Maybe => "MAYBE",
            SpanAttribute::Determinative => "DETERMINATIVE",
            SpanAttribute::Broken => "BROKEN",
            SpanAttribute::Supplied => "SUPPLIED",
            SpanAttribute::Excised => "EXCISED",
            SpanAttribute::Implied => "IMPLIED",
            SpanAttribute::LinguisticGloss => "LINGUISTIC_GLOSS",
            SpanAttribute::DocumentGloss => "DOCUMENT_GLOSS",
        }
    }

    /// Whether closing this attribute restores the delimiter state saved when it opened.
    pub fn saves_delimiter(self) -> bool {
        matches!(
            self,
            SpanAttribute::Determinative | SpanAttribute::LinguisticGloss
        )
    }

    fn flag(self) -> SpanAttributes {
        match self {
            SpanAttribute::Logogram => SpanAttributes::LOGOGRAM,
            SpanAttribute::Maybe => SpanAttributes::MAYBE,
            SpanAttribute::Determinative => SpanAttributes::DETERMINATIVE,
            SpanAttribute::Broken => SpanAttributes::BROKEN,
            SpanAttribute::Supplied => SpanAttributes::SUPPLIED,
            SpanAttribute::Excised => SpanAttributes::EXCISED,
            SpanAttribute::Implied => SpanAttributes::IMPLIED,
            SpanAttribute::LinguisticGloss => SpanAttributes::LINGUISTIC_GLOSS,
            SpanAttribute::DocumentGloss => SpanAttributes::DOCUMENT_GLOSS,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SpanAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// A set of span attributes, as snapshotted onto each grapheme occurrence.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpanAttributes: u16 {
        const LOGOGRAM = 1 << 0;
        const MAYBE = 1 << 1;
        const DETERMINATIVE = 1 << 2;
        const BROKEN = 1 << 3;
        const SUPPLIED = 1 << 4;
        const EXCISED = 1 << 5;
        const IMPLIED = 1 << 6;
        const LINGUISTIC_GLOSS = 1 << 7;
        const DOCUMENT_GLOSS = 1 << 8;
    }
}

impl SpanAttributes {
    pub fn has(self, attribute: SpanAttribute) -> bool {
        self.contains(attribute.flag())
    }

    pub fn attributes(self) -> impl Iterator<Item = SpanAttribute> {
        SpanAttribute::ALL
            .into_iter()
            .filter(move |attribute| self.has(*attribute))
    }
}

impl From<SpanAttribute> for SpanAttributes {
    fn from(attribute: SpanAttribute) -> Self {
        attribute.flag()
    }
}

impl FromIterator<SpanAttribute> for SpanAttributes {
    fn from_iter<I: IntoIterator<Item = SpanAttribute>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SpanAttributes::empty(), |set, attribute| set | attribute.flag())
    }
}

impl Serialize for SpanAttributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.attributes())
    }
}

/// Which way a bracket token moves an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Open(SpanAttribute),
    Close(SpanAttribute),
    /// `_`: direction depends on the delimiter state.
    Toggle(SpanAttribute),
}

impl Marker {
    /// Lookup from bracket spelling to attribute and direction.
    pub fn from_text(text: &str) -> Option<Marker> {
        use SpanAttribute::*;
        let marker = match text {
            "[" => Marker::Open(Broken),
            "]" => Marker::Close(Broken),
            "(" => Marker::Open(Maybe),
            ")" => Marker::Close(Maybe),
            "<" => Marker::Open(Supplied),
            ">" => Marker::Close(Supplied),
            "<<" => Marker::Open(Excised),
            ">>" => Marker::Close(Excised),
            "<(" => Marker::Open(Implied),
            ")>" => Marker::Close(Implied),
            "{(" => Marker::Open(DocumentGloss),
            ")}" => Marker::Close(DocumentGloss),
            "{{" => Marker::Open(LinguisticGloss),
            "}}" => Marker::Close(LinguisticGloss),
            "{" => Marker::Open(Determinative),
            "}" => Marker::Close(Determinative),
            "_" => Marker::Toggle(Logogram),
            _ => return None,
        };
        Some(marker)
    }

    pub fn attribute(self) -> SpanAttribute {
        match self {
            Marker::Open(attribute) | Marker::Close(attribute) | Marker::Toggle(attribute) => {
                attribute
            }
        }
    }
}

/// What separates the next grapheme from what came before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterState {
    /// Nothing has been read on this line yet.
    LineStart,
    /// A delimiter (or space) was the last thing read.
    Delimited(Delimiter),
    /// A grapheme or other content was the last thing read, with no delimiter since.
    Undelimited,
}

impl DelimiterState {
    /// Whether a word or segment boundary just occurred.
    pub fn is_boundary(self) -> bool {
        !matches!(self, DelimiterState::Undelimited)
    }

    /// The delimiter to record on a grapheme read in this state.
    pub fn delimiter(self) -> Option<Delimiter> {
        match self {
            DelimiterState::Delimited(delimiter) => Some(delimiter),
            DelimiterState::LineStart | DelimiterState::Undelimited => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenSpan {
    saved: Option<DelimiterState>,
    graphemes: usize,
}

/// The open-attribute table of one parse call.
#[derive(Debug, Clone, Default)]
pub struct SpanTracker {
    open: [Option<OpenSpan>; 9],
}

impl SpanTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, attribute: SpanAttribute) -> bool {
        self.open[attribute.index()].is_some()
    }

    /// Snapshot of the attributes currently open.
    pub fn current(&self) -> SpanAttributes {
        SpanAttribute::ALL
            .into_iter()
            .filter(|attribute| self.is_open(*attribute))
            .collect()
    }

    pub fn open(
        &mut self,
        attribute: SpanAttribute,
        state: DelimiterState,
    ) -> Result<(), ErrorKind> {
        let slot = &mut self.open[attribute.index()];
        if slot.is_some() {
            return Err(ErrorKind::NestedAttribute(attribute));
        }
        *slot = Some(OpenSpan {
            saved: attribute.saves_delimiter().then_some(state),
            graphemes: 0,
        });
        Ok(())
    }

    /// Close `attribute`, returning the delimiter state saved when it opened, if it saves one.
    pub fn close(&mut self, attribute: SpanAttribute) -> Result<Option<DelimiterState>, ErrorKind> {
        match self.open[attribute.index()].take() {
            Some(span) => Ok(span.saved),
            None => Err(ErrorKind::UnstartedAttribute(attribute)),
        }
    }

    /// Open or close the logogram span depending on whether a boundary just occurred.
    pub fn toggle(
        &mut self,
        attribute: SpanAttribute,
        state: DelimiterState,
    ) -> Result<Option<DelimiterState>, ErrorKind> {
        if state.is_boundary() {
            self.open(attribute, state).map(|_| None)
        } else {
            self.close(attribute)
        }
    }

    /// Count a grapheme against every open span.
    pub fn record_grapheme(&mut self) {
        for span in self.open.iter_mut().flatten() {
            span.graphemes += 1;
        }
    }

    /// Whether the next grapheme would be the very first content of a determinative, implied
    /// or linguistic gloss span, none of which has content yet. Such a grapheme needs no
    /// delimiter before it.
    pub fn at_span_start(&self) -> bool {
        let counts = [
            SpanAttribute::Determinative,
            SpanAttribute::Implied,
            SpanAttribute::LinguisticGloss,
        ]
        .map(|attribute| self.open[attribute.index()].map(|span| span.graphemes));
        counts.iter().any(|count| *count == Some(0))
            && counts.iter().all(|count| matches!(count, None | Some(0)))
    }

    /// The first attribute still open, in declaration order.
    pub fn first_open(&self) -> Option<SpanAttribute> {
        SpanAttribute::ALL
            .into_iter()
            .find(|attribute| self.is_open(*attribute))
    }
}
