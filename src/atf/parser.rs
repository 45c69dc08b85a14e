//! Word and text parser
//!
//!     Recursive descent over the token stream of one line:
//!
//!         text           := word (Space word)* EndOfText
//!         word           := FieldSeparator | LanguageShift | delimited-text (D delimited-text)*
//!         delimited-text := opening* core closing* [determinative closing*]*
//!         core           := Grapheme | UnknownMissingRun | Comment
//!         determinative  := "{" [LanguageShift Space] det-text (D det-text)* "}"
//!         det-text       := opening* Grapheme closing*
//!
//!     Bracket nesting is not turned into a tree. Every bracket token goes through the
//!     [SpanTracker], and every grapheme is emitted with a snapshot of the attributes open at
//!     that moment and the delimiter that preceded it.
//!
//! Delimiter state
//!
//!     The parser tracks whether the last thing read was a delimiter, content, or nothing at
//!     all (line start). A grapheme read right after content, with no delimiter in between,
//!     is a missing delimiter unless it is the first content of a determinative, implied or
//!     linguistic gloss span. A delimiter read right after another one is a double
//!     delimiter.
//!
//!     Field separators and language shifts are transparent words: the space after them does
//!     not count as a second delimiter, and the next grapheme sees the delimiter state from
//!     before them.
//!
//!     Closing a determinative or linguistic gloss hands back the state saved when it opened,
//!     so in `a-{d}utu` both `d` and `utu` record the hyphen.

use crate::atf::error::{ErrorKind, ParseError};
use crate::atf::grammar::Grammar;
use crate::atf::language;
use crate::atf::lexer::Lexer;
use crate::atf::span::{DelimiterState, Marker, SpanAttribute, SpanAttributes, SpanTracker};
use crate::atf::token::{Delimiter, Token, TokenKind};
use log::debug;
use serde::Serialize;
use std::fmt;

/// One sign as read on the line, with its context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphemeOccurrence {
    pub text: String,
    /// Language tag in effect when the grapheme was read.
    pub language: String,
    pub attributes: SpanAttributes,
    /// The delimiter immediately before the grapheme; `None` at line start or right after a
    /// closing bracket with no delimiter.
    pub delimiter: Option<Delimiter>,
}

impl fmt::Display for GraphemeOccurrence {
    /// Tab-separated: text, language, attribute names, delimiter name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attributes = self
            .attributes
            .attributes()
            .map(SpanAttribute::name)
            .collect::<Vec<_>>();
        let attributes = if attributes.is_empty() {
            "-".to_string()
        } else {
            attributes.join(",")
        };
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.text,
            self.language,
            attributes,
            self.delimiter.map_or("none", Delimiter::name)
        )
    }
}

/// Parse one transliteration line.
///
/// `language` is the tag in effect at the start of the line; `%code` shifts change it from
/// there on. An empty line has no occurrences.
pub fn parse_transliteration(
    text: &str,
    language: &str,
    grammar: &Grammar,
) -> Result<Vec<GraphemeOccurrence>, ParseError> {
    Parser::new(text, language, grammar).parse()
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    spans: SpanTracker,
    state: DelimiterState,
    /// The current state came back from a closed determinative or gloss rather than from a
    /// delimiter token read just now.
    restored: bool,
    language: String,
    occurrences: Vec<GraphemeOccurrence>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, language: &str, grammar: &'a Grammar) -> Self {
        Self {
            lexer: Lexer::new(source, grammar),
            spans: SpanTracker::new(),
            state: DelimiterState::LineStart,
            restored: false,
            language: language.to_string(),
            occurrences: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Result<Vec<GraphemeOccurrence>, ParseError> {
        let source = self.lexer.source();
        if source.is_empty() {
            return Ok(Vec::new());
        }

        let mut content = self.parse_word()?;
        loop {
            let token = self.lexer.peek()?;
            match token.kind {
                TokenKind::Space => {
                    self.lexer.advance()?;
                    if content {
                        self.delimit(token)?;
                    }
                    content = self.parse_word()?;
                }
                TokenKind::EndOfText => break,
                _ => return Err(self.fail(ErrorKind::GenericSyntaxError, token.start)),
            }
        }

        if let Some(attribute) = self.spans.first_open() {
            return Err(self.fail(ErrorKind::UnclosedAttribute(attribute), source.len()));
        }
        debug!(
            "parsed {} graphemes from {:?}",
            self.occurrences.len(),
            source
        );
        Ok(self.occurrences)
    }

    /// Returns whether the word carried content, as opposed to a separator or shift.
    fn parse_word(&mut self) -> Result<bool, ParseError> {
        let token = self.lexer.peek()?;
        match token.kind {
            TokenKind::FieldSeparator => {
                self.lexer.advance()?;
                Ok(false)
            }
            TokenKind::LanguageShift => {
                self.lexer.advance()?;
                self.shift_language(token)?;
                Ok(false)
            }
            _ => {
                self.parse_delimited_text()?;
                while let Some(delimiter) = self.lexer.accept(TokenKind::Delimiter, None)? {
                    self.delimit(delimiter)?;
                    self.parse_delimited_text()?;
                }
                Ok(true)
            }
        }
    }

    fn parse_delimited_text(&mut self) -> Result<(), ParseError> {
        let mut units = 0;
        loop {
            let token = self.lexer.peek()?;
            match token.kind {
                TokenKind::Bracket
                    if token.text == SpanAttribute::Determinative.open_marker() =>
                {
                    self.parse_determinative()?;
                }
                TokenKind::Bracket => {
                    self.lexer.advance()?;
                    self.apply_marker(token)?;
                    continue;
                }
                TokenKind::Grapheme => {
                    self.lexer.advance()?;
                    self.emit(token)?;
                }
                TokenKind::UnknownMissingRun => {
                    self.lexer.advance()?;
                    if !self.spans.is_open(SpanAttribute::Broken) {
                        return Err(self.fail(ErrorKind::BreakageOutsideBrackets, token.start));
                    }
                    self.mark_content();
                }
                TokenKind::Comment => {
                    self.lexer.advance()?;
                    self.mark_content();
                }
                _ => break,
            }
            units += 1;
        }

        if units == 0 {
            let token = self.lexer.peek()?;
            let kind = match (self.state, token.kind) {
                (DelimiterState::Delimited(_), TokenKind::Delimiter | TokenKind::Space) => {
                    ErrorKind::DoubleDelimiter
                }
                _ => ErrorKind::GenericSyntaxError,
            };
            return Err(self.fail(kind, token.start));
        }
        Ok(())
    }

    fn parse_determinative(&mut self) -> Result<(), ParseError> {
        let open = self.lexer.advance()?;
        self.apply_marker(open)?;

        if let Some(shift) = self.lexer.accept(TokenKind::LanguageShift, None)? {
            self.shift_language(shift)?;
            if self.lexer.accept(TokenKind::Space, None)?.is_none() {
                let token = self.lexer.peek()?;
                return Err(self.fail(ErrorKind::GenericSyntaxError, token.start));
            }
        }

        self.parse_det_text()?;
        while let Some(delimiter) = self.lexer.accept(TokenKind::Delimiter, None)? {
            self.delimit(delimiter)?;
            self.parse_det_text()?;
        }

        let token = self.lexer.peek()?;
        match token.kind {
            TokenKind::Bracket if token.text == SpanAttribute::Determinative.close_marker() => {
                self.lexer.advance()?;
                self.apply_marker(token)
            }
            TokenKind::EndOfText => Err(self.fail(
                ErrorKind::UnclosedAttribute(SpanAttribute::Determinative),
                token.start,
            )),
            _ => Err(self.fail(ErrorKind::GenericSyntaxError, token.start)),
        }
    }

    fn parse_det_text(&mut self) -> Result<(), ParseError> {
        while let Some(token) = self.peek_marker(|marker, state| match marker {
            Marker::Open(_) => true,
            Marker::Toggle(_) => state.is_boundary(),
            Marker::Close(_) => false,
        })? {
            self.lexer.advance()?;
            self.apply_marker(token)?;
        }

        let token = self.lexer.peek()?;
        match token.kind {
            TokenKind::Grapheme => {
                self.lexer.advance()?;
                self.emit(token)?;
            }
            TokenKind::Delimiter if matches!(self.state, DelimiterState::Delimited(_)) => {
                return Err(self.fail(ErrorKind::DoubleDelimiter, token.start));
            }
            TokenKind::EndOfText => {
                return Err(self.fail(
                    ErrorKind::UnclosedAttribute(SpanAttribute::Determinative),
                    token.start,
                ));
            }
            _ => return Err(self.fail(ErrorKind::GenericSyntaxError, token.start)),
        }

        // "}" is left for the determinative itself.
        while let Some(token) = self.peek_marker(|marker, state| match marker {
            Marker::Close(attribute) => attribute != SpanAttribute::Determinative,
            Marker::Toggle(_) => !state.is_boundary(),
            Marker::Open(_) => false,
        })? {
            self.lexer.advance()?;
            self.apply_marker(token)?;
        }
        Ok(())
    }

    /// The next token if it is a bracket whose marker satisfies `wanted`.
    fn peek_marker(
        &mut self,
        wanted: impl Fn(Marker, DelimiterState) -> bool,
    ) -> Result<Option<Token<'a>>, ParseError> {
        let token = self.lexer.peek()?;
        if !token.is(TokenKind::Bracket) {
            return Ok(None);
        }
        Ok(Marker::from_text(token.text)
            .filter(|marker| wanted(*marker, self.state))
            .map(|_| token))
    }

    fn apply_marker(&mut self, token: Token<'a>) -> Result<(), ParseError> {
        let marker = Marker::from_text(token.text)
            .ok_or_else(|| self.fail(ErrorKind::GenericSyntaxError, token.start))?;
        let state = self.state;
        let saved = match marker {
            Marker::Open(attribute) => self.spans.open(attribute, state).map(|_| None),
            Marker::Close(attribute) => self.spans.close(attribute),
            Marker::Toggle(attribute) => self.spans.toggle(attribute, state),
        }
        .map_err(|kind| self.fail(kind, token.start))?;

        if let Some(saved) = saved {
            self.state = saved;
            self.restored = matches!(saved, DelimiterState::Delimited(_));
        }
        Ok(())
    }

    fn delimit(&mut self, token: Token<'a>) -> Result<(), ParseError> {
        let delimiter = Delimiter::from_text(token.text)
            .ok_or_else(|| self.fail(ErrorKind::GenericSyntaxError, token.start))?;
        if matches!(self.state, DelimiterState::Delimited(_)) && !self.restored {
            return Err(self.fail(ErrorKind::DoubleDelimiter, token.start));
        }
        self.state = DelimiterState::Delimited(delimiter);
        self.restored = false;
        Ok(())
    }

    fn emit(&mut self, token: Token<'a>) -> Result<(), ParseError> {
        if self.state == DelimiterState::Undelimited && !self.spans.at_span_start() {
            return Err(self.fail(ErrorKind::MissingDelimiter, token.start));
        }
        self.occurrences.push(GraphemeOccurrence {
            text: token.text.to_string(),
            language: self.language.clone(),
            attributes: self.spans.current(),
            delimiter: self.state.delimiter(),
        });
        self.spans.record_grapheme();
        self.mark_content();
        Ok(())
    }

    fn mark_content(&mut self) {
        self.state = DelimiterState::Undelimited;
        self.restored = false;
    }

    fn shift_language(&mut self, token: Token<'a>) -> Result<(), ParseError> {
        let code = token.text.strip_prefix('%').unwrap_or(token.text);
        match language::resolve(code) {
            Some(tag) => {
                self.language = tag.to_string();
                Ok(())
            }
            None => Err(self.fail(
                ErrorKind::UnknownInlineLanguageCode(code.to_string()),
                token.start,
            )),
        }
    }

    fn fail(&self, kind: ErrorKind, offset: usize) -> ParseError {
        ParseError::new(kind, self.lexer.source(), offset)
    }
}
