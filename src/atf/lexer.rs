//! Lexer
//!
//!     Cuts one transliteration line into tokens. At every offset each token kind that could
//!     start there is tried:
//!
//!         Comment, Grapheme, LanguageShift, Space, UnknownMissingRun, Delimiter,
//!         FieldSeparator, Bracket
//!
//!     The candidate with the strictly longest match wins. When several are equally long, the
//!     one listed first above wins (see [longest_match]). When nothing matches the lexer fails
//!     with a syntax error at that offset. Running off the end of the line is not an error: it
//!     yields an EndOfText token, as often as asked.
//!
//! Dialects
//!
//!     The active delimiter set depends on the [Extensions](crate::atf::Extensions): "." and "+"
//!     only delimit when their extension is on, and "--" is a single em-dash delimiter only with
//!     the em-dash extension; without it, the first "-" is a hyphen and the second one is
//!     lexed on its own.
//!
//!     Field separators (column markers of lexical texts) are only recognized at the start of
//!     the line or right after a space.
//!
//! Lookahead
//!
//!     The parser drives the lexer one token at a time through [Lexer::peek],
//!     [Lexer::advance] and [Lexer::accept]. At most one token is buffered.

use crate::atf::error::{ErrorKind, ParseError};
use crate::atf::grammar::Grammar;
use crate::atf::token::{Punct, Token, TokenKind};
use log::trace;
use std::cmp::Reverse;

/// Pick the winning candidate: strictly longest match, then lowest [TokenKind::priority].
///
/// Empty matches never win.
pub fn longest_match(candidates: &[(TokenKind, usize)]) -> Option<(TokenKind, usize)> {
    candidates
        .iter()
        .copied()
        .filter(|(_, len)| *len > 0)
        .min_by_key(|(kind, len)| (Reverse(*len), kind.priority()))
}

pub struct Lexer<'a> {
    source: &'a str,
    grammar: &'a Grammar,
    offset: usize,
    previous: Option<TokenKind>,
    lookahead: Option<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, grammar: &'a Grammar) -> Self {
        Self {
            source,
            grammar,
            offset: 0,
            previous: None,
            lookahead: None,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The next token, without consuming it.
    pub fn peek(&mut self) -> Result<Token<'a>, ParseError> {
        match self.lookahead {
            Some(token) => Ok(token),
            None => {
                let token = self.scan()?;
                self.lookahead = Some(token);
                Ok(token)
            }
        }
    }

    /// Consume and return the next token.
    pub fn advance(&mut self) -> Result<Token<'a>, ParseError> {
        let token = self.peek()?;
        self.lookahead = None;
        Ok(token)
    }

    /// Consume the next token if it is of `kind` (and spelled `text`, when given).
    pub fn accept(
        &mut self,
        kind: TokenKind,
        text: Option<&str>,
    ) -> Result<Option<Token<'a>>, ParseError> {
        let token = self.peek()?;
        if token.kind == kind && text.map_or(true, |text| token.text == text) {
            self.advance().map(Some)
        } else {
            Ok(None)
        }
    }

    fn scan(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.offset;
        if start >= self.source.len() {
            return Ok(Token {
                kind: TokenKind::EndOfText,
                text: "",
                start,
                end: start,
            });
        }

        let rest = &self.source[start..];
        let candidates = self.candidates(rest);
        let Some((kind, len)) = longest_match(&candidates) else {
            return Err(ParseError::new(
                ErrorKind::GenericSyntaxError,
                self.source,
                start,
            ));
        };

        let end = start + len;
        let token = Token {
            kind,
            text: &self.source[start..end],
            start,
            end,
        };
        trace!("lexed {}", token);
        self.offset = end;
        self.previous = Some(kind);
        Ok(token)
    }

    /// Every token kind matching at the start of `rest`, in listing order.
    fn candidates(&self, rest: &str) -> Vec<(TokenKind, usize)> {
        let grammar = self.grammar;
        let extensions = grammar.extensions();
        let mut candidates = Vec::with_capacity(4);

        if let Some(len) = grammar.match_comment(rest) {
            candidates.push((TokenKind::Comment, len));
        }
        if let Some(len) = grammar.match_grapheme(rest) {
            candidates.push((TokenKind::Grapheme, len));
        }
        if let Some(len) = grammar.match_language_shift(rest) {
            candidates.push((TokenKind::LanguageShift, len));
        }
        if let Some(len) = grammar.match_space(rest) {
            candidates.push((TokenKind::Space, len));
        }
        if let Some((punct, len)) = Punct::at_start(rest) {
            let candidate = match punct {
                Punct::EmDash if !extensions.em_dash => Some((TokenKind::Delimiter, 1)),
                Punct::Dot if !extensions.dot_as_delimiter => None,
                Punct::Plus if !extensions.plus_as_delimiter => None,
                punct => Some((punct.kind(), len)),
            };
            candidates.extend(candidate);
        }
        if self.at_word_start() {
            if let Some(len) = grammar.match_field_separator(rest) {
                candidates.push((TokenKind::FieldSeparator, len));
            }
        }
        candidates
    }

    fn at_word_start(&self) -> bool {
        matches!(self.previous, None | Some(TokenKind::Space))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    /// Tokens up to, not including, EndOfText. Stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(token) if token.is(TokenKind::EndOfText) => None,
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                // Park at the end so iteration stops.
                self.offset = self.source.len();
                Some(Err(err))
            }
        }
    }
}

/// Tokenize a whole line, excluding the final EndOfText.
pub fn tokenize<'a>(source: &'a str, grammar: &'a Grammar) -> Result<Vec<Token<'a>>, ParseError> {
    Lexer::new(source, grammar).collect()
}
