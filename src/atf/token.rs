//! Token types
//!
//!     A transliteration line is cut into tokens of nine kinds. Graphemes, comments, language
//!     shifts, spaces and field separators are recognized by the patterns in
//!     [grammar](crate::atf::grammar). Everything with a fixed spelling (brackets, intra-word
//!     delimiters and the ellipsis) is recognized by the logos-derived [Punct] lexer, which
//!     already picks the longest spelling among its own tokens (`<<` over `<`, `)>` over `)`).
//!
//!     Tokens borrow their text from the source line and carry their byte range, so the
//!     concatenation of all token texts always reproduces the line.

use logos::Logos;
use serde::Serialize;
use std::fmt;

/// Kinds of token, listed in tie-break priority order (see [TokenKind::priority]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    Grapheme,
    LanguageShift,
    Space,
    UnknownMissingRun,
    Delimiter,
    FieldSeparator,
    Bracket,
    EndOfText,
}

impl TokenKind {
    /// Rank used when several kinds match equally long text: lower wins.
    pub fn priority(self) -> u8 {
        match self {
            TokenKind::Comment => 0,
            TokenKind::Grapheme => 1,
            TokenKind::LanguageShift => 2,
            TokenKind::Space => 3,
            TokenKind::UnknownMissingRun => 4,
            TokenKind::Delimiter => 5,
            TokenKind::FieldSeparator => 6,
            TokenKind::Bracket => 7,
            TokenKind::EndOfText => 8,
        }
    }
}

/// A token with its matched text and byte range in the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl<'a> Token<'a> {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})@{}", self.kind, self.text, self.start)
    }
}

/// Separators that can precede a grapheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Delimiter {
    Space,
    Hyphen,
    Colon,
    EmDash,
    Dot,
    Plus,
}

impl Delimiter {
    /// The delimiter spelled by a delimiter or space token.
    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            "-" => Some(Delimiter::Hyphen),
            ":" => Some(Delimiter::Colon),
            "--" => Some(Delimiter::EmDash),
            "." => Some(Delimiter::Dot),
            "+" => Some(Delimiter::Plus),
            _ if !text.is_empty() && text.chars().all(|c| c == ' ' || c == '\t') => {
                Some(Delimiter::Space)
            }
            _ => None,
        }
    }

    /// Name as used in serialized output.
    pub fn name(self) -> &'static str {
        match self {
            Delimiter::Space => "space",
            Delimiter::Hyphen => "hyphen",
            Delimiter::Colon => "colon",
            Delimiter::EmDash => "em-dash",
            Delimiter::Dot => "dot",
            Delimiter::Plus => "plus",
        }
    }
}

/// Fixed-spelling punctuation.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    // Delimiters
    #[token("-")]
    Hyphen,
    #[token("--")]
    EmDash,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("+")]
    Plus,

    #[token("...")]
    #[token("…")]
    Ellipsis,

    // Brackets
    #[token("[")]
    BrokenOpen,
    #[token("]")]
    BrokenClose,
    #[token("(")]
    MaybeOpen,
    #[token(")")]
    MaybeClose,
    #[token("<")]
    SuppliedOpen,
    #[token(">")]
    SuppliedClose,
    #[token("<<")]
    ExcisedOpen,
    #[token(">>")]
    ExcisedClose,
    #[token("<(")]
    ImpliedOpen,
    #[token(")>")]
    ImpliedClose,
    #[token("{(")]
    DocumentGlossOpen,
    #[token(")}")]
    DocumentGlossClose,
    #[token("{{")]
    LinguisticGlossOpen,
    #[token("}}")]
    LinguisticGlossClose,
    #[token("{")]
    DeterminativeOpen,
    #[token("}")]
    DeterminativeClose,
    #[token("_")]
    Logogram,
}

impl Punct {
    pub fn kind(self) -> TokenKind {
        match self {
            Punct::Hyphen | Punct::EmDash | Punct::Colon | Punct::Dot | Punct::Plus => {
                TokenKind::Delimiter
            }
            Punct::Ellipsis => TokenKind::UnknownMissingRun,
            _ => TokenKind::Bracket,
        }
    }

    /// The punctuation spelled at the start of `rest`, with its length in bytes.
    pub fn at_start(rest: &str) -> Option<(Punct, usize)> {
        let mut lexer = Punct::lexer(rest);
        match lexer.next() {
            Some(Ok(punct)) => Some((punct, lexer.span().end)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punct_prefers_longest_spelling() {
        assert_eq!(Punct::at_start("<<a"), Some((Punct::ExcisedOpen, 2)));
        assert_eq!(Punct::at_start("<(a"), Some((Punct::ImpliedOpen, 2)));
        assert_eq!(Punct::at_start("<a"), Some((Punct::SuppliedOpen, 1)));
        assert_eq!(Punct::at_start(")>"), Some((Punct::ImpliedClose, 2)));
        assert_eq!(Punct::at_start("}}"), Some((Punct::LinguisticGlossClose, 2)));
        assert_eq!(Punct::at_start("--a"), Some((Punct::EmDash, 2)));
        assert_eq!(Punct::at_start("...]"), Some((Punct::Ellipsis, 3)));
        assert_eq!(Punct::at_start(".a"), Some((Punct::Dot, 1)));
        assert_eq!(Punct::at_start("a"), None);
    }

    #[test]
    fn punct_kinds() {
        assert_eq!(Punct::Hyphen.kind(), TokenKind::Delimiter);
        assert_eq!(Punct::Ellipsis.kind(), TokenKind::UnknownMissingRun);
        assert_eq!(Punct::Logogram.kind(), TokenKind::Bracket);
        assert_eq!(Punct::DeterminativeOpen.kind(), TokenKind::Bracket);
    }

    #[test]
    fn delimiters_from_text() {
        assert_eq!(Delimiter::from_text("-"), Some(Delimiter::Hyphen));
        assert_eq!(Delimiter::from_text("--"), Some(Delimiter::EmDash));
        assert_eq!(Delimiter::from_text("  \t"), Some(Delimiter::Space));
        assert_eq!(Delimiter::from_text(""), None);
        assert_eq!(Delimiter::from_text("["), None);
        assert_eq!(Delimiter::from_text(":").map(Delimiter::name), Some("colon"));
    }

    #[test]
    fn priorities_follow_listing_order() {
        assert!(TokenKind::Comment.priority() < TokenKind::Grapheme.priority());
        assert!(TokenKind::Delimiter.priority() < TokenKind::Bracket.priority());
        assert!(TokenKind::Bracket.priority() < TokenKind::EndOfText.priority());
    }
}
