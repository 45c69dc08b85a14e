//! Dialect extensions
//!
//!     Transliteration house styles differ in which characters join signs inside a word and in
//!     how letters are spelled. Each corpus picks a set of switches once, before parsing starts,
//!     and the switches stay fixed for the whole call.
//!
//!     Every switch changes one rule in isolation:
//!         - dot_as_delimiter / plus_as_delimiter: "." and "+" join graphemes like "-".
//!         - em_dash: "--" is a delimiter of its own instead of a doubled hyphen.
//!         - dishless_numbers: a bare one- or two-digit count is a grapheme without the
//!           parenthesized sign name (`3` instead of `3(diš)`).
//!         - unicode: graphemes use precomposed letters (š, ṣ, ṭ, ḫ). When off, graphemes use the
//!           ASCII digraphs (sz, s,, t,, h,) and any non-ASCII letter is rejected.

use serde::{Deserialize, Serialize};

/// Per-corpus switches toggling individual lexer and parser rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Extensions {
    pub dot_as_delimiter: bool,
    pub plus_as_delimiter: bool,
    pub em_dash: bool,
    pub dishless_numbers: bool,
    pub unicode: bool,
}

impl Extensions {
    /// No extension at all; ASCII letterforms.
    pub const NONE: Extensions = Extensions {
        dot_as_delimiter: false,
        plus_as_delimiter: false,
        em_dash: false,
        dishless_numbers: false,
        unicode: false,
    };

    pub fn with_dot_as_delimiter(mut self, enabled: bool) -> Self {
        self.dot_as_delimiter = enabled;
        self
    }

    pub fn with_plus_as_delimiter(mut self, enabled: bool) -> Self {
        self.plus_as_delimiter = enabled;
        self
    }

    pub fn with_em_dash(mut self, enabled: bool) -> Self {
        self.em_dash = enabled;
        self
    }

    pub fn with_dishless_numbers(mut self, enabled: bool) -> Self {
        self.dishless_numbers = enabled;
        self
    }

    pub fn with_unicode(mut self, enabled: bool) -> Self {
        self.unicode = enabled;
        self
    }
}

impl Default for Extensions {
    /// Unicode letterforms and nothing else.
    fn default() -> Self {
        Extensions::NONE.with_unicode(true)
    }
}
