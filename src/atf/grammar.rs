//! Grapheme grammar
//!
//!     Pure text classification: given the text remaining at some offset, decide how long a
//!     prefix of it forms a single grapheme, if any. Nothing here holds parsing state.
//!
//!     The grammar is built compositionally from small patterns, from the inside out:
//!
//!         value        lowercase letters, optional index, modifiers           ka, aš₂, kabx
//!         name         uppercase letters (or a catalog number), optional      LUGAL, LAK001,
//!                      index, modifiers, optional allograph                   KA@g, KA~a
//!         compound     a bar-delimited sign-composition expression,           |KA×A|
//!                      opaque here beyond its bars
//!         qualified    a value followed by the sign actually written          ka(KA)
//!         number       a count with the counted sign in parentheses           2(diš), 1/2(iku)
//!         alternative  one of the above plus uncertainty flags, allograph     ka#?, ka!(KA)
//!                      suffixes, or a correction
//!         grapheme     alternatives joined by "/", or the placeholder x       a/e, x#
//!
//!     Values and names may also carry an unbarred containment tail (`lu₂@s×BAD`), which is
//!     part of the sign reading and never split into several graphemes.
//!
//!     All patterns are compiled once into `Lazy` statics. A [Grammar] merely selects among them
//!     according to the dialect [Extensions], so constructing one is free and it can be shared
//!     across threads.
//!
//! Letterforms
//!
//!     Both ASCII digraphs (sz, s,, t,, h,) and precomposed letters (š, ṣ, ṭ, ḫ) are accepted by
//!     the patterns; the `unicode` extension then rejects whichever form the corpus does not
//!     use. See [letterforms_valid].

use crate::atf::extensions::Extensions;
use once_cell::sync::Lazy;
use regex::Regex;

const LOWER: &str = r"(?:sz|s,|t,|h,|[abdeghijklmnpqrstuwyzšṣṭḫĝŋʾ'áàéèíìúù])";
const UPPER: &str = r"(?:SZ|S,|T,|H,|[ABDEGHIJKLMNPQRSTUWYZŠṢṬḪĜŊÁÀÉÈÍÌÚÙ])";
const INDEX: &str = r"(?:[₀-₉]+|[0-9]+|ₓ|x)";
// gunu, šeššig, tenu, zida-tenu, kaba-tenu, rotated, nutillu, inverted, variant, curved, flat
const MODIFIER: &str = r"@(?:sz|45|90|180|270|[cfghknrstvzš])";
const ALLOGRAPH: &str = r"~(?:[a-z]+[0-9]*|[0-9]+)";
const COMPOUND: &str = r"\|[^|\s]+\|";
const COUNT: &str = r"(?:[0-9]+(?:/[0-9]+)?|n)";
const BARE_COUNT: &str = r"[0-9]{1,2}";

/// Grapheme pattern without diš-less numerals.
static GRAPHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&grapheme_pattern(false)).expect("grapheme pattern compiles")
});

/// Grapheme pattern accepting bare one- or two-digit counts.
static DISHLESS_GRAPHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&grapheme_pattern(true)).expect("grapheme pattern compiles")
});

static ASCII_DIGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)sz|[sth],").expect("digraph pattern compiles"));

static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\$[^$]*\$\)").expect("comment pattern compiles"));

static LANGUAGE_SHIFT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%[a-z][a-z0-9-]*").expect("language shift pattern compiles"));

static SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]+").expect("space pattern compiles"));

/// Column markers of lexical texts; each must be followed by whitespace.
static FIELD_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[#"~|=^@&][ \t]"#).expect("field separator pattern compiles"));

fn grapheme_pattern(dishless_numbers: bool) -> String {
    let modifiers = format!("(?:{MODIFIER})*");
    let sign = format!("(?:{LOWER}+{INDEX}?|{UPPER}+{INDEX}?){modifiers}");
    let value = format!("{LOWER}+{INDEX}?{modifiers}(?:×{sign})*");
    let name = format!(
        "(?:[A-Z]{{3,}}[0-9]{{3}}|{UPPER}+{INDEX}?){modifiers}(?:×{sign})*(?:{ALLOGRAPH})?"
    );
    let qualified = format!(r"{value}\((?:{name}|{COMPOUND})\)");
    let number = format!(r"{COUNT}\((?:{value}|{name}|{COMPOUND})\){modifiers}");
    let bare_number = if dishless_numbers {
        format!("|{BARE_COUNT}")
    } else {
        String::new()
    };
    // Order matters: the regex engine is leftmost-first, so the forms that extend a shorter
    // form (number over bare count, qualified over value) must come first.
    let base = format!("(?:{number}{bare_number}|{qualified}|{value}|{name}|{COMPOUND})");
    let flags = format!(r"(?:!\((?:{value}|{name}|{COMPOUND})\)|[#?!*]|{ALLOGRAPH})*");
    let alternative = format!("{base}{flags}");
    format!("^(?:{alternative}(?:/{alternative})*|x[#?!*]*)")
}

/// Whether the letters of `grapheme` use the letterforms the dialect expects.
///
/// With `unicode` enabled the ASCII stand-in digraphs are rejected; otherwise any non-ASCII
/// letter is. Subscript digits are not letters and pass either way.
pub fn letterforms_valid(grapheme: &str, unicode: bool) -> bool {
    if unicode {
        !ASCII_DIGRAPH.is_match(grapheme)
    } else {
        !grapheme
            .chars()
            .any(|c| c.is_alphabetic() && !c.is_ascii())
    }
}

/// The immutable grammar tables for one set of dialect extensions.
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    extensions: Extensions,
    grapheme: &'static Regex,
}

impl Grammar {
    pub fn new(extensions: Extensions) -> Self {
        let grapheme: &'static Regex = if extensions.dishless_numbers {
            &DISHLESS_GRAPHEME
        } else {
            &GRAPHEME
        };
        Grammar {
            extensions,
            grapheme,
        }
    }

    pub fn extensions(&self) -> Extensions {
        self.extensions
    }

    /// Length of the longest grapheme at the start of `rest`.
    ///
    /// A prefix spelled with the wrong letterforms for this dialect is no match at all.
    pub fn match_grapheme(&self, rest: &str) -> Option<usize> {
        let found = self.grapheme.find(rest)?;
        if letterforms_valid(found.as_str(), self.extensions.unicode) {
            Some(found.end())
        } else {
            None
        }
    }

    /// Whether the whole of `text` is exactly one grapheme.
    pub fn is_grapheme(&self, text: &str) -> bool {
        self.match_grapheme(text) == Some(text.len()) && !text.is_empty()
    }

    /// An inline comment, `($ ... $)`.
    pub fn match_comment(&self, rest: &str) -> Option<usize> {
        COMMENT.find(rest).map(|m| m.end())
    }

    /// A `%code` language shift, without the space that must follow it.
    pub fn match_language_shift(&self, rest: &str) -> Option<usize> {
        LANGUAGE_SHIFT.find(rest).map(|m| m.end())
    }

    pub fn match_space(&self, rest: &str) -> Option<usize> {
        SPACE.find(rest).map(|m| m.end())
    }

    /// A column marker. Only the marker character is matched; the whitespace after it is left
    /// for the following space token.
    pub fn match_field_separator(&self, rest: &str) -> Option<usize> {
        FIELD_SEPARATOR.find(rest).map(|_| 1)
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar::new(Extensions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unicode() -> Grammar {
        Grammar::default()
    }

    fn ascii() -> Grammar {
        Grammar::new(Extensions::NONE)
    }

    #[test]
    fn values_and_names() {
        let grammar = unicode();
        for text in ["lugal", "aš₂", "kaₓ", "LUGAL", "DIŠ", "LAK001", "KA@g", "KA@g@t", "KA~a"] {
            assert!(grammar.is_grapheme(text), "{text} should be one grapheme");
        }
    }

    #[test]
    fn containment_stays_inside_the_reading() {
        let grammar = unicode();
        assert!(grammar.is_grapheme("lu₂@s×BAD"));
        assert!(grammar.is_grapheme("GA₂×AN"));
    }

    #[test]
    fn compounds_are_opaque() {
        let grammar = unicode();
        assert!(grammar.is_grapheme("|KA×A|"));
        assert!(grammar.is_grapheme("|ŠE.NUN&ŠE.NUN|"));
        assert_eq!(grammar.match_grapheme("|KA×A|-ni"), Some("|KA×A|".len()));
        assert_eq!(grammar.match_grapheme("|KA×A"), None);
    }

    #[test]
    fn qualified_readings_and_corrections() {
        let grammar = unicode();
        assert!(grammar.is_grapheme("ka(KA)"));
        assert!(grammar.is_grapheme("kaₓ(|KA×A|)"));
        assert!(grammar.is_grapheme("ka!(KA)"));
        assert!(grammar.is_grapheme("ka#?"));
        assert!(grammar.is_grapheme("ka#!(SAG)*"));
    }

    #[test]
    fn qualification_needs_a_sign_name() {
        let grammar = unicode();
        // "(ba" opens a maybe-span rather than qualifying the value.
        assert_eq!(grammar.match_grapheme("ka(ba)"), Some(2));
    }

    #[test]
    fn numbers() {
        let grammar = unicode();
        assert!(grammar.is_grapheme("2(diš)"));
        assert!(grammar.is_grapheme("1/2(iku)"));
        assert!(grammar.is_grapheme("n(AŠ@c)"));
        assert!(grammar.is_grapheme("1(|U.U|)"));
        assert!(!grammar.is_grapheme("3"));
    }

    #[test]
    fn dishless_numbers_extension() {
        let grammar = Grammar::new(Extensions::default().with_dishless_numbers(true));
        assert!(grammar.is_grapheme("3"));
        assert!(grammar.is_grapheme("12"));
        assert!(grammar.is_grapheme("3(diš)"));
        assert_eq!(grammar.match_grapheme("123"), Some(2));
    }

    #[test]
    fn alternatives_and_placeholder() {
        let grammar = unicode();
        assert!(grammar.is_grapheme("a/e"));
        assert!(grammar.is_grapheme("x"));
        assert!(grammar.is_grapheme("x#?"));
        assert_eq!(grammar.match_grapheme("x-ni"), Some(1));
    }

    #[test]
    fn delimiters_end_a_grapheme() {
        let grammar = unicode();
        assert_eq!(grammar.match_grapheme("ta-aš₂"), Some(2));
        assert_eq!(grammar.match_grapheme("lugal]"), Some(5));
        assert_eq!(grammar.match_grapheme("-ta"), None);
    }

    #[test]
    fn letterforms_follow_the_unicode_switch() {
        assert!(unicode().is_grapheme("šu"));
        assert!(!unicode().is_grapheme("szu"));
        assert!(ascii().is_grapheme("szu"));
        assert!(!ascii().is_grapheme("šu"));
        assert!(ascii().is_grapheme("ka2"));
        assert!(ascii().is_grapheme("|KAxMASZ|"));
    }

    #[test]
    fn auxiliary_patterns() {
        let grammar = unicode();
        assert_eq!(grammar.match_comment("($ blank $) a"), Some(11));
        assert_eq!(grammar.match_comment("(a)"), None);
        assert_eq!(grammar.match_language_shift("%sux lugal"), Some(4));
        assert_eq!(grammar.match_space("  a"), Some(2));
        assert_eq!(grammar.match_field_separator("# a"), Some(1));
        assert_eq!(grammar.match_field_separator("#a"), None);
    }
}
