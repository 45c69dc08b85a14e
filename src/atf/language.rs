//! Inline language codes
//!
//! A `%code` shift switches the language of every following grapheme on the line. The code is
//! either one of the short abbreviations used in transliterations or a full language tag.

/// Abbreviation or tag, and the language tag it stands for.
const LANGUAGE_CODES: &[(&str, &str)] = &[
    // Akkadian and its dialects
    ("a", "akk"),
    ("akk", "akk"),
    ("eakk", "akk-x-earakk"),
    ("oakk", "akk-x-oldakk"),
    ("ur3akk", "akk-x-ur3akk"),
    ("oa", "akk-x-oldass"),
    ("ob", "akk-x-oldbab"),
    ("ma", "akk-x-midass"),
    ("mb", "akk-x-midbab"),
    ("na", "akk-x-neoass"),
    ("nb", "akk-x-neobab"),
    ("lb", "akk-x-ltebab"),
    ("sb", "akk-x-stdbab"),
    ("ca", "akk-x-conakk"),
    ("akk-x-earakk", "akk-x-earakk"),
    ("akk-x-oldakk", "akk-x-oldakk"),
    ("akk-x-ur3akk", "akk-x-ur3akk"),
    ("akk-x-oldass", "akk-x-oldass"),
    ("akk-x-oldbab", "akk-x-oldbab"),
    ("akk-x-midass", "akk-x-midass"),
    ("akk-x-midbab", "akk-x-midbab"),
    ("akk-x-neoass", "akk-x-neoass"),
    ("akk-x-neobab", "akk-x-neobab"),
    ("akk-x-ltebab", "akk-x-ltebab"),
    ("akk-x-stdbab", "akk-x-stdbab"),
    ("akk-x-conakk", "akk-x-conakk"),
    // Sumerian
    ("s", "sux"),
    ("sux", "sux"),
    ("eg", "sux"),
    ("e", "sux-x-emesal"),
    ("es", "sux-x-emesal"),
    ("sux-x-emesal", "sux-x-emesal"),
    ("sy", "sux-x-syllabic"),
    ("sux-x-syllabic", "sux-x-syllabic"),
    // Others written in cuneiform
    ("h", "hit"),
    ("hit", "hit"),
    ("elx", "elx"),
    ("xhu", "xhu"),
    ("uga", "uga"),
    ("qpc", "qpc"),
    ("qpn", "qpn"),
    ("und", "und"),
];

/// Resolve an inline language code (without its `%`) to a language tag.
pub fn resolve(code: &str) -> Option<&'static str> {
    LANGUAGE_CODES
        .iter()
        .find(|(abbreviation, _)| *abbreviation == code)
        .map(|(_, tag)| *tag)
}
