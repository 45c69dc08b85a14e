//! Property-based tests for the lexer and parser
//!
//! Lines are assembled from fragments that each lex on their own, so every generated line
//! tokenizes; whether it also parses depends on how the fragments happen to meet.

use atf::atf::span::Marker;
use atf::atf::TokenKind;
use atf::{parse_transliteration, tokenize, ErrorKind, Grammar, SpanAttribute};
use proptest::prelude::*;
use std::collections::BTreeMap;

const FRAGMENTS: &[&str] = &[
    "lugal", "ka", "aš₂", "x", "ŠE", "|KA×A|", "2(diš)", "ka(KA)", "{d}", "{", "}", "[", "]",
    "(", ")", "<", ">", "<(", ")>", "{{", "}}", "_", "-", ":", " ", "...", "%s",
    "($ blank $)",
];

const GRAPHEMES: &[&str] = &["lugal", "ka", "aš₂", "x", "ŠE", "|KA×A|", "2(diš)"];

fn line_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..16).prop_map(|parts| parts.concat())
}

fn word_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(GRAPHEMES), 1..4).prop_map(|parts| parts.join("-"))
}

/// Attributes with distinct open and close spellings that may wrap a whole word.
fn wrapping_attribute_strategy() -> impl Strategy<Value = SpanAttribute> {
    prop::sample::select(vec![
        SpanAttribute::Broken,
        SpanAttribute::Maybe,
        SpanAttribute::Supplied,
        SpanAttribute::Excised,
        SpanAttribute::Implied,
        SpanAttribute::LinguisticGloss,
        SpanAttribute::DocumentGloss,
    ])
}

proptest! {
    #[test]
    fn test_tokens_reproduce_the_line(line in line_strategy()) {
        let grammar = Grammar::default();
        let tokens = tokenize(&line, &grammar);
        prop_assert!(tokens.is_ok(), "failed to tokenize {:?}: {:?}", line, tokens);
        let tokens = tokens.unwrap();

        let mut offset = 0;
        for token in &tokens {
            prop_assert_eq!(token.start, offset);
            prop_assert_eq!(&line[token.start..token.end], token.text);
            offset = token.end;
        }
        prop_assert_eq!(offset, line.len());
        let rebuilt: String = tokens.iter().map(|token| token.text).collect();
        prop_assert_eq!(rebuilt, line);
    }

    #[test]
    fn test_parsing_is_pure(line in line_strategy()) {
        let grammar = Grammar::default();
        let first = parse_transliteration(&line, "und", &grammar);
        let second = parse_transliteration(&line, "und", &grammar);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_successful_parses_close_every_attribute(line in line_strategy()) {
        // Any line that parses opened and closed each attribute equally often.
        let grammar = Grammar::default();
        if parse_transliteration(&line, "und", &grammar).is_ok() {
            let tokens = tokenize(&line, &grammar).unwrap();
            let mut balance: BTreeMap<SpanAttribute, (usize, usize)> = BTreeMap::new();
            let mut toggles = 0;
            for token in tokens.iter().filter(|token| token.is(TokenKind::Bracket)) {
                match Marker::from_text(token.text) {
                    Some(Marker::Open(attribute)) => balance.entry(attribute).or_default().0 += 1,
                    Some(Marker::Close(attribute)) => balance.entry(attribute).or_default().1 += 1,
                    Some(Marker::Toggle(_)) => toggles += 1,
                    None => prop_assert!(false, "unknown bracket {:?} in {:?}", token.text, line),
                }
            }
            for (attribute, (opened, closed)) in balance {
                prop_assert_eq!(opened, closed, "{} in {:?}", attribute, line);
            }
            prop_assert_eq!(toggles % 2, 0, "odd logogram markers in {:?}", line);
        }
    }

    #[test]
    fn test_wrapped_word_carries_attribute(
        attribute in wrapping_attribute_strategy(),
        word in word_strategy(),
    ) {
        let line = format!("{}{}{}", attribute.open_marker(), word, attribute.close_marker());
        let occurrences = parse_transliteration(&line, "und", &Grammar::default());
        prop_assert!(occurrences.is_ok(), "{:?}: {:?}", line, occurrences);
        let occurrences = occurrences.unwrap();
        prop_assert!(!occurrences.is_empty());
        prop_assert!(occurrences.iter().all(|o| o.attributes.has(attribute)));
    }

    #[test]
    fn test_opening_twice_is_nested(
        attribute in wrapping_attribute_strategy(),
        first in word_strategy(),
        second in word_strategy(),
    ) {
        let marker = attribute.open_marker();
        let line = format!("{marker}{first} {marker}{second}");
        let error = parse_transliteration(&line, "und", &Grammar::default());
        prop_assert!(error.is_err(), "{:?} parsed", line);
        let error = error.unwrap_err();
        prop_assert_eq!(error.kind, ErrorKind::NestedAttribute(attribute));
        prop_assert_eq!(error.offset, marker.len() + first.len() + 1);
    }
}
