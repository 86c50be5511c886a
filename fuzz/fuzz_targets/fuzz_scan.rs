//! Fuzz target for scanning.
//!
//! Arbitrary vocabularies and texts must never panic, and every reported
//! match must slice back to a vocabulary word at its offsets.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wordshield::engine::CompiledMatcher;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    words: Vec<&'a str>,
    text: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let words: Vec<&str> = input.words.into_iter().filter(|w| !w.is_empty()).collect();
    let Ok(matcher) = CompiledMatcher::from_words(words) else {
        return;
    };

    let mut last_start = None;
    for m in matcher.scan(input.text) {
        assert_eq!(&input.text[m.byte_range.clone()], m.word);
        assert!(matcher.vocabulary().contains(&m.word));
        assert_eq!(m.word.chars().count(), m.length);
        if let Some(prev) = last_start {
            assert!(m.start > prev, "starts must increase");
        }
        last_start = Some(m.start);
    }
});
