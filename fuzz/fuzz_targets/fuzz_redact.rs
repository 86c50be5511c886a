//! Fuzz target for redaction.
//!
//! Redaction must terminate without panicking for any vocabulary,
//! replacement and text, and leave clean text untouched.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wordshield::engine::CompiledMatcher;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    words: Vec<&'a str>,
    replacement: &'a str,
    text: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let words: Vec<&str> = input.words.into_iter().filter(|w| !w.is_empty()).collect();
    let Ok(matcher) = CompiledMatcher::from_words(words) else {
        return;
    };

    let filtered = matcher.redact(input.text, input.replacement);
    if !matcher.contains_match(input.text) {
        assert_eq!(filtered, input.text);
    }

    // Each match shrinks to one replacement, so growth is bounded.
    let matches = matcher.scan(input.text).count();
    assert!(filtered.len() <= input.text.len() + matches * input.replacement.len());
});
