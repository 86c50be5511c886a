//! Redaction behavior.

use wordshield::engine::{redact, CompiledMatcher};

fn matcher(words: &[&str]) -> CompiledMatcher {
    CompiledMatcher::from_words(words.iter().copied()).unwrap()
}

#[test]
fn whole_span_becomes_one_replacement() {
    let m = matcher(&["bad"]);
    assert_eq!(redact(&m, "this is a badword", "*"), "this is a *word");
}

#[test]
fn replacement_is_never_rescanned() {
    let m = matcher(&["**"]);
    assert_eq!(redact(&m, "x**y", "**"), "x**y");
}

#[test]
fn replacement_spelling_another_word_is_kept() {
    let m = matcher(&["cat", "dog"]);
    assert_eq!(m.redact("a cat", "dog"), "a dog");
}

#[test]
fn shortest_completion_leaves_tail() {
    let m = matcher(&["ab", "abc"]);
    assert_eq!(redact(&m, "abc", "#"), "#c");
}

#[test]
fn consumed_span_is_not_matched_again() {
    let m = matcher(&["ab", "ba"]);
    // "ba" at offset 1 overlaps the consumed "ab" and is skipped.
    assert_eq!(redact(&m, "aba", "#"), "#a");
}

#[test]
fn adjacent_matches_each_replaced() {
    let m = matcher(&["ab"]);
    assert_eq!(redact(&m, "ababab", "<>"), "<><><>");
}

#[test]
fn empty_replacement_deletes() {
    let m = matcher(&["bad"]);
    assert_eq!(redact(&m, "not bad at all", ""), "not  at all");
}

#[test]
fn multibyte_text_is_preserved() {
    let m = matcher(&["敏感"]);
    assert_eq!(redact(&m, "这是敏感词 ok", "**"), "这是**词 ok");
}

#[test]
fn empty_vocabulary_returns_input() {
    let m = CompiledMatcher::empty();
    for text in ["", "plain", "émoji 🎉"] {
        assert_eq!(redact(&m, text, "*"), text);
    }
}

#[test]
fn input_is_not_modified() {
    let m = matcher(&["x"]);
    let text = String::from("xyz");
    let out = redact(&m, &text, "_");
    assert_eq!(text, "xyz");
    assert_eq!(out, "_yz");
}
