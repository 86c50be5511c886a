//! In-place style redaction over a compiled matcher.
//!
//! Each matched span is replaced by ONE copy of the replacement, whatever the
//! match length. Scanning resumes right after the inserted replacement, so
//! the replacement text itself is never re-scanned.

use super::trie::CompiledMatcher;

impl CompiledMatcher {
    /// Replace every leftmost-shortest match in `text` with `replacement`.
    pub fn redact(&self, text: &str, replacement: &str) -> String {
        redact(self, text, replacement)
    }
}

/// Rebuild `text` with matched spans replaced. The input is not modified.
///
/// An empty replacement deletes the matched span.
pub fn redact(matcher: &CompiledMatcher, text: &str, replacement: &str) -> String {
    if matcher.is_empty() || text.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(first) = text[pos..].chars().next() {
        match matcher.shortest_prefix(&text[pos..]) {
            Some((_, bytes)) => {
                out.push_str(replacement);
                pos += bytes;
            }
            None => {
                out.push(first);
                pos += first.len_utf8();
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_span_becomes_one_replacement() {
        let m = CompiledMatcher::from_words(["bad"]).unwrap();
        assert_eq!(m.redact("this is a badword", "*"), "this is a *word");
    }

    #[test]
    fn test_replacement_is_not_rescanned() {
        let m = CompiledMatcher::from_words(["**"]).unwrap();
        assert_eq!(m.redact("x**y", "**"), "x**y");
        assert_eq!(m.redact("****", "**"), "****");
    }

    #[test]
    fn test_consumed_span_is_skipped() {
        // "abab" with {"ab", "ba"}: the "ba" straddling both matches is consumed.
        let m = CompiledMatcher::from_words(["ab", "ba"]).unwrap();
        assert_eq!(m.redact("abab", "#"), "##");
    }

    #[test]
    fn test_empty_replacement_deletes() {
        let m = CompiledMatcher::from_words(["ab"]).unwrap();
        assert_eq!(m.redact("aabb", ""), "ab");
    }

    #[test]
    fn test_multibyte_text() {
        let m = CompiledMatcher::from_words(["敏感"]).unwrap();
        assert_eq!(m.redact("这是敏感词", "***"), "这是***词");
    }
}
