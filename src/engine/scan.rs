//! Leftmost-shortest scanning over a compiled matcher.
//!
//! Every start offset is tried in increasing order. From each start the walk
//! stops at the FIRST terminal node it reaches, so with both `ab` and `abc`
//! in the vocabulary the text `abc` reports `ab` at offset 0 and nothing
//! longer. Starts are not skipped after a match: overlapping occurrences
//! are all reported.

use std::ops::Range;

use serde::Serialize;

use super::trie::CompiledMatcher;

/// One occurrence of a vocabulary word in a scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Start offset in code points.
    pub start: usize,
    /// Length in code points.
    pub length: usize,
    /// The matched literal.
    pub word: String,
    /// Byte span of the match in the scanned text.
    pub byte_range: Range<usize>,
}

impl CompiledMatcher {
    /// Walk from the root along `rest`, stopping at the first terminal node.
    ///
    /// Returns the match length as `(chars, bytes)`.
    #[inline]
    pub(crate) fn shortest_prefix(&self, rest: &str) -> Option<(usize, usize)> {
        let mut node = self.root();
        for (steps, (offset, c)) in rest.char_indices().enumerate() {
            node = node.child(c)?;
            if node.is_terminal() {
                return Some((steps + 1, offset + c.len_utf8()));
            }
        }
        None
    }

    /// Lazily scan `text`, yielding matches in ascending start order.
    pub fn scan<'m, 't>(&'m self, text: &'t str) -> Matches<'m, 't> {
        Matches {
            matcher: self,
            text,
            byte_pos: 0,
            char_pos: 0,
        }
    }

    /// True if any word occurs in `text`. Stops at the first match.
    pub fn contains_match(&self, text: &str) -> bool {
        self.scan(text).next().is_some()
    }

    /// Every matched literal in scan order, one entry per occurrence.
    pub fn find_words(&self, text: &str) -> Vec<String> {
        self.scan(text).map(|m| m.word).collect()
    }
}

/// Iterator over the matches of one scan. Created by [`CompiledMatcher::scan`].
#[derive(Debug, Clone)]
pub struct Matches<'m, 't> {
    matcher: &'m CompiledMatcher,
    text: &'t str,
    byte_pos: usize,
    char_pos: usize,
}

impl Iterator for Matches<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.matcher.is_empty() {
            return None;
        }
        while self.byte_pos < self.text.len() {
            let rest = &self.text[self.byte_pos..];
            let first = rest.chars().next()?;
            let start_byte = self.byte_pos;
            let start_char = self.char_pos;

            let found = self.matcher.shortest_prefix(rest);
            self.byte_pos += first.len_utf8();
            self.char_pos += 1;

            if let Some((length, bytes)) = found {
                return Some(Match {
                    start: start_char,
                    length,
                    word: rest[..bytes].to_string(),
                    byte_range: start_byte..start_byte + bytes,
                });
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Matches<'_, '_> {}
