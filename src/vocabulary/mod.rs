//! Vocabulary management for Wordshield.
//!
//! Holds the administrator-defined word set, the store that publishes
//! compiled matchers for it, and the interfaces to external persistence.

mod error;
pub mod source;
mod store;
mod word;

use std::collections::BTreeMap;

pub use error::VocabularyError;
pub use source::{export_flat_file, FlatFileSource, SourceError, WordRepository, WordSource};
pub use store::{BulkOutcome, LoadReport, StoreState, VocabularyConfig, VocabularyStore, WordPage};
pub use word::{normalize_literal, Word, WordId, WordRecord, DEFAULT_MAX_WORD_CHARS};

/// A set of words, unique by literal.
///
/// Plain value type: the copy inside a compiled matcher is only ever exposed
/// by shared reference, so a published snapshot cannot change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: BTreeMap<String, Word>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, literal: &str) -> bool {
        self.words.contains_key(literal)
    }

    pub fn get(&self, literal: &str) -> Option<&Word> {
        self.words.get(literal)
    }

    /// Linear lookup; vocabularies are administrative scale.
    pub fn find_by_id(&self, id: WordId) -> Option<&Word> {
        self.words.values().find(|w| w.id == id)
    }

    /// Words ordered by literal.
    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.values()
    }

    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    /// Insert `word`. Returns false, leaving the vocabulary unchanged, if the
    /// literal is already present.
    pub fn insert(&mut self, word: Word) -> bool {
        if self.words.contains_key(&word.literal) {
            return false;
        }
        self.words.insert(word.literal.clone(), word);
        true
    }

    pub fn remove(&mut self, literal: &str) -> Option<Word> {
        self.words.remove(literal)
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }
}

impl FromIterator<Word> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = Word>>(iter: I) -> Self {
        let mut vocabulary = Vocabulary::new();
        for word in iter {
            vocabulary.insert(word);
        }
        vocabulary
    }
}
