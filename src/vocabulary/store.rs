//! Copy-on-write vocabulary store.
//!
//! Holds exactly one installed [`CompiledMatcher`]. Readers load the current
//! `Arc` without locking and keep scanning their snapshot even if a swap
//! happens underneath them. Writers serialize on a mutex, compile a new
//! matcher off to the side and publish it with one atomic store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use serde::Serialize;

use super::word::{normalize_literal, DEFAULT_MAX_WORD_CHARS};
use super::{Vocabulary, VocabularyError, Word, WordId, WordRecord};
use crate::engine::{compile, CompiledMatcher, Match, MAX_PATTERN_CHARS};
use crate::telemetry;

/// Vocabulary store configuration.
#[derive(Debug, Clone)]
pub struct VocabularyConfig {
    /// Maximum word length in code points.
    pub max_word_chars: usize,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self { max_word_chars: DEFAULT_MAX_WORD_CHARS }
    }
}

/// Lifecycle of the installed matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Nothing compiled yet; reads see the empty matcher.
    Uninitialized,
    /// A compiled matcher is installed.
    Ready,
}

/// Result of a bulk mutation. Failed elements are skipped, not fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Words added or removed, in input order.
    pub applied: Vec<Word>,
    /// Inputs that were skipped, with the reason.
    pub skipped: Vec<(String, VocabularyError)>,
}

impl BulkOutcome {
    /// Number of successful elements.
    pub fn count(&self) -> usize {
        self.applied.len()
    }
}

/// Result of replacing the whole vocabulary from a word source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
    pub generation: u64,
}

/// One page of words, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordPage {
    pub items: Vec<Word>,
    /// Total number of words across all pages.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

/// Mutable front over the currently installed compiled matcher.
pub struct VocabularyStore {
    current: ArcSwap<CompiledMatcher>,
    writer: Mutex<()>,
    ready: AtomicBool,
    config: VocabularyConfig,
}

impl VocabularyStore {
    /// `max_word_chars` is clamped to the compiler's pattern limit, so any
    /// literal that passes validation also compiles.
    pub fn new(mut config: VocabularyConfig) -> Self {
        config.max_word_chars = config.max_word_chars.clamp(1, MAX_PATTERN_CHARS);
        Self {
            current: ArcSwap::from_pointee(CompiledMatcher::empty()),
            writer: Mutex::new(()),
            ready: AtomicBool::new(false),
            config,
        }
    }

    pub fn config(&self) -> &VocabularyConfig {
        &self.config
    }

    pub fn state(&self) -> StoreState {
        if self.ready.load(Ordering::Acquire) {
            StoreState::Ready
        } else {
            StoreState::Uninitialized
        }
    }

    /// Pin the currently installed matcher.
    ///
    /// The returned snapshot stays valid and unchanged for as long as it is
    /// held, regardless of later mutations.
    pub fn snapshot(&self) -> Arc<CompiledMatcher> {
        self.current.load_full()
    }

    pub fn generation(&self) -> u64 {
        self.current.load().generation()
    }

    pub fn len(&self) -> usize {
        self.current.load().vocabulary().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All words, ordered by literal.
    pub fn words(&self) -> Vec<Word> {
        self.current.load().vocabulary().iter().cloned().collect()
    }

    /// Page `page` (1-based) of `limit` words, newest `created_at` first.
    ///
    /// Page 0 reads as page 1. Words created at the same instant are ordered
    /// by literal so paging is stable.
    pub fn words_page(&self, page: usize, limit: usize) -> WordPage {
        let page = page.max(1);
        let mut words = self.words();
        let total = words.len();
        words.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.literal.cmp(&b.literal))
        });
        let items = words
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();
        WordPage { items, total, page, limit }
    }

    pub fn get(&self, literal: &str) -> Option<Word> {
        self.current.load().vocabulary().get(literal.trim()).cloned()
    }

    // Reads

    pub fn scan(&self, text: &str) -> Vec<Match> {
        self.current.load().scan(text).collect()
    }

    pub fn contains_sensitive_words(&self, text: &str) -> bool {
        self.current.load().contains_match(text)
    }

    pub fn find_sensitive_words(&self, text: &str) -> Vec<String> {
        self.current.load().find_words(text)
    }

    pub fn filter(&self, text: &str, replacement: &str) -> String {
        self.current.load().redact(text, replacement)
    }

    // Writes

    /// Replace the whole vocabulary with `records`.
    ///
    /// Invalid and duplicate records are skipped. Used at startup and for
    /// reconciliation against the authoritative store.
    pub fn load<I>(&self, records: I) -> Result<LoadReport, VocabularyError>
    where
        I: IntoIterator<Item = WordRecord>,
    {
        let mut vocabulary = Vocabulary::new();
        let mut skipped = 0;
        for record in records {
            match normalize_literal(&record.literal, self.config.max_word_chars) {
                Ok(literal) => {
                    if !vocabulary.insert(Word::from_record(WordRecord { literal, ..record })) {
                        skipped += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(word = %record.literal, error = %e, "skipping word on load");
                    skipped += 1;
                }
            }
        }
        let loaded = vocabulary.len();

        let _writer = self.writer.lock();
        let generation = self.current.load().generation() + 1;
        self.install(vocabulary, generation)?;
        Ok(LoadReport { loaded, skipped, generation })
    }

    /// Add one word. A literal that is already present is a `Conflict`.
    pub fn add_word(&self, record: impl Into<WordRecord>) -> Result<Word, VocabularyError> {
        let record = record.into();
        let literal = self.validate(&record.literal)?;
        self.mutate(|vocabulary| {
            let word = insert_new(vocabulary, WordRecord { literal, ..record })?;
            Ok((word, true))
        })
    }

    pub fn remove_word(&self, literal: &str) -> Result<Word, VocabularyError> {
        let literal = literal.trim();
        self.mutate(|vocabulary| {
            let word = vocabulary
                .remove(literal)
                .ok_or_else(|| VocabularyError::NotFound(literal.to_string()))?;
            Ok((word, true))
        })
    }

    pub fn remove_word_by_id(&self, id: WordId) -> Result<Word, VocabularyError> {
        self.mutate(|vocabulary| {
            let word = remove_by_id(vocabulary, id)?;
            Ok((word, true))
        })
    }

    /// Add many words with one compile and one swap.
    ///
    /// Errors only if the resulting vocabulary fails to compile, in which
    /// case nothing is applied.
    pub fn bulk_add<I, R>(&self, records: I) -> Result<BulkOutcome, VocabularyError>
    where
        I: IntoIterator<Item = R>,
        R: Into<WordRecord>,
    {
        let records: Vec<WordRecord> = records.into_iter().map(Into::into).collect();
        self.mutate(|vocabulary| {
            let mut outcome = BulkOutcome::default();
            for record in records {
                let raw = record.literal.clone();
                let result = self
                    .validate(&raw)
                    .and_then(|literal| insert_new(vocabulary, WordRecord { literal, ..record }));
                match result {
                    Ok(word) => outcome.applied.push(word),
                    Err(e) => outcome.skipped.push((raw, e)),
                }
            }
            let changed = outcome.count() > 0;
            Ok((outcome, changed))
        })
    }

    pub fn bulk_remove<I, S>(&self, literals: I) -> Result<BulkOutcome, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let literals: Vec<String> = literals.into_iter().map(|s| s.as_ref().to_string()).collect();
        self.mutate(|vocabulary| {
            let mut outcome = BulkOutcome::default();
            for raw in literals {
                match vocabulary.remove(raw.trim()) {
                    Some(word) => outcome.applied.push(word),
                    None => {
                        let e = VocabularyError::NotFound(raw.trim().to_string());
                        outcome.skipped.push((raw, e));
                    }
                }
            }
            let changed = outcome.count() > 0;
            Ok((outcome, changed))
        })
    }

    pub fn bulk_remove_ids(&self, ids: &[WordId]) -> Result<BulkOutcome, VocabularyError> {
        self.mutate(|vocabulary| {
            let mut outcome = BulkOutcome::default();
            for &id in ids {
                match remove_by_id(vocabulary, id) {
                    Ok(word) => outcome.applied.push(word),
                    Err(e) => outcome.skipped.push((id.to_string(), e)),
                }
            }
            let changed = outcome.count() > 0;
            Ok((outcome, changed))
        })
    }

    /// Remove every word. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, VocabularyError> {
        self.mutate(|vocabulary| {
            let removed = vocabulary.len();
            vocabulary.clear();
            Ok((removed, true))
        })
    }

    fn validate(&self, raw: &str) -> Result<String, VocabularyError> {
        normalize_literal(raw, self.config.max_word_chars).inspect_err(|e| {
            telemetry::record_mutation_rejected(e.kind());
        })
    }

    /// Run `apply` against a private copy of the current vocabulary and,
    /// if it reports a change, compile and publish the copy.
    fn mutate<T, F>(&self, apply: F) -> Result<T, VocabularyError>
    where
        F: FnOnce(&mut Vocabulary) -> Result<(T, bool), VocabularyError>,
    {
        let _writer = self.writer.lock();
        let current = self.current.load_full();
        let mut next = current.vocabulary().clone();

        let (value, changed) = apply(&mut next).inspect_err(|e| {
            telemetry::record_mutation_rejected(e.kind());
        })?;
        if changed {
            self.install(next, current.generation() + 1)?;
        }
        Ok(value)
    }

    /// Compile and publish. Caller must hold the writer lock.
    fn install(&self, vocabulary: Vocabulary, generation: u64) -> Result<(), VocabularyError> {
        let compiled = match compile(vocabulary) {
            Ok(compiled) => compiled.with_generation(generation),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    installed_generation = generation - 1,
                    "vocabulary compile failed; keeping installed matcher"
                );
                return Err(e.into());
            }
        };

        telemetry::record_vocabulary_swap(&compiled);
        tracing::info!(
            generation,
            words = compiled.vocabulary().len(),
            nodes = compiled.node_count(),
            "vocabulary matcher installed"
        );
        self.current.store(Arc::new(compiled));
        self.ready.store(true, Ordering::Release);
        Ok(())
    }
}

impl Default for VocabularyStore {
    fn default() -> Self {
        Self::new(VocabularyConfig::default())
    }
}

fn insert_new(vocabulary: &mut Vocabulary, record: WordRecord) -> Result<Word, VocabularyError> {
    if vocabulary.contains(&record.literal) {
        return Err(VocabularyError::Conflict(record.literal));
    }
    let word = Word::from_record(record);
    vocabulary.insert(word.clone());
    Ok(word)
}

fn remove_by_id(vocabulary: &mut Vocabulary, id: WordId) -> Result<Word, VocabularyError> {
    let literal = vocabulary
        .find_by_id(id)
        .map(|w| w.literal.clone())
        .ok_or_else(|| VocabularyError::NotFound(id.to_string()))?;
    vocabulary
        .remove(&literal)
        .ok_or(VocabularyError::NotFound(literal))
}
