//! Sensitive word service.
//!
//! The object an HTTP/controller layer is handed at startup. Wraps the
//! vocabulary store with hit reporting, moderation audit logging and the
//! glue to external persistence.
//!
//! The in-memory vocabulary and the durable store are kept consistent by
//! convention: mutations apply in memory first, then persist. A failed
//! durable write is NOT rolled back; it is logged as
//! [`ModerationEvent::PersistenceDiverged`] and corrected by the next
//! [`SensitiveWordService::reconcile`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::DEFAULT_REPLACEMENT;
use crate::hits::{HitCounter, HitSink};
use crate::telemetry::{self, log_moderation_event, ModerationEvent, MutationOutcome, MutationSpan};
use crate::vocabulary::{
    BulkOutcome, LoadReport, SourceError, StoreState, VocabularyConfig, VocabularyError,
    VocabularyStore, Word, WordId, WordPage, WordRecord, WordRepository, WordSource,
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),

    #[error("Word storage failed: {0}")]
    Source(#[from] SourceError),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Replacement used when a filter call does not supply one.
    pub default_replacement: String,
    pub vocabulary: VocabularyConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_replacement: DEFAULT_REPLACEMENT.to_string(),
            vocabulary: VocabularyConfig::default(),
        }
    }
}

/// Result of [`SensitiveWordService::check_text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub contains_sensitive_words: bool,
    /// Every occurrence in scan order, duplicates kept.
    pub sensitive_words: Vec<String>,
}

/// Result of [`SensitiveWordService::filter_text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterResult {
    pub filtered: String,
    /// Every occurrence in the unfiltered input, scan order, duplicates kept.
    pub sensitive_words: Vec<String>,
}

/// Sensitive word detection and redaction with a live vocabulary.
pub struct SensitiveWordService {
    store: Arc<VocabularyStore>,
    hits: Arc<HitCounter>,
    default_replacement: String,
}

impl SensitiveWordService {
    /// An empty `default_replacement` falls back to [`DEFAULT_REPLACEMENT`].
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_parts(
            Arc::new(VocabularyStore::new(config.vocabulary)),
            Arc::new(HitCounter::new()),
            config.default_replacement,
        )
    }

    /// Build around an existing store and hit counter.
    pub fn with_parts(
        store: Arc<VocabularyStore>,
        hits: Arc<HitCounter>,
        default_replacement: impl Into<String>,
    ) -> Self {
        let mut default_replacement = default_replacement.into();
        if default_replacement.is_empty() {
            default_replacement = DEFAULT_REPLACEMENT.to_string();
        }
        Self {
            store,
            hits,
            default_replacement,
        }
    }

    pub fn store(&self) -> &Arc<VocabularyStore> {
        &self.store
    }

    pub fn hits(&self) -> &Arc<HitCounter> {
        &self.hits
    }

    pub fn default_replacement(&self) -> &str {
        &self.default_replacement
    }

    pub fn state(&self) -> StoreState {
        self.store.state()
    }

    // Startup and reconciliation

    /// Seed the vocabulary from `source`. Moves the store to `Ready`.
    pub async fn initialize(&self, source: &dyn WordSource) -> Result<LoadReport, ServiceError> {
        let report = self.reload(source).await?;
        tracing::info!(
            loaded = report.loaded,
            skipped = report.skipped,
            "sensitive word filter initialized"
        );
        Ok(report)
    }

    /// Re-read the authoritative word list and swap it in.
    ///
    /// On a source error the installed matcher is left untouched.
    pub async fn reconcile(&self, source: &dyn WordSource) -> Result<LoadReport, ServiceError> {
        let before = self.store.len();
        let report = self.reload(source).await?;
        if report.loaded != before {
            tracing::info!(before, after = report.loaded, "vocabulary reconciled with storage");
        }
        Ok(report)
    }

    async fn reload(&self, source: &dyn WordSource) -> Result<LoadReport, ServiceError> {
        let records = source.load_active_words().await?;
        let report = self.store.load(records)?;
        log_moderation_event(
            ModerationEvent::VocabularyReloaded,
            "vocabulary reloaded from storage",
            &[
                ("loaded", report.loaded.to_string().as_str()),
                ("skipped", report.skipped.to_string().as_str()),
                ("generation", report.generation.to_string().as_str()),
            ],
        );
        Ok(report)
    }

    // Reads

    pub fn contains_sensitive_words(&self, text: &str) -> bool {
        self.store.contains_sensitive_words(text)
    }

    pub fn find_sensitive_words(&self, text: &str) -> Vec<String> {
        self.store.find_sensitive_words(text)
    }

    /// Redact with `replacement`, or the configured default when it is
    /// `None` or empty.
    pub fn filter(&self, text: &str, replacement: Option<&str>) -> String {
        self.store.filter(text, self.replacement_or_default(replacement))
    }

    fn replacement_or_default<'a>(&'a self, replacement: Option<&'a str>) -> &'a str {
        replacement
            .filter(|r| !r.is_empty())
            .unwrap_or(&self.default_replacement)
    }

    /// Scan `text` and report every found word to the hit counter.
    pub fn check_text(&self, text: &str) -> CheckResult {
        let snapshot = self.store.snapshot();
        let sensitive_words = snapshot.find_words(text);
        telemetry::record_scan(sensitive_words.len());

        if !sensitive_words.is_empty() {
            self.hits.record(&sensitive_words);
            log_moderation_event(
                ModerationEvent::ContentFlagged,
                "text contains sensitive words",
                &[("matches", sensitive_words.len().to_string().as_str())],
            );
        }
        CheckResult {
            contains_sensitive_words: !sensitive_words.is_empty(),
            sensitive_words,
        }
    }

    /// Redact `text` and report every found word to the hit counter.
    ///
    /// Detection and redaction run against the same snapshot.
    pub fn filter_text(&self, text: &str, replacement: Option<&str>) -> FilterResult {
        let snapshot = self.store.snapshot();
        let replacement = self.replacement_or_default(replacement);
        let filtered = snapshot.redact(text, replacement);
        let sensitive_words = snapshot.find_words(text);
        telemetry::record_filter(sensitive_words.len(), text.chars().count());

        if !sensitive_words.is_empty() {
            self.hits.record(&sensitive_words);
            log_moderation_event(
                ModerationEvent::ContentFiltered,
                "text redacted",
                &[("matches", sensitive_words.len().to_string().as_str())],
            );
        }
        FilterResult { filtered, sensitive_words }
    }

    // Admin mutations (in memory only)

    pub fn add_word(&self, record: impl Into<WordRecord>) -> Result<Word, VocabularyError> {
        let record = record.into();
        let span = MutationSpan::new("add_word", &record.literal);
        let _enter = span.enter();

        let result = self.store.add_word(record.clone());
        span.record_outcome(&result, self.store.generation());
        match &result {
            Ok(word) => {
                log_moderation_event(
                    ModerationEvent::WordAdded,
                    "sensitive word added",
                    &[
                        ("word", word.literal.as_str()),
                        ("category", word.category.as_deref().unwrap_or("-")),
                        ("created_by", word.created_by.as_deref().unwrap_or("-")),
                    ],
                );
            }
            Err(e) => log_rejection(&record.literal, e),
        }
        result
    }

    pub fn remove_word(&self, literal: &str) -> Result<Word, VocabularyError> {
        let span = MutationSpan::new("remove_word", literal);
        let _enter = span.enter();

        let result = self.store.remove_word(literal);
        span.record_outcome(&result, self.store.generation());
        if let Ok(word) = &result {
            log_removed(word);
        }
        result
    }

    pub fn remove_word_by_id(&self, id: WordId) -> Result<Word, VocabularyError> {
        let span = MutationSpan::new("remove_word_by_id", id.to_string().as_str());
        let _enter = span.enter();

        let result = self.store.remove_word_by_id(id);
        span.record_outcome(&result, self.store.generation());
        if let Ok(word) = &result {
            log_removed(word);
        }
        result
    }

    pub fn bulk_add<I, R>(&self, records: I) -> Result<BulkOutcome, VocabularyError>
    where
        I: IntoIterator<Item = R>,
        R: Into<WordRecord>,
    {
        let records: Vec<WordRecord> = records.into_iter().map(Into::into).collect();
        let span = MutationSpan::bulk("bulk_add", records.len());
        let _enter = span.enter();

        let result = self.store.bulk_add(records);
        span.record_bulk_outcome(&result, self.store.generation());
        if let Ok(outcome) = &result {
            log_bulk(ModerationEvent::WordAdded, "sensitive words added in bulk", outcome);
        }
        result
    }

    pub fn bulk_remove<I, S>(&self, literals: I) -> Result<BulkOutcome, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let literals: Vec<String> = literals.into_iter().map(|s| s.as_ref().to_string()).collect();
        let span = MutationSpan::bulk("bulk_remove", literals.len());
        let _enter = span.enter();

        let result = self.store.bulk_remove(literals);
        span.record_bulk_outcome(&result, self.store.generation());
        if let Ok(outcome) = &result {
            log_bulk(ModerationEvent::WordRemoved, "sensitive words removed in bulk", outcome);
        }
        result
    }

    pub fn bulk_remove_ids(&self, ids: &[WordId]) -> Result<BulkOutcome, VocabularyError> {
        let span = MutationSpan::bulk("bulk_remove_ids", ids.len());
        let _enter = span.enter();

        let result = self.store.bulk_remove_ids(ids);
        span.record_bulk_outcome(&result, self.store.generation());
        if let Ok(outcome) = &result {
            log_bulk(ModerationEvent::WordRemoved, "sensitive words removed in bulk", outcome);
        }
        result
    }

    pub fn words(&self) -> Vec<Word> {
        self.store.words()
    }

    pub fn words_page(&self, page: usize, limit: usize) -> WordPage {
        self.store.words_page(page, limit)
    }

    // Admin mutations followed by a durable write

    /// Add in memory, then insert through `repository`.
    ///
    /// If the insert fails the in-memory word stays; the error is returned
    /// and the divergence logged.
    pub async fn add_word_persisted(
        &self,
        record: impl Into<WordRecord>,
        repository: &dyn WordRepository,
    ) -> Result<Word, ServiceError> {
        let word = self.add_word(record)?;
        if let Err(e) = repository.insert_word(&word).await {
            log_divergence("insert", &word, &e);
            return Err(e.into());
        }
        Ok(word)
    }

    /// Remove in memory, then delete through `repository`.
    pub async fn remove_word_persisted(
        &self,
        literal: &str,
        repository: &dyn WordRepository,
    ) -> Result<Word, ServiceError> {
        let word = self.remove_word(literal)?;
        if let Err(e) = repository.delete_word(&word).await {
            log_divergence("delete", &word, &e);
            return Err(e.into());
        }
        Ok(word)
    }

    /// Flush pending hit counts. Failures are logged and the counts kept.
    pub async fn flush_hits(&self, sink: &dyn HitSink) -> usize {
        match self.hits.flush(sink).await {
            Ok(flushed) => flushed,
            Err(e) => {
                log_moderation_event(
                    ModerationEvent::HitFlushFailed,
                    "hit counts not delivered; will retry",
                    &[("error", e.to_string().as_str())],
                );
                0
            }
        }
    }
}

impl Default for SensitiveWordService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

fn log_rejection(literal: &str, error: &VocabularyError) {
    let event = match error {
        VocabularyError::Conflict(_) => ModerationEvent::DuplicateRejected,
        _ => ModerationEvent::WordRejected,
    };
    log_moderation_event(
        event,
        "sensitive word rejected",
        &[("word", literal), ("reason", error.to_string().as_str())],
    );
}

fn log_removed(word: &Word) {
    log_moderation_event(
        ModerationEvent::WordRemoved,
        "sensitive word removed",
        &[("word", word.literal.as_str()), ("id", word.id.to_string().as_str())],
    );
}

fn log_bulk(event: ModerationEvent, message: &str, outcome: &BulkOutcome) {
    log_moderation_event(
        event,
        message,
        &[
            ("applied", outcome.count().to_string().as_str()),
            ("skipped", outcome.skipped.len().to_string().as_str()),
        ],
    );
}

fn log_divergence(operation: &str, word: &Word, error: &SourceError) {
    log_moderation_event(
        ModerationEvent::PersistenceDiverged,
        "in-memory vocabulary changed but storage write failed",
        &[
            ("operation", operation),
            ("word", word.literal.as_str()),
            ("error", error.to_string().as_str()),
        ],
    );
}

/// Periodically reload the vocabulary from `source` until `shutdown` fires.
pub fn spawn_reconciler(
    service: Arc<SensitiveWordService>,
    source: Arc<dyn WordSource>,
    period: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let span = tracing::info_span!("reconciler", period_secs = period.as_secs());
    tokio::spawn(
        async move {
            let mut ticker = tokio::time::interval(period);
            // First tick completes immediately; startup already loaded.
            ticker.tick().await;
            loop {
                tokio::select! {
                    biased;
                    () = shutdown.cancelled() => {
                        tracing::info!("reconciler: shutdown signal received");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = service.reconcile(source.as_ref()).await {
                            tracing::warn!(error = %e, "reconciliation failed; keeping installed vocabulary");
                        }
                    }
                }
            }
        }
        .instrument(span),
    )
}

/// Periodically flush hit counts to `sink` until `shutdown` fires, then
/// flush once more.
pub fn spawn_hit_flusher(
    service: Arc<SensitiveWordService>,
    sink: Arc<dyn HitSink>,
    period: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let span = tracing::info_span!("hit_flusher", period_secs = period.as_secs());
    tokio::spawn(
        async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                tokio::select! {
                    biased;
                    () = shutdown.cancelled() => {
                        service.flush_hits(sink.as_ref()).await;
                        tracing::info!("hit flusher: shutdown signal received");
                        break;
                    }
                    _ = ticker.tick() => {
                        service.flush_hits(sink.as_ref()).await;
                    }
                }
            }
        }
        .instrument(span),
    )
}
