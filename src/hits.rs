//! Per-word hit aggregation for analytics.
//!
//! Uses DashMap so concurrent moderation calls record hits without a global
//! lock. Counts are handed to a [`HitSink`] in batches; where and how they
//! are stored is the sink's business.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::telemetry;
use crate::vocabulary::SourceError;

/// Receives batched per-word hit increments.
#[async_trait]
pub trait HitSink: Send + Sync {
    async fn increment_hits(&self, batch: &[(String, u64)]) -> Result<(), SourceError>;
}

/// Concurrent in-memory hit counter.
pub struct HitCounter {
    pending: DashMap<String, u64>,
    recorded: AtomicU64,
}

impl HitCounter {
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
            recorded: AtomicU64::new(0),
        }
    }

    /// Count one hit per entry of `words`; duplicates count separately.
    pub fn record<S: AsRef<str>>(&self, words: &[S]) {
        for word in words {
            *self.pending.entry(word.as_ref().to_string()).or_insert(0) += 1;
        }
        self.recorded.fetch_add(words.len() as u64, Ordering::Relaxed);
    }

    /// Hits for `word` not yet flushed.
    pub fn pending(&self, word: &str) -> u64 {
        self.pending.get(word).map(|c| *c).unwrap_or(0)
    }

    /// Number of distinct words with unflushed hits.
    pub fn pending_words(&self) -> usize {
        self.pending.len()
    }

    /// Total hits recorded since construction.
    pub fn total_recorded(&self) -> u64 {
        self.recorded.load(Ordering::Relaxed)
    }

    /// Remove and return all pending counts, sorted by word.
    pub fn take(&self) -> Vec<(String, u64)> {
        let keys: Vec<String> = self.pending.iter().map(|e| e.key().clone()).collect();
        let mut batch: Vec<(String, u64)> =
            keys.into_iter().filter_map(|k| self.pending.remove(&k)).collect();
        batch.sort();
        batch
    }

    /// Hand all pending counts to `sink` as one batch.
    ///
    /// On failure the batch is merged back so no hits are lost. Returns the
    /// number of distinct words flushed.
    pub async fn flush(&self, sink: &dyn HitSink) -> Result<usize, SourceError> {
        let batch = self.take();
        if batch.is_empty() {
            return Ok(0);
        }
        match sink.increment_hits(&batch).await {
            Ok(()) => {
                telemetry::record_hit_flush(batch.len(), true);
                Ok(batch.len())
            }
            Err(e) => {
                telemetry::record_hit_flush(batch.len(), false);
                for (word, count) in batch {
                    *self.pending.entry(word).or_insert(0) += count;
                }
                Err(e)
            }
        }
    }
}

impl Default for HitCounter {
    fn default() -> Self {
        Self::new()
    }
}
