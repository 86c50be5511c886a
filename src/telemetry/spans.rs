//! Spans around vocabulary mutations.
//!
//! Every administrative change runs inside one `vocabulary_mutation` span.
//! The span starts with the operation and its target and ends up carrying
//! the outcome: `ok` plus the installed generation, or the error kind and
//! message.

use tracing::{field, info_span, Span};

use crate::vocabulary::{BulkOutcome, VocabularyError};

/// Constructors for mutation spans.
pub struct MutationSpan;

impl MutationSpan {
    /// Span for a single-word change. `target` is the literal or word id.
    pub fn new(operation: &'static str, target: &str) -> Span {
        info_span!(
            "vocabulary_mutation",
            operation,
            target = %target,
            outcome = field::Empty,
            error.message = field::Empty,
            generation = field::Empty,
        )
    }

    /// Span for a batch of `requested` changes.
    pub fn bulk(operation: &'static str, requested: usize) -> Span {
        info_span!(
            "vocabulary_mutation",
            operation,
            requested,
            applied = field::Empty,
            skipped = field::Empty,
            outcome = field::Empty,
            error.message = field::Empty,
            generation = field::Empty,
        )
    }
}

/// Records how a vocabulary mutation ended on its span.
pub trait MutationOutcome {
    /// `generation` is what the store reports after the call; it is only
    /// recorded on success.
    fn record_outcome<T>(&self, result: &Result<T, VocabularyError>, generation: u64);

    /// Like [`record_outcome`](Self::record_outcome), plus applied and
    /// skipped counts for a batch.
    fn record_bulk_outcome(&self, result: &Result<BulkOutcome, VocabularyError>, generation: u64);
}

impl MutationOutcome for Span {
    fn record_outcome<T>(&self, result: &Result<T, VocabularyError>, generation: u64) {
        match result {
            Ok(_) => {
                self.record("outcome", "ok");
                self.record("generation", generation);
            }
            Err(e) => {
                self.record("outcome", e.kind());
                self.record("error.message", field::display(e));
            }
        }
    }

    fn record_bulk_outcome(&self, result: &Result<BulkOutcome, VocabularyError>, generation: u64) {
        self.record_outcome(result, generation);
        if let Ok(outcome) = result {
            self.record("applied", outcome.count());
            self.record("skipped", outcome.skipped.len());
        }
    }
}
