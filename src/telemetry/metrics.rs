//! Metrics facade hooks.
//!
//! Emits through the `metrics` crate; installing a recorder/exporter is left
//! to the embedding process. Without one, these calls are no-ops.

use metrics::{counter, gauge, histogram};

use crate::engine::CompiledMatcher;

/// One scan-type call (check, find) and how many matches it produced.
pub fn record_scan(matches: usize) {
    counter!("wordshield_scans_total").increment(1);
    counter!("wordshield_matches_total").increment(matches as u64);
    if matches > 0 {
        counter!("wordshield_flagged_texts_total").increment(1);
    }
}

/// One redaction call.
pub fn record_filter(matches: usize, input_chars: usize) {
    counter!("wordshield_filters_total").increment(1);
    counter!("wordshield_matches_total").increment(matches as u64);
    histogram!("wordshield_filter_input_chars").record(input_chars as f64);
}

/// A newly compiled matcher was published.
pub fn record_vocabulary_swap(matcher: &CompiledMatcher) {
    counter!("wordshield_vocabulary_swaps_total").increment(1);
    gauge!("wordshield_vocabulary_generation").set(matcher.generation() as f64);
    gauge!("wordshield_vocabulary_words").set(matcher.vocabulary().len() as f64);
    gauge!("wordshield_trie_nodes").set(matcher.node_count() as f64);
}

/// A vocabulary mutation was refused.
pub fn record_mutation_rejected(kind: &'static str) {
    counter!("wordshield_mutations_rejected_total", "kind" => kind).increment(1);
}

/// A hit batch was handed to the sink.
pub fn record_hit_flush(words: usize, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    counter!("wordshield_hit_flushes_total", "status" => status).increment(1);
    if ok {
        counter!("wordshield_hit_words_flushed_total").increment(words as u64);
    }
}
