//! Telemetry module for Wordshield.
//!
//! Structured logging, moderation audit lines, mutation spans and metrics.

mod logging;
mod metrics;
pub mod moderation_log;
mod spans;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use self::metrics::{
    record_filter, record_hit_flush, record_mutation_rejected, record_scan,
    record_vocabulary_swap,
};
pub use moderation_log::{log_moderation_event, ModerationEvent, ModerationSeverity};
pub use spans::{MutationOutcome, MutationSpan};

#[cfg(test)]
pub(crate) use spans::tests::capture as capture_span_fields;
