//! Moderation audit logging.
//!
//! Every admin vocabulary change and every piece of flagged content produces
//! one structured line, so moderation decisions can be reconstructed later.

use std::time::{SystemTime, UNIX_EPOCH};

/// Moderation event types for audit logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationEvent {
    /// Word added to the vocabulary.
    WordAdded,
    /// Word removed from the vocabulary.
    WordRemoved,
    /// Add rejected because the literal already exists.
    DuplicateRejected,
    /// Add rejected by validation.
    WordRejected,
    /// Whole vocabulary replaced from the word source.
    VocabularyReloaded,
    /// Checked text contained sensitive words.
    ContentFlagged,
    /// Text was redacted.
    ContentFiltered,
    /// In-memory change applied but durable write failed.
    PersistenceDiverged,
    /// Hit counts could not be delivered to storage.
    HitFlushFailed,
}

impl ModerationEvent {
    pub fn severity(&self) -> ModerationSeverity {
        match self {
            Self::WordAdded | Self::WordRemoved | Self::VocabularyReloaded => {
                ModerationSeverity::Info
            }
            Self::DuplicateRejected | Self::WordRejected => ModerationSeverity::Warning,
            Self::ContentFlagged | Self::ContentFiltered => ModerationSeverity::Debug,
            Self::HitFlushFailed => ModerationSeverity::Warning,
            Self::PersistenceDiverged => ModerationSeverity::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WordAdded => "word_added",
            Self::WordRemoved => "word_removed",
            Self::DuplicateRejected => "duplicate_rejected",
            Self::WordRejected => "word_rejected",
            Self::VocabularyReloaded => "vocabulary_reloaded",
            Self::ContentFlagged => "content_flagged",
            Self::ContentFiltered => "content_filtered",
            Self::PersistenceDiverged => "persistence_diverged",
            Self::HitFlushFailed => "hit_flush_failed",
        }
    }
}

/// Severity levels for moderation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ModerationSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

impl ModerationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// Render one moderation log line.
pub fn format_moderation_line(
    timestamp: u64,
    event: ModerationEvent,
    message: &str,
    details: &[(&str, &str)],
) -> String {
    let details_str = details
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ");

    if details_str.is_empty() {
        format!(
            "[{}] MODERATION {} {}: {}",
            timestamp,
            event.severity().as_str(),
            event.as_str(),
            message
        )
    } else {
        format!(
            "[{}] MODERATION {} {}: {} | {}",
            timestamp,
            event.severity().as_str(),
            event.as_str(),
            message,
            details_str
        )
    }
}

/// Log a moderation event with structured details.
///
/// # Example
/// ```
/// use wordshield::telemetry::{log_moderation_event, ModerationEvent};
///
/// log_moderation_event(
///     ModerationEvent::WordAdded,
///     "sensitive word added",
///     &[("word", "spam"), ("generation", "4")],
/// );
/// ```
pub fn log_moderation_event(event: ModerationEvent, message: &str, details: &[(&str, &str)]) {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let line = format_moderation_line(timestamp, event, message, details);

    match event.severity() {
        ModerationSeverity::Debug => tracing::debug!(event = event.as_str(), "{}", line),
        ModerationSeverity::Info => tracing::info!(event = event.as_str(), "{}", line),
        ModerationSeverity::Warning => tracing::warn!(event = event.as_str(), "{}", line),
        ModerationSeverity::Error => tracing::error!(event = event.as_str(), "{}", line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_severity() {
        assert_eq!(ModerationEvent::WordAdded.severity(), ModerationSeverity::Info);
        assert_eq!(
            ModerationEvent::DuplicateRejected.severity(),
            ModerationSeverity::Warning
        );
        assert_eq!(
            ModerationEvent::PersistenceDiverged.severity(),
            ModerationSeverity::Error
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(ModerationSeverity::Error > ModerationSeverity::Warning);
        assert!(ModerationSeverity::Warning > ModerationSeverity::Info);
        assert!(ModerationSeverity::Info > ModerationSeverity::Debug);
    }

    #[test]
    fn test_format_line() {
        let line = format_moderation_line(
            42,
            ModerationEvent::WordRemoved,
            "sensitive word removed",
            &[("word", "spam")],
        );
        assert_eq!(
            line,
            "[42] MODERATION INFO word_removed: sensitive word removed | word=spam"
        );
        let bare = format_moderation_line(1, ModerationEvent::ContentFiltered, "filtered", &[]);
        assert_eq!(bare, "[1] MODERATION DEBUG content_filtered: filtered");
    }
}
