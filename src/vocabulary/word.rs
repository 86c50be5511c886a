//! Sensitive word records and validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::VocabularyError;

/// Default maximum word length in code points.
pub const DEFAULT_MAX_WORD_CHARS: usize = 100;

/// Stable identifier of a sensitive word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(Uuid);

impl WordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for WordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A word as submitted by an administrator or loaded from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub literal: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Stored and returned, never consulted by the matcher.
    #[serde(default)]
    pub is_regex: bool,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl WordRecord {
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_created_by(mut self, user: impl Into<String>) -> Self {
        self.created_by = Some(user.into());
        self
    }

    pub fn with_regex_flag(mut self, is_regex: bool) -> Self {
        self.is_regex = is_regex;
        self
    }
}

impl From<&str> for WordRecord {
    fn from(literal: &str) -> Self {
        Self::new(literal)
    }
}

impl From<String> for WordRecord {
    fn from(literal: String) -> Self {
        Self::new(literal)
    }
}

/// A sensitive word held in a vocabulary. Identity is the literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub literal: String,
    pub category: Option<String>,
    pub is_regex: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Word {
    /// Build a word from a record as-is, assigning a fresh id.
    pub fn from_record(record: WordRecord) -> Self {
        Self {
            id: WordId::new(),
            literal: record.literal,
            category: record.category,
            is_regex: record.is_regex,
            created_by: record.created_by,
            created_at: Utc::now(),
        }
    }
}

/// Trim `raw` and check it is usable as a word literal.
///
/// Rejects empty and whitespace-only input and literals longer than
/// `max_chars` code points.
pub fn normalize_literal(raw: &str, max_chars: usize) -> Result<String, VocabularyError> {
    let literal = raw.trim();
    if literal.is_empty() {
        return Err(VocabularyError::Validation(
            "word must not be empty or whitespace".to_string(),
        ));
    }
    let length = literal.chars().count();
    if length > max_chars {
        return Err(VocabularyError::Validation(format!(
            "word is {} characters, limit is {}",
            length, max_chars
        )));
    }
    Ok(literal.to_string())
}
