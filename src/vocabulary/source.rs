//! Interfaces to external word persistence.
//!
//! The store never performs I/O itself. Startup and reconciliation pull the
//! active word list through a [`WordSource`]; callers persist admin changes
//! through a [`WordRepository`] after the in-memory swap has succeeded.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use super::{Vocabulary, Word, WordRecord};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Supplies the active (enabled, non-expired) words.
#[async_trait]
pub trait WordSource: Send + Sync {
    async fn load_active_words(&self) -> Result<Vec<WordRecord>, SourceError>;
}

/// Durable word storage. Authoritative over the in-memory vocabulary.
#[async_trait]
pub trait WordRepository: WordSource {
    async fn insert_word(&self, word: &Word) -> Result<(), SourceError>;

    async fn delete_word(&self, word: &Word) -> Result<(), SourceError>;
}

/// Newline-delimited word file, read-only.
///
/// Lines are trimmed and blank lines skipped. A missing file yields an empty
/// list.
#[derive(Debug, Clone)]
pub struct FlatFileSource {
    path: PathBuf,
}

impl FlatFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl WordSource for FlatFileSource {
    async fn load_active_words(&self) -> Result<Vec<WordRecord>, SourceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "word file not found; no words loaded");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(parse_word_lines(&content))
    }
}

fn parse_word_lines(content: &str) -> Vec<WordRecord> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(WordRecord::from)
        .collect()
}

/// Write a snapshot of `vocabulary` as a newline-delimited file, sorted by
/// literal. Returns the number of words written.
pub fn export_flat_file(path: &Path, vocabulary: &Vocabulary) -> Result<usize, SourceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut content = vocabulary.literals().collect::<Vec<_>>().join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    std::fs::write(path, content)?;
    Ok(vocabulary.len())
}
