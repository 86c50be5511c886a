//! Vocabulary mutation errors.

use thiserror::Error;

use crate::engine::CompileError;

/// Errors returned by vocabulary mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyError {
    #[error("Sensitive word already exists: {0}")]
    Conflict(String),

    #[error("Sensitive word not found: {0}")]
    NotFound(String),

    #[error("Invalid sensitive word: {0}")]
    Validation(String),

    #[error("Vocabulary compile failed: {0}")]
    Compile(#[from] CompileError),
}

impl VocabularyError {
    /// Short machine-readable kind, used for metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Compile(_) => "compile",
        }
    }

    /// Returns true if the error is caused by the caller's input rather than
    /// by the engine.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Compile(_))
    }
}
