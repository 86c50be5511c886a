//! Compile error types for the matching engine.
//!
//! Compilation is fail-closed: a vocabulary that cannot be compiled never
//! replaces the matcher that is currently installed.

use thiserror::Error;

/// Errors that can occur while compiling a vocabulary into a matcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Empty pattern cannot be compiled")]
    EmptyPattern,

    #[error("Pattern exceeds {limit} characters: {length}")]
    PatternTooLong { length: usize, limit: usize },
}

impl CompileError {
    /// Returns true if the error was caused by malformed vocabulary input
    /// rather than a resource limit.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::EmptyPattern)
    }
}
