//! Sensitive word matching engine.
//!
//! Compiles a vocabulary into an immutable trie, scans text for
//! leftmost-shortest occurrences and redacts them.

pub mod error;
pub mod redact;
pub mod scan;
pub mod trie;

pub use error::CompileError;
pub use redact::redact;
pub use scan::{Match, Matches};
pub use trie::{compile, CompiledMatcher, MatchNode, MAX_PATTERN_CHARS};
