//! Vocabulary compilation into an immutable character trie.
//!
//! A [`CompiledMatcher`] is built once from a [`Vocabulary`] and never mutated
//! afterwards. Vocabulary changes always compile a fresh matcher, which the
//! store then publishes in a single atomic swap.

use std::collections::HashMap;

use crate::engine::CompileError;
use crate::vocabulary::{Vocabulary, Word, WordRecord};

/// Hard ceiling on pattern length accepted by the compiler.
pub const MAX_PATTERN_CHARS: usize = 1024;

/// A node in the compiled trie.
///
/// `terminal` is true iff the path from the root to this node spells exactly
/// one word of the vocabulary the matcher was compiled from.
#[derive(Debug, Default)]
pub struct MatchNode {
    terminal: bool,
    children: HashMap<char, MatchNode>,
}

impl MatchNode {
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Follow the edge labelled `c`, if any.
    #[inline]
    pub fn child(&self, c: char) -> Option<&MatchNode> {
        self.children.get(&c)
    }

    pub fn children(&self) -> impl Iterator<Item = (char, &MatchNode)> {
        self.children.iter().map(|(c, node)| (*c, node))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn insert(&mut self, literal: &str) -> usize {
        let mut created = 0;
        let mut node = self;
        for c in literal.chars() {
            node = node.children.entry(c).or_insert_with(|| {
                created += 1;
                MatchNode::default()
            });
        }
        node.terminal = true;
        created
    }
}

/// Immutable matcher compiled from one vocabulary snapshot.
#[derive(Debug)]
pub struct CompiledMatcher {
    root: MatchNode,
    vocabulary: Vocabulary,
    generation: u64,
    node_count: usize,
    longest_word: usize,
}

impl CompiledMatcher {
    /// Matcher over the empty vocabulary. Matches nothing.
    pub fn empty() -> Self {
        Self {
            root: MatchNode::default(),
            vocabulary: Vocabulary::new(),
            generation: 0,
            node_count: 1,
            longest_word: 0,
        }
    }

    /// Compile a matcher straight from literals, with default word metadata.
    ///
    /// Duplicate literals collapse into one word.
    pub fn from_words<I, S>(words: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vocabulary = words
            .into_iter()
            .map(|w| Word::from_record(WordRecord::new(w.as_ref())))
            .collect::<Vocabulary>();
        compile(vocabulary)
    }

    pub fn root(&self) -> &MatchNode {
        &self.root
    }

    /// The vocabulary snapshot this matcher was compiled from.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Monotonic snapshot number assigned by the owning store.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of trie nodes, root included.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Length in characters of the longest compiled word.
    pub fn longest_word(&self) -> usize {
        self.longest_word
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }
}

impl Default for CompiledMatcher {
    fn default() -> Self {
        Self::empty()
    }
}

/// Build a fresh trie from every word in `vocabulary`.
///
/// Pure and deterministic; cost is linear in the total number of characters.
pub fn compile(vocabulary: Vocabulary) -> Result<CompiledMatcher, CompileError> {
    let mut root = MatchNode::default();
    let mut node_count = 1;
    let mut longest_word = 0;

    for literal in vocabulary.literals() {
        if literal.is_empty() {
            return Err(CompileError::EmptyPattern);
        }
        let length = literal.chars().count();
        if length > MAX_PATTERN_CHARS {
            return Err(CompileError::PatternTooLong { length, limit: MAX_PATTERN_CHARS });
        }
        node_count += root.insert(literal);
        longest_word = longest_word.max(length);
    }

    tracing::debug!(
        words = vocabulary.len(),
        nodes = node_count,
        longest_word,
        "vocabulary compiled"
    );

    Ok(CompiledMatcher {
        root,
        vocabulary,
        generation: 0,
        node_count,
        longest_word,
    })
}
