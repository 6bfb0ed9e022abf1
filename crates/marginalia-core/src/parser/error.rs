//! Parse diagnostics for documentation comments
//!
//! The parser never fails: every note here describes something it repaired
//! while building the tree. Callers that care surface them; callers that
//! don't still get a usable `FullComment`.

use thiserror::Error;

/// A recoverable problem found while parsing, with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNote {
    /// What was wrong and how it was repaired
    pub kind: ParseNoteKind,
    /// 1-based line within the comment body
    pub line: u32,
}

impl ParseNote {
    /// Create a new parse note
    #[must_use]
    pub fn new(kind: ParseNoteKind, line: u32) -> Self {
        Self { kind, line }
    }
}

impl std::fmt::Display for ParseNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at line {}", self.kind, self.line)
    }
}

impl std::error::Error for ParseNote {}

/// The kind of parse note
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseNoteKind {
    #[error("malformed `\\{command}` command: {detail}")]
    MalformedCommand { command: String, detail: String },

    #[error("`\\{opener}` block not terminated; closed at end of comment")]
    UnterminatedVerbatim { opener: String },

    #[error("unbalanced HTML tag `{tag}`")]
    UnbalancedTag { tag: String },

    #[error("comment length {len} exceeds limit {cap}")]
    OversizedComment { len: usize, cap: usize },
}
