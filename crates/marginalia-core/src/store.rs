//! Attachment store for declaration comments
//!
//! Maps declaration ids to their [`RawComment`] records. Attachment runs the
//! cheap classifier immediately; tree building is deferred to
//! [`DocStore::build_trees`], which fans out over rayon when enough comments
//! are pending. Parses for distinct declarations share no mutable state, so
//! the fan-out needs no locking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::lexer::Span;
use crate::parser::{CommentParser, ParseNote, ParseNoteKind};
use crate::raw::{CommentKind, DelimiterStyle, RawComment};
use crate::tree::FullComment;

// ==================== Parallel threshold ====================

/// Default number of pending comments before tree building parallelizes.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Default size cap; longer spans classify as `Invalid` (1 MiB).
pub const DEFAULT_MAX_COMMENT_LEN: usize = 1 << 20;

/// Process-wide threshold seeding [`StoreConfig::default`].
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Get the current process-wide parallel threshold
#[must_use]
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the process-wide parallel threshold
///
/// Batches with more pending comments than this are parallelized. Set to 0
/// to always parallelize, or `usize::MAX` to disable parallelization.
/// Affects stores configured after the call, not existing ones.
pub fn set_parallel_threshold(threshold: usize) {
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

// ==================== Configuration ====================

/// Configuration for a [`DocStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Size cap in bytes; longer spans classify as `Invalid`.
    pub max_comment_len: usize,
    /// Minimum pending comments to trigger parallel tree building.
    pub parallel_threshold: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_comment_len: DEFAULT_MAX_COMMENT_LEN,
            parallel_threshold: parallel_threshold(),
        }
    }
}

impl StoreConfig {
    /// Create a new store configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the comment size cap
    #[must_use]
    pub fn with_max_comment_len(mut self, max_comment_len: usize) -> Self {
        self.max_comment_len = max_comment_len;
        self
    }

    /// Set the parallelization threshold
    #[must_use]
    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    /// Check if the given pending-comment count should trigger parallel execution
    #[must_use]
    pub fn should_parallelize(&self, pending: usize) -> bool {
        pending > self.parallel_threshold
    }
}

// ==================== Store ====================

/// Opaque key for a declaration, supplied by the discovery collaborator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DeclId(pub u64);

/// Comment records for a set of declarations.
#[derive(Debug, Default)]
pub struct DocStore {
    records: HashMap<DeclId, RawComment>,
    parser: CommentParser,
    config: StoreConfig,
}

impl DocStore {
    /// A store with the built-in command table and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the store configuration.
    #[must_use]
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a parser with a caller-extended command table.
    #[must_use]
    pub fn with_parser(mut self, parser: CommentParser) -> Self {
        self.parser = parser;
        self
    }

    /// Attaches a comment to a declaration, classifying it immediately.
    ///
    /// The first attachment for a declaration wins; later ones are ignored.
    /// A span above the size cap is stored as `Invalid` and reported, with
    /// no tree ever attempted for it.
    pub fn attach(
        &mut self,
        decl: DeclId,
        text: impl Into<String>,
        span: Span,
        style: DelimiterStyle,
        merged: bool,
    ) -> Option<ParseNote> {
        if self.records.contains_key(&decl) {
            return None;
        }
        let text = text.into();
        let cap = self.config.max_comment_len;
        if text.len() > cap {
            let note = ParseNote::new(
                ParseNoteKind::OversizedComment {
                    len: text.len(),
                    cap,
                },
                1,
            );
            self.records.insert(
                decl,
                RawComment {
                    kind: CommentKind::Invalid,
                    text,
                    span,
                    brief: String::new(),
                    full: None,
                },
            );
            return Some(note);
        }
        self.records
            .insert(decl, RawComment::new(text, span, style, merged));
        None
    }

    /// The record for a declaration, if one was attached. `full` may be
    /// `None` even when the record exists.
    #[must_use]
    pub fn get(&self, decl: DeclId) -> Option<&RawComment> {
        self.records.get(&decl)
    }

    /// Number of attached comments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds trees for every documentation comment that lacks one.
    ///
    /// Runs sequentially below the configured threshold and fans out with
    /// rayon above it; either way each declaration is parsed independently
    /// and its result attached back, with no cross-declaration ordering.
    /// Returns the parse notes paired with their declarations.
    pub fn build_trees(&mut self) -> Vec<(DeclId, ParseNote)> {
        let pending: Vec<DeclId> = self
            .records
            .iter()
            .filter(|(_, record)| record.is_documentation() && record.full.is_none())
            .map(|(decl, _)| *decl)
            .collect();

        let parser = &self.parser;
        let records = &self.records;
        let parse_one = |decl: &DeclId| {
            let record = records.get(decl)?;
            let (tree, notes) = parser.parse(record);
            Some((*decl, tree, notes))
        };
        let results: Vec<(DeclId, Option<FullComment>, Vec<ParseNote>)> =
            if self.config.should_parallelize(pending.len()) {
                pending.par_iter().filter_map(parse_one).collect()
            } else {
                pending.iter().filter_map(parse_one).collect()
            };

        let mut notes = Vec::new();
        for (decl, tree, comment_notes) in results {
            if let Some(record) = self.records.get_mut(&decl) {
                record.full = tree;
            }
            notes.extend(comment_notes.into_iter().map(|note| (decl, note)));
        }
        notes
    }
}

// ==================== Tests ====================
