//! Marginalia Core - Documentation comment engine for C-family sources
//!
//! This crate provides the core functionality:
//! - Raw comments: delimiter classification, normalization, brief extraction
//! - Lexer: tokenization of comment markup
//! - Tree: parsed representation of a documentation comment
//! - Commands: the documentation command set the parser recognizes
//! - Parser: tree construction from raw comment bodies
//! - Store: per-declaration comment registry with batch tree building

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Raw comment module - delimiter classification and brief extraction
pub mod raw;

/// Lexer module - tokenization of comment markup
pub mod lexer;

/// Comment tree - parsed representation of a documentation comment
pub mod tree;

/// Command registry - the documentation commands the parser recognizes
pub mod commands;

/// Parser module - converts raw comment bodies into trees
pub mod parser;

/// Comment store - per-declaration registry and batch tree building
pub mod store;

/// Convenience re-export of raw comment types
pub use raw::{CommentKind, DelimiterStyle, RawComment};

/// Convenience re-export of the markup lexer
pub use lexer::Lexer;

/// Convenience re-export of the tree root
pub use tree::FullComment;

/// Convenience re-export of the command registry
pub use commands::CommandTable;

/// Convenience re-export of the parser
pub use parser::{CommentParser, ParseNote, ParseNoteKind};

/// Convenience re-export of the store
pub use store::{DeclId, DocStore, StoreConfig};
