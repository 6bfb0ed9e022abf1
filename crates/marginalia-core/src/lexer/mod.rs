//! Lexer for documentation-comment markup
//!
//! Scans paragraph content from a documentation comment into tokens:
//!
//! - `\command` / `@command` introducers
//! - HTML-like start and end tags with their attributes
//! - words, line breaks, and literal punctuation for text-run assembly
//!
//! The lexer is mode-based. Ordinary prose is matched by the logos-derived
//! [`TokenKind`] patterns; the inside of a tag (`<name ...>`) is scanned by
//! hand so attribute values can be double-quoted, single-quoted, or bare.
//! Malformed input never aborts a scan: the lexer records a [`SpannedError`]
//! and keeps going, so callers always receive a complete token stream.

#![allow(clippy::cast_possible_truncation)] // spans are u32; oversized comments are rejected before lexing

mod span;
mod token;

pub use span::Span;
pub use token::TokenKind;

use logos::Logos;
use thiserror::Error;

/// A token with its kind, location, and text.
///
/// `lexeme` holds the matched source text, except for [`TokenKind::AttrValue`]
/// where surrounding quotes are already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub lexeme: String,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, span: Span, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            lexeme: lexeme.into(),
        }
    }
}

// ==================== Errors ====================

/// Lexical problems recovered during a scan.
///
/// Each variant carries the name of the tag being scanned when the problem
/// was found; tags are the only context-sensitive region the lexer handles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// Input ended before the tag's `>`.
    #[error("tag '<{0}' is never closed with '>'")]
    UnterminatedTag(String),

    /// A quoted attribute value has no closing quote.
    #[error("unterminated quoted value in tag '<{0}'")]
    UnterminatedAttribute(String),

    /// A character with no meaning inside a tag.
    #[error("stray character inside tag '<{0}'")]
    StrayTagCharacter(String),
}

/// A lexical error paired with where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedError {
    pub error: LexError,
    pub span: Span,
}

impl std::fmt::Display for SpannedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.error, self.span)
    }
}

impl std::error::Error for SpannedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

// ==================== Lexer ====================

/// What the lexer is currently inside of.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LexerMode {
    /// Ordinary prose, handled by the logos patterns.
    Prose,
    /// Between a tag opener and its `>`; `after_eq` tracks whether the next
    /// bare run is an attribute value rather than an attribute name.
    Tag { name: String, after_eq: bool },
}

/// Tokenizer over one stretch of comment prose.
pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
    mode: LexerMode,
    errors: Vec<SpannedError>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            mode: LexerMode::Prose,
            errors: Vec::new(),
            finished: false,
        }
    }

    /// Scans the whole input, returning every token plus recovered errors.
    ///
    /// The token stream always ends with a single [`TokenKind::Eof`].
    #[must_use]
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<SpannedError>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.errors)
    }

    fn next_token(&mut self) -> Token {
        match self.mode {
            LexerMode::Prose => self.lex_prose(),
            LexerMode::Tag { .. } => self.lex_tag(),
        }
    }

    // ==================== Prose mode ====================

    fn lex_prose(&mut self) -> Token {
        let remaining = &self.source[self.position..];
        let mut sub = TokenKind::lexer(remaining);

        let Some(result) = sub.next() else {
            return self.eof_token();
        };
        let span = Span::new(
            (self.position + sub.span().start) as u32,
            (self.position + sub.span().end) as u32,
        );
        let lexeme = sub.slice().to_string();
        self.position += sub.span().end;

        match result {
            Ok(TokenKind::TagOpen) => {
                self.mode = LexerMode::Tag {
                    name: lexeme[1..].to_string(),
                    after_eq: false,
                };
                Token::new(TokenKind::TagOpen, span, lexeme)
            }
            Ok(TokenKind::TagEndOpen) => {
                self.mode = LexerMode::Tag {
                    name: lexeme[2..].to_string(),
                    after_eq: false,
                };
                Token::new(TokenKind::TagEndOpen, span, lexeme)
            }
            Ok(kind) => Token::new(kind, span, lexeme),
            // The prose patterns cover every character class, so a failed
            // match can only be odd bytes; fold them into the text.
            Err(()) => Token::new(TokenKind::Word, span, lexeme),
        }
    }

    // ==================== Tag mode ====================

    fn lex_tag(&mut self) -> Token {
        loop {
            self.skip_tag_blanks();
            let start = self.position;
            let Some(ch) = self.peek_char() else {
                let name = self.tag_name();
                self.push_error(LexError::UnterminatedTag(name), start, start);
                self.mode = LexerMode::Prose;
                return self.eof_token();
            };

            match ch {
                '>' => {
                    self.advance_char();
                    self.mode = LexerMode::Prose;
                    return Token::new(TokenKind::TagClose, Span::from(start..self.position), ">");
                }
                '/' if self.peek_second() == Some('>') => {
                    self.advance_char();
                    self.advance_char();
                    self.mode = LexerMode::Prose;
                    return Token::new(TokenKind::TagClose, Span::from(start..self.position), "/>");
                }
                '=' => {
                    self.advance_char();
                    if let LexerMode::Tag { after_eq, .. } = &mut self.mode {
                        *after_eq = true;
                    }
                    return Token::new(TokenKind::Eq, Span::from(start..self.position), "=");
                }
                '"' | '\'' => return self.lex_quoted_value(ch),
                '/' | '<' => {
                    let name = self.tag_name();
                    self.advance_char();
                    self.push_error(LexError::StrayTagCharacter(name), start, self.position);
                }
                _ => return self.lex_bare_run(),
            }
        }
    }

    /// A run of unquoted characters: an attribute name, or a bare value when
    /// the previous token was `=`.
    fn lex_bare_run(&mut self) -> Token {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            let stops = matches!(ch, ' ' | '\t' | '\r' | '\n' | '=' | '>' | '"' | '\'' | '<')
                || (ch == '/' && self.peek_second() == Some('>'));
            if stops {
                break;
            }
            self.advance_char();
        }
        let lexeme = self.source[start..self.position].to_string();
        let kind = if self.take_after_eq() {
            TokenKind::AttrValue
        } else {
            TokenKind::AttrName
        };
        Token::new(kind, Span::from(start..self.position), lexeme)
    }

    fn lex_quoted_value(&mut self, quote: char) -> Token {
        let start = self.position;
        self.advance_char();
        let content_start = self.position;

        while let Some(ch) = self.peek_char() {
            if ch == quote {
                let lexeme = self.source[content_start..self.position].to_string();
                self.advance_char();
                self.take_after_eq();
                return Token::new(TokenKind::AttrValue, Span::from(start..self.position), lexeme);
            }
            self.advance_char();
        }

        let name = self.tag_name();
        self.push_error(LexError::UnterminatedAttribute(name), start, self.position);
        self.mode = LexerMode::Prose;
        let lexeme = self.source[content_start..self.position].to_string();
        Token::new(TokenKind::AttrValue, Span::from(start..self.position), lexeme)
    }

    // ==================== Cursor helpers ====================

    fn peek_char(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.position..].chars();
        chars.next();
        chars.next()
    }

    fn advance_char(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.position += ch.len_utf8();
        }
    }

    fn skip_tag_blanks(&mut self) {
        while matches!(self.peek_char(), Some(' ' | '\t' | '\r' | '\n')) {
            self.advance_char();
        }
    }

    fn tag_name(&self) -> String {
        match &self.mode {
            LexerMode::Tag { name, .. } => name.clone(),
            LexerMode::Prose => String::new(),
        }
    }

    /// Reads and clears the `after_eq` flag of the current tag mode.
    fn take_after_eq(&mut self) -> bool {
        if let LexerMode::Tag { after_eq, .. } = &mut self.mode {
            std::mem::take(after_eq)
        } else {
            false
        }
    }

    fn push_error(&mut self, error: LexError, start: usize, end: usize) {
        self.errors.push(SpannedError {
            error,
            span: Span::from(start..end),
        });
    }

    fn eof_token(&self) -> Token {
        let end = self.source.len() as u32;
        Token::new(TokenKind::Eof, Span::new(end, end), "")
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

// ==================== Tests ====================
