//! Token definitions for comment markup content

use logos::Logos;

/// The kinds of tokens inside a documentation comment body.
///
/// The logos patterns cover ordinary prose scanning. Tokens of the
/// `Attr*`/`TagClose` group carry no pattern: they are produced by the
/// lexer's tag mode after a `TagOpen`/`TagEndOpen` switches into it.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r]+")] // Skip blanks; newlines stay significant
pub enum TokenKind {
    // ==================== Markup ====================
    /// A `\name` or `@name` command introducer.
    #[regex(r"[\\@][a-zA-Z][a-zA-Z0-9_]*")]
    Command,

    /// `<name`: start-tag opener, switches the lexer into tag mode.
    #[regex(r"<[a-zA-Z][a-zA-Z0-9_-]*")]
    TagOpen,

    /// `</name`: end-tag opener, switches the lexer into tag mode.
    #[regex(r"</[a-zA-Z][a-zA-Z0-9_-]*")]
    TagEndOpen,

    // ==================== Prose ====================
    /// A run of characters with no markup significance.
    #[regex(r"[^ \t\r\n@<\\]+")]
    Word,

    /// Line break. Paragraph structure upstream depends on these.
    #[token("\n")]
    Newline,

    /// A `<` that did not open a tag; literal text.
    #[token("<")]
    Lt,

    /// A `\` or `@` not followed by a command name; literal text.
    #[regex(r"[\\@]")]
    Marker,

    // ==================== Tag mode ====================
    // Produced while scanning `<name ...>` attributes; no logos patterns.
    /// Attribute name inside a tag.
    AttrName,
    /// `=` between an attribute name and its value.
    Eq,
    /// Attribute value with any surrounding quotes removed.
    AttrValue,
    /// `>` ending a tag.
    TagClose,

    // ==================== Special ====================
    /// End of the scanned text.
    Eof,
}

impl TokenKind {
    /// Whether this token contributes literal characters to a text run.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::Word | Self::Lt | Self::Marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textual_kinds() {
        assert!(TokenKind::Word.is_textual());
        assert!(TokenKind::Lt.is_textual());
        assert!(TokenKind::Marker.is_textual());
        assert!(!TokenKind::Command.is_textual());
        assert!(!TokenKind::Newline.is_textual());
    }
}
