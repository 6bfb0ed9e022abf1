//! Typed tree for parsed documentation comments
//!
//! A successfully parsed comment body becomes a [`FullComment`]: an ordered
//! sequence of block-level nodes (paragraphs, documentation commands,
//! verbatim regions, block-position HTML tags), where paragraphs in turn
//! hold inline content (text runs, formatting commands, inline tags).
//!
//! The tree is immutable once built: the parser hands ownership to the
//! comment record and nothing mutates it afterwards. Every type here
//! serializes with serde as a lossless structural mapping, so a downstream
//! generator can round-trip trees through JSON without losing variants.

mod pretty;

use serde::{Deserialize, Serialize};

// ==================== Closed kind sets ====================

/// How an inline command's arguments should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RenderKind {
    /// No special rendering; also the kind of unrecognized commands.
    #[default]
    Normal,
    Bold,
    Monospaced,
    Emphasized,
}

/// Documented data-flow direction of a function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParamDirection {
    /// The default when no direction token is given.
    #[default]
    In,
    Out,
    InOut,
}

impl ParamDirection {
    /// The canonical bracket token for this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "[in]",
            Self::Out => "[out]",
            Self::InOut => "[in,out]",
        }
    }

    /// Parses the inside of a direction bracket. Interior whitespace is
    /// tolerated (`[in, out]`); anything unrecognized is `None`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let normalized: String = token
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            "in,out" | "inout" => Some(Self::InOut),
            _ => None,
        }
    }
}

// ==================== Tree root ====================

/// The parse result for one raw comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullComment {
    /// Block-level nodes in source order.
    pub blocks: Vec<BlockContent>,
}

impl FullComment {
    #[must_use]
    pub fn new(blocks: Vec<BlockContent>) -> Self {
        Self { blocks }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// One block-level node of a comment tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockContent {
    Paragraph(Paragraph),
    Command(BlockCommand),
    Param(ParamCommand),
    TParam(TParamCommand),
    Verbatim(VerbatimBlock),
    HtmlStart(HtmlStartTag),
    HtmlEnd(HtmlEndTag),
}

// ==================== Block nodes ====================

/// A run of prose, holding inline content in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub content: Vec<InlineContent>,
    /// True when no inline node contributes visible text.
    pub is_whitespace: bool,
}

impl Paragraph {
    /// Builds a paragraph, computing the whitespace flag from its content.
    #[must_use]
    pub fn new(content: Vec<InlineContent>) -> Self {
        let is_whitespace = content
            .iter()
            .all(|node| matches!(node, InlineContent::Text(text) if text.trim().is_empty()));
        Self {
            content,
            is_whitespace,
        }
    }

    /// The paragraph's text runs joined with single spaces, ignoring
    /// commands and tags. Handy for summaries and assertions.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.content {
            if let InlineContent::Text(text) = node {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(text);
            }
        }
        out
    }
}

/// A generic block-level documentation command (`\brief`, `\return`, …).
///
/// `args` holds the declared positional arguments followed, when present,
/// by the command's trailing description as one whitespace-collapsed string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCommand {
    /// The command name without its `\`/`@` introducer.
    pub name: String,
    pub args: Vec<String>,
}

/// Parameter documentation (`\param[in] name description`).
///
/// Shares the [`BlockCommand`] field shape; `args[0]` is the parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamCommand {
    pub name: String,
    pub args: Vec<String>,
    pub direction: ParamDirection,
    /// Index into the declaration's parameter list. Filled by an external
    /// resolver, never by the parser; varargs never receive one.
    pub param_index: Option<u32>,
}

impl ParamCommand {
    /// The documented parameter's name, when one was supplied.
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// Template-parameter documentation (`\tparam[1.0] T description`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TParamCommand {
    pub name: String,
    pub args: Vec<String>,
    /// Path into nested template-parameter lists; `[1, 0]` is the second
    /// template parameter's first nested parameter. Empty when unresolved.
    pub position: Vec<u32>,
}

impl TParamCommand {
    /// The documented template parameter's name, when one was supplied.
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// A verbatim region (`\code` … `\endcode`): lines preserved exactly,
/// never reinterpreted as markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbatimBlock {
    /// The opener command name (`code`, `verbatim`, or a registered one).
    pub name: String,
    pub lines: Vec<String>,
}

// ==================== Inline nodes ====================

/// One inline node within a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineContent {
    /// A text run with internal whitespace collapsed to single spaces.
    Text(String),
    Command(InlineCommand),
    HtmlStart(HtmlStartTag),
    HtmlEnd(HtmlEndTag),
}

impl InlineContent {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// An inline formatting command (`\b word`, `\c code`, …).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineCommand {
    /// The command name without its introducer; kept so the command can be
    /// re-emitted in canonical form.
    pub name: String,
    pub render: RenderKind,
    pub args: Vec<String>,
}

// ==================== HTML tags ====================

/// An HTML-like start tag, valid at both block and inline position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlStartTag {
    pub name: String,
    pub attrs: Vec<HtmlAttribute>,
}

impl HtmlStartTag {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }
}

/// One `name="value"` pair of a start tag. Valueless attributes carry an
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlAttribute {
    pub name: String,
    pub value: String,
}

/// An HTML-like end tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlEndTag {
    pub name: String,
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_whitespace_flag() {
        let full = Paragraph::new(vec![InlineContent::text("hello")]);
        assert!(!full.is_whitespace);

        let blank = Paragraph::new(vec![InlineContent::text("  ")]);
        assert!(blank.is_whitespace);

        let empty = Paragraph::new(vec![]);
        assert!(empty.is_whitespace);

        let tagged = Paragraph::new(vec![InlineContent::HtmlStart(HtmlStartTag::new("b"))]);
        assert!(!tagged.is_whitespace);
    }

    #[test]
    fn paragraph_plain_text_skips_markup() {
        let para = Paragraph::new(vec![
            InlineContent::text("see"),
            InlineContent::HtmlStart(HtmlStartTag::new("b")),
            InlineContent::text("this"),
        ]);
        assert_eq!(para.plain_text(), "see this");
    }

    #[test]
    fn direction_tokens() {
        assert_eq!(ParamDirection::from_token("in"), Some(ParamDirection::In));
        assert_eq!(ParamDirection::from_token("OUT"), Some(ParamDirection::Out));
        assert_eq!(
            ParamDirection::from_token("in, out"),
            Some(ParamDirection::InOut)
        );
        assert_eq!(ParamDirection::from_token("bogus"), None);
        assert_eq!(ParamDirection::default(), ParamDirection::In);
    }

    #[test]
    fn param_accessors() {
        let param = ParamCommand {
            name: "param".to_string(),
            args: vec!["a".to_string(), "First operand.".to_string()],
            direction: ParamDirection::In,
            param_index: None,
        };
        assert_eq!(param.param_name(), Some("a"));
    }

    #[test]
    fn serde_round_trip_is_lossless() {
        let tree = FullComment::new(vec![
            BlockContent::Paragraph(Paragraph::new(vec![
                InlineContent::text("Computes sum."),
                InlineContent::Command(InlineCommand {
                    name: "c".to_string(),
                    render: RenderKind::Monospaced,
                    args: vec!["fast".to_string()],
                }),
            ])),
            BlockContent::Param(ParamCommand {
                name: "param".to_string(),
                args: vec!["a".to_string()],
                direction: ParamDirection::Out,
                param_index: Some(0),
            }),
            BlockContent::TParam(TParamCommand {
                name: "tparam".to_string(),
                args: vec!["T".to_string()],
                position: vec![1, 0],
            }),
            BlockContent::Verbatim(VerbatimBlock {
                name: "code".to_string(),
                lines: vec!["  int x = 1;".to_string()],
            }),
            BlockContent::HtmlStart(HtmlStartTag {
                name: "hr".to_string(),
                attrs: vec![HtmlAttribute {
                    name: "noshade".to_string(),
                    value: String::new(),
                }],
            }),
            BlockContent::HtmlEnd(HtmlEndTag {
                name: "div".to_string(),
            }),
        ]);

        let json = serde_json::to_string(&tree).expect("serialize");
        let back: FullComment = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, tree);
    }
}
