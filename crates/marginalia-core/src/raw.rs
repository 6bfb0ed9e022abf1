//! Raw comment records and classification
//!
//! The first stage of the pipeline. Given a comment's text, its delimiter
//! style, and whether it was produced by merging adjacent single-line
//! comments, this module yields a [`RawComment`]: the classified
//! [`CommentKind`] plus a brief extract for quick-reference display.
//! Classification looks only at delimiters and the merge flag, never at the
//! body, so it is cheap enough to run for every comment unconditionally.
//!
//! Delimiter stripping lives here too: both the brief extractor and the
//! tree builder consume the same normalized body lines.

use serde::{Deserialize, Serialize};

use crate::lexer::Span;
use crate::tree::FullComment;

// ==================== Delimiter styles ====================

/// The leading delimiter of a comment as written in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelimiterStyle {
    /// `//`
    LinePlain,
    /// `///`
    LineDoc,
    /// `//!`
    LineBang,
    /// `/*`
    BlockPlain,
    /// `/**`
    BlockDoc,
    /// `/*!`
    BlockBang,
}

impl DelimiterStyle {
    /// The literal delimiter characters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LinePlain => "//",
            Self::LineDoc => "///",
            Self::LineBang => "//!",
            Self::BlockPlain => "/*",
            Self::BlockDoc => "/**",
            Self::BlockBang => "/*!",
        }
    }

    /// Whether this is a `//`-family single-line style.
    #[must_use]
    pub const fn is_line(self) -> bool {
        matches!(self, Self::LinePlain | Self::LineDoc | Self::LineBang)
    }

    /// Sniffs the delimiter from a raw span's leading characters.
    ///
    /// Callers that already know the style (a source lexer does) should pass
    /// it directly; this exists for inputs that arrive as bare text.
    #[must_use]
    pub fn detect(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        match bytes {
            [b'/', b'/', b'/', ..] => Some(Self::LineDoc),
            [b'/', b'/', b'!', ..] => Some(Self::LineBang),
            [b'/', b'/', ..] => Some(Self::LinePlain),
            [b'/', b'*', b'*', ..] => Some(Self::BlockDoc),
            [b'/', b'*', b'!', ..] => Some(Self::BlockBang),
            [b'/', b'*', ..] => Some(Self::BlockPlain),
            _ => None,
        }
    }
}

// ==================== Comment kinds ====================

/// The classified kind of a raw comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommentKind {
    /// Empty or unrecognizable input, including oversized spans.
    Invalid,
    /// A bar-style single-line convention (`////…` dividers and similar).
    OrdinaryBcpl,
    /// Plain `/* */`.
    OrdinaryC,
    /// Plain `//`.
    BcplSlash,
    /// `//!` in the original eight-kind set. The classification table folds
    /// that spelling into [`CommentKind::Qt`], so this kind is accepted on
    /// externally built records but never produced here.
    BcplExcl,
    /// `/**` or `///` documentation.
    JavaDoc,
    /// `/*!` or `//!` documentation.
    Qt,
    /// Adjacent single-line comments merged into one logical comment.
    Merged,
}

impl CommentKind {
    /// Whether comments of this kind carry documentation markup. The tree
    /// builder only runs for documentation kinds.
    #[must_use]
    pub const fn is_documentation(self) -> bool {
        matches!(self, Self::JavaDoc | Self::Qt | Self::BcplExcl | Self::Merged)
    }
}

/// Classifies a comment from its delimiter style and merge flag.
///
/// Checked in priority order: merged runs win, then documentation styles,
/// then the plain styles. Two body quirks are folded in: a `////…` bar run
/// is an ordinary divider despite its `///` prefix, and the degenerate
/// `/**/` is an empty ordinary C comment rather than documentation.
#[must_use]
pub fn classify(text: &str, style: DelimiterStyle, merged: bool) -> CommentKind {
    if merged {
        return CommentKind::Merged;
    }
    if text.is_empty() {
        return CommentKind::Invalid;
    }
    match style {
        DelimiterStyle::LineDoc | DelimiterStyle::BlockDoc => {
            if text.starts_with("////") {
                CommentKind::OrdinaryBcpl
            } else if text == "/**/" {
                CommentKind::OrdinaryC
            } else {
                CommentKind::JavaDoc
            }
        }
        DelimiterStyle::LineBang | DelimiterStyle::BlockBang => CommentKind::Qt,
        DelimiterStyle::LinePlain => CommentKind::BcplSlash,
        DelimiterStyle::BlockPlain => CommentKind::OrdinaryC,
    }
}

// ==================== Raw comment record ====================

/// The classified record for one declaration's comment.
///
/// Created once when the comment is discovered and never mutated afterwards;
/// the parsed tree is attached by the tree builder, not by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComment {
    pub kind: CommentKind,
    /// The comment text exactly as written, delimiters included.
    pub text: String,
    /// Where the text sat in the original source buffer.
    pub span: Span,
    /// Short summary for quick-reference display; empty for kinds that
    /// carry no documentation.
    pub brief: String,
    /// The parsed tree. `None` until built, and permanently for
    /// non-documentation kinds and empty bodies.
    pub full: Option<FullComment>,
}

impl RawComment {
    /// Classifies `text` and computes its brief.
    #[must_use]
    pub fn new(text: impl Into<String>, span: Span, style: DelimiterStyle, merged: bool) -> Self {
        let text = text.into();
        let kind = classify(&text, style, merged);
        let brief = if kind.is_documentation() {
            compute_brief(&normalize_body(&text))
        } else {
            String::new()
        };
        Self {
            kind,
            text,
            span,
            brief,
            full: None,
        }
    }

    /// Like [`RawComment::new`] but sniffing the delimiter style from the
    /// text itself. Unrecognizable text yields an `Invalid` record.
    #[must_use]
    pub fn from_text(text: impl Into<String>, span: Span, merged: bool) -> Self {
        let text = text.into();
        match DelimiterStyle::detect(&text) {
            Some(style) => Self::new(text, span, style, merged),
            None => Self {
                kind: CommentKind::Invalid,
                text,
                span,
                brief: String::new(),
                full: None,
            },
        }
    }

    /// Whether the tree builder should run for this comment.
    #[must_use]
    pub fn is_documentation(&self) -> bool {
        self.kind.is_documentation()
    }

    /// The comment body with delimiters and per-line decoration stripped,
    /// one entry per source line.
    #[must_use]
    pub fn body_lines(&self) -> Vec<String> {
        normalize_body(&self.text)
    }
}

// ==================== Normalization ====================

/// Strips delimiters and shared decoration, returning the body lines.
///
/// Line-style comments (single or merged) lose each line's marker
/// independently plus at most one following space. Block comments lose the
/// opening and closing delimiters; when every interior line leads with the
/// same `*` or `!` decoration, the decoration goes too.
#[must_use]
pub fn normalize_body(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if text.starts_with("//") {
        text.lines().map(strip_line_marker).collect()
    } else {
        normalize_block_body(text)
    }
}

fn strip_line_marker(line: &str) -> String {
    let trimmed = line.trim_start();
    let Some(rest) = trimmed.strip_prefix("//") else {
        return line.to_string();
    };
    let rest = match rest.as_bytes().first() {
        Some(b'/' | b'!') => &rest[1..],
        _ => rest,
    };
    strip_one_space(rest).to_string()
}

fn normalize_block_body(text: &str) -> Vec<String> {
    let body = text.strip_suffix("*/").unwrap_or(text);
    let body = body.strip_prefix("/*").unwrap_or(body);
    // The doc marker that made the delimiter /** or /*!.
    let body = match body.as_bytes().first() {
        Some(b'*' | b'!') => &body[1..],
        _ => body,
    };

    let mut lines: Vec<&str> = body.lines().collect();
    if let Some(first) = lines.first_mut() {
        *first = strip_one_space(first);
    }

    if let Some(decoration) = shared_decoration(&lines) {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    (*line).to_string()
                } else {
                    strip_decoration(line, decoration)
                }
            })
            .collect()
    } else {
        lines.iter().map(|line| (*line).to_string()).collect()
    }
}

/// The decoration character every interior non-blank line leads with, if any.
fn shared_decoration(lines: &[&str]) -> Option<char> {
    let mut decoration = None;
    for line in lines.iter().skip(1) {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }
        let lead = trimmed.chars().next()?;
        if lead != '*' && lead != '!' {
            return None;
        }
        match decoration {
            None => decoration = Some(lead),
            Some(seen) if seen != lead => return None,
            Some(_) => {}
        }
    }
    decoration
}

fn strip_decoration(line: &str, decoration: char) -> String {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix(decoration) {
        Some(rest) => strip_one_space(rest).to_string(),
        None => trimmed.to_string(),
    }
}

fn strip_one_space(text: &str) -> &str {
    text.strip_prefix(' ').unwrap_or(text)
}

// ==================== Brief extraction ====================

/// Computes the brief from normalized body lines.
///
/// An explicit `\brief`/`@brief` argument wins, read up to the next block
/// command or blank line. Otherwise the brief is the first sentence of the
/// first non-whitespace paragraph, ending at a `.` followed by whitespace
/// or end of text, or at the paragraph boundary, whichever comes first.
/// Verbatim regions are dropped before either scan runs; their content is
/// never read as markup.
#[must_use]
pub fn compute_brief(lines: &[String]) -> String {
    let lines = strip_verbatim_regions(lines);
    if let Some(explicit) = explicit_brief(&lines) {
        return explicit;
    }
    first_sentence(&first_paragraph_text(&lines))
}

/// Verbatim opener/closer pairs the brief scanner recognizes. The scanner
/// runs before any parser exists, so only the built-in regions are known.
const VERBATIM_PAIRS: &[(&str, &str)] = &[("code", "endcode"), ("verbatim", "endverbatim")];

/// Drops verbatim regions, replacing each with a paragraph break.
fn strip_verbatim_regions(lines: &[String]) -> Vec<String> {
    let mut kept = Vec::with_capacity(lines.len());
    let mut closer: Option<&str> = None;
    for line in lines {
        let trimmed = line.trim();
        if let Some(end) = closer {
            if leading_command(trimmed) == Some(end) {
                closer = None;
                kept.push(String::new());
            }
            continue;
        }
        match verbatim_closer(trimmed) {
            Some(end) => closer = Some(end),
            None => kept.push(line.clone()),
        }
    }
    kept
}

/// The closer paired with a line's verbatim opener, when it has one.
fn verbatim_closer(trimmed: &str) -> Option<&'static str> {
    let name = leading_command(trimmed)?;
    VERBATIM_PAIRS
        .iter()
        .find(|(opener, _)| *opener == name)
        .map(|(_, closer)| *closer)
}

/// The command a `\`/`@` line introduces, when it is one.
fn leading_command(trimmed: &str) -> Option<&str> {
    if !is_command_line(trimmed) {
        return None;
    }
    let body = &trimmed[1..];
    let end = body
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(body.len());
    Some(&body[..end])
}

fn explicit_brief(lines: &[String]) -> Option<String> {
    let start = lines
        .iter()
        .position(|line| brief_argument(line).is_some())?;
    let mut text = brief_argument(&lines[start]).unwrap_or_default().to_string();
    for line in &lines[start + 1..] {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_command_line(trimmed) {
            break;
        }
        text.push(' ');
        text.push_str(trimmed);
    }
    Some(collapse_whitespace(&text))
}

/// The text after a `\brief`/`@brief` marker, when the line carries one.
fn brief_argument(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    for marker in ["\\brief", "@brief"] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return Some(rest.trim_start());
            }
        }
    }
    None
}

/// Joins the first run of plain prose lines, skipping any leading command
/// blocks (a command plus its continuation lines up to a blank line).
fn first_paragraph_text(lines: &[String]) -> String {
    let mut text = String::new();
    let mut skipping_command = false;
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !text.is_empty() {
                break;
            }
            skipping_command = false;
            continue;
        }
        if is_command_line(trimmed) {
            if !text.is_empty() {
                break;
            }
            skipping_command = true;
            continue;
        }
        if skipping_command {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(trimmed);
    }
    collapse_whitespace(&text)
}

fn first_sentence(text: &str) -> String {
    let bytes = text.as_bytes();
    for (i, &byte) in bytes.iter().enumerate() {
        if byte != b'.' {
            continue;
        }
        match bytes.get(i + 1) {
            None => break,
            Some(next) if next.is_ascii_whitespace() => {
                return text[..=i].to_string();
            }
            Some(_) => {}
        }
    }
    text.to_string()
}

/// Whether a trimmed line starts a `\`/`@` command.
pub(crate) fn is_command_line(trimmed: &str) -> bool {
    let mut chars = trimmed.chars();
    matches!(chars.next(), Some('\\' | '@')) && matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
}

/// Collapses whitespace runs to single spaces and trims both ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ==================== Tests ====================
