//! Comment tree construction
//!
//! Turns a classified raw comment into a [`FullComment`] tree. The body is
//! processed in layered passes: delimiter stripping (shared with [`crate::raw`]),
//! block segmentation over lines, and inline parsing within each paragraph.
//! The parser never fails on documentation input; anything malformed is
//! repaired and reported as a [`ParseNote`] alongside the tree.

#![allow(clippy::cast_possible_truncation)]

mod error;

pub use error::{ParseNote, ParseNoteKind};

use crate::commands::{Arity, CommandKind, CommandTable};
use crate::lexer::{LexError, Lexer, Token, TokenKind};
use crate::raw::{is_command_line, RawComment};
use crate::tree::{
    BlockCommand, BlockContent, FullComment, HtmlAttribute, HtmlEndTag, HtmlStartTag,
    InlineCommand, InlineContent, Paragraph, ParamCommand, ParamDirection, RenderKind,
    TParamCommand, VerbatimBlock,
};

// ==================== Parser ====================

/// Builds comment trees from raw comments.
///
/// Holds only the read-only command table, so one parser can serve any
/// number of comments, including concurrently.
#[derive(Debug, Clone, Default)]
pub struct CommentParser {
    table: CommandTable,
}

impl CommentParser {
    /// A parser with the built-in command table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser over a caller-extended command table.
    #[must_use]
    pub fn with_table(table: CommandTable) -> Self {
        Self { table }
    }

    /// The command table in use.
    #[must_use]
    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Parses a classified comment into a tree.
    ///
    /// Returns `None` for non-documentation kinds and for bodies that are
    /// empty after delimiter stripping; neither is an error. Notes describe
    /// anything repaired along the way.
    #[must_use]
    pub fn parse(&self, comment: &RawComment) -> (Option<FullComment>, Vec<ParseNote>) {
        if !comment.is_documentation() {
            return (None, Vec::new());
        }
        let lines = comment.body_lines();
        let (tree, notes) = self.parse_body(&lines);
        if tree.is_empty() {
            (None, notes)
        } else {
            (Some(tree), notes)
        }
    }

    /// Parses already-normalized body lines. Note lines are 1-based indexes
    /// into `lines`.
    #[must_use]
    pub fn parse_body(&self, lines: &[String]) -> (FullComment, Vec<ParseNote>) {
        TreeBuilder::new(&self.table).build(lines)
    }
}

// ==================== Block segmentation ====================

struct TreeBuilder<'a> {
    table: &'a CommandTable,
    blocks: Vec<BlockContent>,
    notes: Vec<ParseNote>,
    /// Lines of the paragraph being accumulated.
    paragraph: Vec<String>,
    paragraph_start: u32,
}

impl<'a> TreeBuilder<'a> {
    fn new(table: &'a CommandTable) -> Self {
        Self {
            table,
            blocks: Vec::new(),
            notes: Vec::new(),
            paragraph: Vec::new(),
            paragraph_start: 1,
        }
    }

    fn build(mut self, lines: &[String]) -> (FullComment, Vec<ParseNote>) {
        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            let trimmed = line.trim();
            if trimmed.is_empty() {
                self.flush_paragraph();
                i += 1;
                continue;
            }
            if is_command_line(trimmed) {
                let name = command_name(trimmed);
                match self.table.lookup(name).cloned() {
                    Some(CommandKind::VerbatimOpen { closer }) => {
                        self.flush_paragraph();
                        i = self.collect_verbatim(lines, i, name, &closer);
                        continue;
                    }
                    Some(CommandKind::Block { arity }) => {
                        self.flush_paragraph();
                        i = self.plain_command(lines, i, name, arity);
                        continue;
                    }
                    Some(CommandKind::Param) => {
                        self.flush_paragraph();
                        i = self.param_command(lines, i, name);
                        continue;
                    }
                    Some(CommandKind::TParam) => {
                        self.flush_paragraph();
                        i = self.tparam_command(lines, i, name);
                        continue;
                    }
                    // Inline and unknown commands are paragraph content.
                    Some(CommandKind::Inline { .. }) | None => {}
                }
            }
            if let Some(block) = solo_tag_block(line) {
                self.flush_paragraph();
                self.blocks.push(block);
                i += 1;
                continue;
            }
            if self.paragraph.is_empty() {
                self.paragraph_start = line_number(i);
            }
            self.paragraph.push(line.clone());
            i += 1;
        }
        self.flush_paragraph();
        (FullComment::new(self.blocks), self.notes)
    }

    /// Whether `line` would start a new block, ending a command's
    /// description run.
    fn starts_new_block(&self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return true;
        }
        if is_command_line(trimmed) && self.table.is_block_command(command_name(trimmed)) {
            return true;
        }
        solo_tag_block(line).is_some()
    }

    /// Joins a block command's line with its description continuation lines.
    fn command_block_text(&self, lines: &[String], start: usize) -> (String, usize) {
        let mut end = start + 1;
        while end < lines.len() && !self.starts_new_block(&lines[end]) {
            end += 1;
        }
        (lines[start..end].join(" "), end)
    }

    fn note(&mut self, kind: ParseNoteKind, line: u32) {
        self.notes.push(ParseNote::new(kind, line));
    }

    // ==================== Block commands ====================

    fn plain_command(&mut self, lines: &[String], start: usize, name: &str, arity: Arity) -> usize {
        let (joined, next) = self.command_block_text(lines, start);
        let line = line_number(start);
        let parts = command_parts(&joined, name);

        let mut args: Vec<String>;
        let consumed: usize;
        match arity {
            Arity::Fixed(count) => {
                let want = usize::from(count);
                consumed = want.min(parts.len());
                args = parts[..consumed].iter().map(|part| (*part).to_string()).collect();
                if consumed < want {
                    self.note(
                        ParseNoteKind::MalformedCommand {
                            command: name.to_string(),
                            detail: format!("expected {want} argument(s), found {consumed}"),
                        },
                        line,
                    );
                }
            }
            Arity::Variable => {
                consumed = parts.len();
                args = parts.iter().map(|part| (*part).to_string()).collect();
            }
        }
        let description = parts[consumed..].join(" ");
        if !description.is_empty() {
            args.push(description);
        }

        self.blocks.push(BlockContent::Command(BlockCommand {
            name: name.to_string(),
            args,
        }));
        next
    }

    fn param_command(&mut self, lines: &[String], start: usize, name: &str) -> usize {
        let (joined, next) = self.command_block_text(lines, start);
        let line = line_number(start);
        let mut parts = command_parts(&joined, name);

        let mut direction = ParamDirection::default();
        if let Some(bracket) = take_bracket(&mut parts) {
            match parse_direction(&bracket) {
                Some(parsed) => direction = parsed,
                None => self.note(
                    ParseNoteKind::MalformedCommand {
                        command: name.to_string(),
                        detail: format!("unrecognized direction `{bracket}`"),
                    },
                    line,
                ),
            }
        }
        let args = self.name_and_description(parts, name, line);

        self.blocks.push(BlockContent::Param(ParamCommand {
            name: name.to_string(),
            args,
            direction,
            param_index: None,
        }));
        next
    }

    fn tparam_command(&mut self, lines: &[String], start: usize, name: &str) -> usize {
        let (joined, next) = self.command_block_text(lines, start);
        let line = line_number(start);
        let mut parts = command_parts(&joined, name);

        let mut position = Vec::new();
        if let Some(bracket) = take_bracket(&mut parts) {
            match parse_position(&bracket) {
                Some(parsed) => position = parsed,
                None => self.note(
                    ParseNoteKind::MalformedCommand {
                        command: name.to_string(),
                        detail: format!("invalid position `{bracket}`"),
                    },
                    line,
                ),
            }
        }
        let args = self.name_and_description(parts, name, line);

        self.blocks.push(BlockContent::TParam(TParamCommand {
            name: name.to_string(),
            args,
            position,
        }));
        next
    }

    /// `args[0]` is the documented name; any remaining text collapses into
    /// one final description argument.
    fn name_and_description(&mut self, mut parts: Vec<&str>, command: &str, line: u32) -> Vec<String> {
        if parts.is_empty() {
            self.note(
                ParseNoteKind::MalformedCommand {
                    command: command.to_string(),
                    detail: "missing parameter name".to_string(),
                },
                line,
            );
            return Vec::new();
        }
        let mut args = vec![parts.remove(0).to_string()];
        let description = parts.join(" ");
        if !description.is_empty() {
            args.push(description);
        }
        args
    }

    // ==================== Verbatim regions ====================

    fn collect_verbatim(&mut self, lines: &[String], start: usize, name: &str, closer: &str) -> usize {
        let trimmed = lines[start].trim();
        let mut body = Vec::new();
        let rest = &trimmed[1 + name.len()..];
        let rest = rest.strip_prefix(' ').unwrap_or(rest);
        if !rest.is_empty() {
            body.push(rest.to_string());
        }

        let mut i = start + 1;
        let mut terminated = false;
        while i < lines.len() {
            if is_closer_line(lines[i].trim(), closer) {
                terminated = true;
                i += 1;
                break;
            }
            body.push(lines[i].clone());
            i += 1;
        }
        if !terminated {
            self.note(
                ParseNoteKind::UnterminatedVerbatim {
                    opener: name.to_string(),
                },
                line_number(start),
            );
        }

        self.blocks.push(BlockContent::Verbatim(VerbatimBlock {
            name: name.to_string(),
            lines: body,
        }));
        i
    }

    // ==================== Paragraphs and inline content ====================

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.paragraph).join("\n");
        let content = self.parse_inline(&text, self.paragraph_start);
        let paragraph = Paragraph::new(content);
        if !paragraph.is_whitespace {
            self.blocks.push(BlockContent::Paragraph(paragraph));
        }
    }

    fn parse_inline(&mut self, text: &str, first_line: u32) -> Vec<InlineContent> {
        let (tokens, errors) = Lexer::new(text).tokenize();
        for spanned in errors {
            let (LexError::UnterminatedTag(tag)
            | LexError::UnterminatedAttribute(tag)
            | LexError::StrayTagCharacter(tag)) = spanned.error;
            self.note(
                ParseNoteKind::UnbalancedTag { tag },
                first_line + newlines_before(text, spanned.span.start),
            );
        }

        let mut content = Vec::new();
        let mut run: Vec<&str> = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            match token.kind {
                TokenKind::Word | TokenKind::Lt | TokenKind::Marker => {
                    run.push(token.lexeme.as_str());
                    i += 1;
                }
                // Line joins are whitespace, not breaks.
                TokenKind::Newline => i += 1,
                TokenKind::Command => {
                    flush_run(&mut run, &mut content);
                    i = self.inline_command(text, first_line, &tokens, i, &mut content);
                }
                TokenKind::TagOpen => {
                    flush_run(&mut run, &mut content);
                    let (tag, next) = read_start_tag(&tokens, i);
                    content.push(InlineContent::HtmlStart(tag));
                    i = next;
                }
                TokenKind::TagEndOpen => {
                    flush_run(&mut run, &mut content);
                    let (tag, next) = read_end_tag(&tokens, i);
                    content.push(InlineContent::HtmlEnd(tag));
                    i = next;
                }
                TokenKind::Eof => break,
                // Tag-context tokens never appear in prose position.
                TokenKind::AttrName | TokenKind::Eq | TokenKind::AttrValue | TokenKind::TagClose => {
                    i += 1;
                }
            }
        }
        flush_run(&mut run, &mut content);
        content
    }

    fn inline_command(
        &mut self,
        text: &str,
        first_line: u32,
        tokens: &[Token],
        start: usize,
        content: &mut Vec<InlineContent>,
    ) -> usize {
        let token = &tokens[start];
        let name = token.lexeme[1..].to_string();
        let mut args = Vec::new();
        let mut i = start + 1;

        let (render, arity) = match self.table.lookup(&name) {
            Some(CommandKind::Inline { render, arity }) => (*render, *arity),
            // Block commands away from line starts and unknown names both
            // read as plain inline commands taking the rest of the line.
            _ => (RenderKind::Normal, Arity::Variable),
        };
        match arity {
            Arity::Fixed(count) => {
                let want = usize::from(count);
                while args.len() < want && tokens[i].kind == TokenKind::Word {
                    args.push(tokens[i].lexeme.clone());
                    i += 1;
                }
                if args.len() < want {
                    self.note(
                        ParseNoteKind::MalformedCommand {
                            command: name.clone(),
                            detail: format!("expected {want} argument(s), found {}", args.len()),
                        },
                        first_line + newlines_before(text, token.span.start),
                    );
                }
            }
            Arity::Variable => {
                while tokens[i].kind.is_textual() {
                    args.push(tokens[i].lexeme.clone());
                    i += 1;
                }
            }
        }
        content.push(InlineContent::Command(InlineCommand { name, render, args }));
        i
    }
}

// ==================== Block-level tags ====================

/// Parses a line that is exactly one HTML tag at column zero, the only
/// position where a tag becomes a block-level node.
fn solo_tag_block(line: &str) -> Option<BlockContent> {
    if !line.starts_with('<') {
        return None;
    }
    let (tokens, errors) = Lexer::new(line).tokenize();
    if !errors.is_empty() {
        return None;
    }
    match tokens.first()?.kind {
        TokenKind::TagOpen => {
            let (tag, next) = read_start_tag(&tokens, 0);
            (tokens.get(next)?.kind == TokenKind::Eof).then_some(BlockContent::HtmlStart(tag))
        }
        TokenKind::TagEndOpen => {
            let (tag, next) = read_end_tag(&tokens, 0);
            (tokens.get(next)?.kind == TokenKind::Eof).then_some(BlockContent::HtmlEnd(tag))
        }
        _ => None,
    }
}

/// Collects a start tag's attributes up to its `>`. Truncated tags still
/// yield a node; the lexer has already reported the damage.
fn read_start_tag(tokens: &[Token], start: usize) -> (HtmlStartTag, usize) {
    let mut tag = HtmlStartTag::new(&tokens[start].lexeme[1..]);
    let mut i = start + 1;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::AttrName => {
                tag.attrs.push(HtmlAttribute {
                    name: tokens[i].lexeme.clone(),
                    value: String::new(),
                });
                i += 1;
            }
            TokenKind::Eq => i += 1,
            TokenKind::AttrValue => {
                if let Some(attr) = tag.attrs.last_mut() {
                    attr.value = tokens[i].lexeme.clone();
                }
                i += 1;
            }
            TokenKind::TagClose => {
                i += 1;
                break;
            }
            _ => break,
        }
    }
    (tag, i)
}

fn read_end_tag(tokens: &[Token], start: usize) -> (HtmlEndTag, usize) {
    let tag = HtmlEndTag {
        name: tokens[start].lexeme[2..].to_string(),
    };
    let mut i = start + 1;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::TagClose => {
                i += 1;
                break;
            }
            TokenKind::AttrName | TokenKind::Eq | TokenKind::AttrValue => i += 1,
            _ => break,
        }
    }
    (tag, i)
}

// ==================== Helpers ====================

fn flush_run(run: &mut Vec<&str>, content: &mut Vec<InlineContent>) {
    if !run.is_empty() {
        content.push(InlineContent::text(run.join(" ")));
        run.clear();
    }
}

/// The identifier after a command introducer.
fn command_name(trimmed: &str) -> &str {
    let body = &trimmed[1..];
    let end = body
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(body.len());
    &body[..end]
}

/// Splits a command block into whitespace-delimited parts after the command
/// word, keeping text attached to it (`\param[in]`) as its own leading part.
fn command_parts<'s>(joined: &'s str, name: &str) -> Vec<&'s str> {
    let mut words = joined.split_whitespace();
    let Some(first) = words.next() else {
        return Vec::new();
    };
    let suffix = &first[1 + name.len()..];
    let mut parts = Vec::new();
    if !suffix.is_empty() {
        parts.push(suffix);
    }
    parts.extend(words);
    parts
}

/// Pops a leading `[...]` token, joining across parts when the bracket
/// itself contains whitespace (`[in, out]`).
fn take_bracket(parts: &mut Vec<&str>) -> Option<String> {
    if !parts.first().is_some_and(|part| part.starts_with('[')) {
        return None;
    }
    let mut bracket = String::new();
    let mut consumed = 0;
    while consumed < parts.len() {
        let part = parts[consumed];
        if consumed > 0 {
            bracket.push(' ');
        }
        bracket.push_str(part);
        consumed += 1;
        if part.contains(']') {
            break;
        }
    }
    parts.drain(..consumed);
    Some(bracket)
}

/// The direction named by a bracket token, when well formed.
fn parse_direction(bracket: &str) -> Option<ParamDirection> {
    let inner = bracket.strip_prefix('[')?.strip_suffix(']')?;
    ParamDirection::from_token(inner)
}

/// The dotted index path of a position bracket (`[1.0]` → `[1, 0]`).
fn parse_position(bracket: &str) -> Option<Vec<u32>> {
    let inner = bracket.strip_prefix('[')?.strip_suffix(']')?;
    inner
        .split('.')
        .map(|index| index.trim().parse().ok())
        .collect()
}

/// Whether a trimmed line closes an open verbatim region. Text after the
/// closer is discarded.
fn is_closer_line(trimmed: &str, closer: &str) -> bool {
    let Some(rest) = trimmed
        .strip_prefix(['\\', '@'])
        .and_then(|rest| rest.strip_prefix(closer))
    else {
        return false;
    };
    rest.is_empty() || rest.starts_with(char::is_whitespace)
}

fn line_number(index: usize) -> u32 {
    (index + 1) as u32
}

/// How many line breaks precede byte `position` in `text`.
fn newlines_before(text: &str, position: u32) -> u32 {
    let end = (position as usize).min(text.len());
    text[..end].bytes().filter(|&b| b == b'\n').count() as u32
}

// ==================== Tests ====================
