//! Canonical re-emission of comment trees
//!
//! Implements `Display` for every tree node, producing comment body text in
//! canonical form: commands spelled with `\`, one blank line between blocks,
//! attribute values double-quoted. Re-parsing the rendered text of a tree
//! yields an equal tree, which is what makes parser round-trip checks
//! possible.

use std::fmt::{self, Display, Formatter};

use super::{
    BlockCommand, BlockContent, FullComment, HtmlEndTag, HtmlStartTag, InlineCommand,
    InlineContent, Paragraph, ParamCommand, TParamCommand, VerbatimBlock,
};

// ============================================================================
// Helpers
// ============================================================================

fn write_args(f: &mut Formatter<'_>, args: &[String]) -> fmt::Result {
    for arg in args {
        write!(f, " {arg}")?;
    }
    Ok(())
}

// ============================================================================
// Tree root
// ============================================================================

impl Display for FullComment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                write!(f, "\n\n")?;
            }
            write!(f, "{block}")?;
        }
        Ok(())
    }
}

impl Display for BlockContent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BlockContent::Paragraph(p) => write!(f, "{p}"),
            BlockContent::Command(c) => write!(f, "{c}"),
            BlockContent::Param(p) => write!(f, "{p}"),
            BlockContent::TParam(t) => write!(f, "{t}"),
            BlockContent::Verbatim(v) => write!(f, "{v}"),
            BlockContent::HtmlStart(t) => write!(f, "{t}"),
            BlockContent::HtmlEnd(t) => write!(f, "{t}"),
        }
    }
}

// ============================================================================
// Block nodes
// ============================================================================

impl Display for Paragraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // A solo tag at column zero would re-parse at block position; keep
        // single-tag paragraphs indented by one space.
        let solo_tag = self.content.len() == 1
            && matches!(
                self.content[0],
                InlineContent::HtmlStart(_) | InlineContent::HtmlEnd(_)
            );
        if solo_tag {
            write!(f, " ")?;
        }
        for (i, node) in self.content.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

impl Display for BlockCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\\{}", self.name)?;
        write_args(f, &self.args)
    }
}

impl Display for ParamCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\\{}{}", self.name, self.direction.as_str())?;
        write_args(f, &self.args)
    }
}

impl Display for TParamCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\\{}", self.name)?;
        if !self.position.is_empty() {
            write!(f, "[")?;
            for (i, index) in self.position.iter().enumerate() {
                if i > 0 {
                    write!(f, ".")?;
                }
                write!(f, "{index}")?;
            }
            write!(f, "]")?;
        }
        write_args(f, &self.args)
    }
}

impl Display for VerbatimBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "\\{}", self.name)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        write!(f, "\\end{}", self.name)
    }
}

// ============================================================================
// Inline nodes
// ============================================================================

impl Display for InlineContent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InlineContent::Text(text) => write!(f, "{text}"),
            InlineContent::Command(c) => write!(f, "{c}"),
            InlineContent::HtmlStart(t) => write!(f, "{t}"),
            InlineContent::HtmlEnd(t) => write!(f, "{t}"),
        }
    }
}

impl Display for InlineCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\\{}", self.name)?;
        write_args(f, &self.args)
    }
}

// ============================================================================
// HTML tags
// ============================================================================

impl Display for HtmlStartTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for attr in &self.attrs {
            if attr.value.is_empty() {
                write!(f, " {}", attr.name)?;
            } else {
                write!(f, " {}=\"{}\"", attr.name, attr.value)?;
            }
        }
        write!(f, ">")
    }
}

impl Display for HtmlEndTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "</{}>", self.name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::tree::{
        BlockCommand, BlockContent, FullComment, HtmlAttribute, HtmlEndTag, HtmlStartTag,
        InlineCommand, InlineContent, Paragraph, ParamCommand, ParamDirection, RenderKind,
        TParamCommand, VerbatimBlock,
    };

    #[test]
    fn display_inline_command() {
        let cmd = InlineCommand {
            name: "c".to_string(),
            render: RenderKind::Monospaced,
            args: vec!["malloc".to_string()],
        };
        assert_eq!(format!("{cmd}"), "\\c malloc");
    }

    #[test]
    fn display_block_command() {
        let cmd = BlockCommand {
            name: "brief".to_string(),
            args: vec!["Computes sum.".to_string()],
        };
        assert_eq!(format!("{cmd}"), "\\brief Computes sum.");
    }

    #[test]
    fn display_param_command() {
        let param = ParamCommand {
            name: "param".to_string(),
            args: vec!["a".to_string(), "First operand.".to_string()],
            direction: ParamDirection::Out,
            param_index: None,
        };
        assert_eq!(format!("{param}"), "\\param[out] a First operand.");
    }

    #[test]
    fn display_tparam_with_position() {
        let tparam = TParamCommand {
            name: "tparam".to_string(),
            args: vec!["T".to_string()],
            position: vec![1, 0],
        };
        assert_eq!(format!("{tparam}"), "\\tparam[1.0] T");

        let bare = TParamCommand {
            name: "tparam".to_string(),
            args: vec!["U".to_string()],
            position: vec![],
        };
        assert_eq!(format!("{bare}"), "\\tparam U");
    }

    #[test]
    fn display_verbatim_block() {
        let block = VerbatimBlock {
            name: "code".to_string(),
            lines: vec!["int x = 1;".to_string(), "  return x;".to_string()],
        };
        assert_eq!(format!("{block}"), "\\code\nint x = 1;\n  return x;\n\\endcode");
    }

    #[test]
    fn display_tags() {
        let mut start = HtmlStartTag::new("a");
        start.attrs.push(HtmlAttribute {
            name: "href".to_string(),
            value: "x.html".to_string(),
        });
        start.attrs.push(HtmlAttribute {
            name: "hidden".to_string(),
            value: String::new(),
        });
        assert_eq!(format!("{start}"), "<a href=\"x.html\" hidden>");

        let end = HtmlEndTag {
            name: "a".to_string(),
        };
        assert_eq!(format!("{end}"), "</a>");
    }

    #[test]
    fn display_paragraph_mixed() {
        let para = Paragraph::new(vec![
            InlineContent::HtmlStart(HtmlStartTag::new("b")),
            InlineContent::text("bold"),
            InlineContent::HtmlEnd(HtmlEndTag {
                name: "b".to_string(),
            }),
            InlineContent::text("text"),
        ]);
        assert_eq!(format!("{para}"), "<b> bold </b> text");
    }

    #[test]
    fn display_solo_tag_paragraph_stays_inline() {
        let para = Paragraph::new(vec![InlineContent::HtmlStart(HtmlStartTag::new("b"))]);
        assert_eq!(format!("{para}"), " <b>");
    }

    #[test]
    fn display_full_comment_separates_blocks() {
        let tree = FullComment::new(vec![
            BlockContent::Paragraph(Paragraph::new(vec![InlineContent::text("Summary.")])),
            BlockContent::Command(BlockCommand {
                name: "return".to_string(),
                args: vec!["The sum.".to_string()],
            }),
        ]);
        assert_eq!(format!("{tree}"), "Summary.\n\n\\return The sum.");
    }
}
