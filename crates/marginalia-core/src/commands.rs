//! Command table for documentation markup
//!
//! Maps a command name to how the parser should treat it: stand-alone block
//! command, parameter documentation, verbatim opener, or inline formatting.
//! The built-in set covers the common Doxygen-style names; callers register
//! project-specific commands on top without touching parser logic.

use std::collections::HashMap;

use crate::tree::RenderKind;

/// Declared argument count of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many whitespace-delimited word arguments.
    Fixed(u8),
    /// All remaining words on the command's line.
    Variable,
}

/// How a registered command parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// Stand-alone block command: positional words per `arity`, then a
    /// trailing description.
    Block { arity: Arity },
    /// `\param`-style: direction bracket, parameter name, description.
    Param,
    /// `\tparam`-style: position bracket, parameter name, description.
    TParam,
    /// Opens a verbatim region ended by a line whose first token is `closer`.
    VerbatimOpen { closer: String },
    /// Inline formatting command inside a paragraph.
    Inline { render: RenderKind, arity: Arity },
}

impl CommandKind {
    /// Whether a line starting with this command terminates a paragraph.
    #[must_use]
    pub const fn is_block_level(&self) -> bool {
        !matches!(self, Self::Inline { .. })
    }
}

/// Registered command names and their parse behavior.
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: HashMap<String, CommandKind>,
}

impl CommandTable {
    /// A table with no registrations; useful for fully custom setups.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers or replaces a command. `name` is given without the `\`/`@`
    /// introducer.
    pub fn register(&mut self, name: impl Into<String>, kind: CommandKind) {
        self.commands.insert(name.into(), kind);
    }

    /// Looks up a command by bare name or `\`/`@`-prefixed spelling.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&CommandKind> {
        let bare = name.strip_prefix(['\\', '@']).unwrap_or(name);
        self.commands.get(bare)
    }

    /// Whether `name` is registered as a paragraph-terminating command.
    #[must_use]
    pub fn is_block_command(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(CommandKind::is_block_level)
    }
}

impl Default for CommandTable {
    /// The built-in Doxygen-style command set.
    fn default() -> Self {
        let mut table = Self::empty();

        const PLAIN_BLOCK: &[&str] = &[
            "brief",
            "short",
            "return",
            "returns",
            "result",
            "see",
            "sa",
            "note",
            "warning",
            "deprecated",
            "since",
            "author",
            "remark",
            "remarks",
            "par",
            "invariant",
            "pre",
            "post",
        ];
        for name in PLAIN_BLOCK {
            table.register(*name, CommandKind::Block {
                arity: Arity::Fixed(0),
            });
        }

        // These name what they document (an exception type, a return value)
        // before the description starts.
        for name in ["throws", "throw", "exception", "retval"] {
            table.register(name, CommandKind::Block {
                arity: Arity::Fixed(1),
            });
        }

        table.register("param", CommandKind::Param);
        table.register("tparam", CommandKind::TParam);

        table.register("code", CommandKind::VerbatimOpen {
            closer: "endcode".to_string(),
        });
        table.register("verbatim", CommandKind::VerbatimOpen {
            closer: "endverbatim".to_string(),
        });

        const INLINE: &[(&str, RenderKind)] = &[
            ("b", RenderKind::Bold),
            ("bold", RenderKind::Bold),
            ("c", RenderKind::Monospaced),
            ("p", RenderKind::Monospaced),
            ("e", RenderKind::Emphasized),
            ("em", RenderKind::Emphasized),
            ("a", RenderKind::Emphasized),
        ];
        for (name, render) in INLINE {
            table.register(*name, CommandKind::Inline {
                render: *render,
                arity: Arity::Fixed(1),
            });
        }

        table
    }
}
