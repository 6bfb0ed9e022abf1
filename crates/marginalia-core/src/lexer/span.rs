//! Byte-range tracking for comment text
//!
//! Spans locate tokens within the text handed to the lexer and record where
//! a raw comment sat in the original source buffer. They are half-open byte
//! ranges stored as `u32`, which caps a single tracked text at 4 GiB,
//! comfortably beyond any comment the size cap admits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A byte range, start inclusive and end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first character.
    pub start: u32,
    /// Byte offset one past the last character.
    pub end: u32,
}

impl Span {
    /// Creates a span from start and end offsets.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// Used to grow a text run as adjacent word tokens are folded into it.
    #[must_use]
    pub fn merge(&self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// A placeholder span for synthesized nodes.
    #[must_use]
    pub const fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// The span as a `usize` range, for slicing the scanned text.
    #[must_use]
    pub fn as_range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::dummy()
    }
}

impl From<Range<usize>> for Span {
    #[allow(clippy::cast_possible_truncation)]
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start as u32,
            end: range.end as u32,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.as_range()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(3, 9);
        assert_eq!(span.len(), 6);
        assert!(!span.is_empty());
        assert_eq!(span.as_range(), 3..9);
        assert_eq!(span.to_string(), "3..9");
    }

    #[test]
    fn empty_and_dummy() {
        assert!(Span::new(5, 5).is_empty());
        assert!(Span::dummy().is_empty());
        assert_eq!(Span::default(), Span::dummy());
    }

    #[test]
    fn merge_covers_both() {
        let a = Span::new(2, 5);
        let b = Span::new(7, 11);
        assert_eq!(a.merge(b), Span::new(2, 11));
        assert_eq!(b.merge(a), Span::new(2, 11));
    }

    #[test]
    fn from_range_round_trip() {
        let span: Span = (4..10).into();
        let range: Range<usize> = span.into();
        assert_eq!(range, 4..10);
    }
}
