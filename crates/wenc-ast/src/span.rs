//! Source spans
//!
//! Byte-offset ranges into the original source text. The external front end
//! attaches one to every node; diagnostics slice the offending snippet out of
//! the source with them.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A span pointing at nothing. Used by programmatic tree builders.
    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Resolve this span's start offset to a 1-based line and column.
    ///
    /// Offsets past the end of the source clamp to the last position.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let upto = &source[..self.start.min(source.len())];
        let line = upto.matches('\n').count() + 1;
        let col = upto.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0) + 1;
        (line, col)
    }

    /// Slice the spanned snippet out of the source, clamped to its bounds.
    pub fn snippet<'a>(&self, source: &'a str) -> &'a str {
        let start = self.start.min(source.len());
        let end = self.end.clamp(start, source.len());
        &source[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let src = "let a = 1;\nlet b = 2;";
        assert_eq!(Span::new(0, 3).line_col(src), (1, 1));
        assert_eq!(Span::new(4, 5).line_col(src), (1, 5));
        assert_eq!(Span::new(15, 16).line_col(src), (2, 5));
    }

    #[test]
    fn test_snippet_clamps() {
        let src = "abc";
        assert_eq!(Span::new(1, 3).snippet(src), "bc");
        assert_eq!(Span::new(10, 20).snippet(src), "");
    }
}
