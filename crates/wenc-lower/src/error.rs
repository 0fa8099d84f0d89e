//! Lowering errors

use thiserror::Error;
use wenc_ast::Span;

pub type LowerResult<T> = Result<T, LowerError>;

/// Which phase reported an internal invariant violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lowering,
    PostProcess,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Lowering => write!(f, "lowering"),
            Phase::PostProcess => write!(f, "post-process"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LowerError {
    #[error("Grammar error: {message}")]
    Grammar { message: String },

    #[error("Unsupported construct at {line}:{col}: {snippet:?} ({note})")]
    Unsupported {
        line: usize,
        col: usize,
        snippet: String,
        note: String,
    },

    #[error("Internal {phase} error: {message}")]
    Invariant { phase: Phase, message: String },
}

impl LowerError {
    /// Build an `Unsupported` error, resolving `span` against the source text.
    pub fn unsupported(source: &str, span: Span, note: &str) -> Self {
        let (line, col) = span.line_col(source);
        LowerError::Unsupported {
            line,
            col,
            snippet: span.snippet(source).to_string(),
            note: note.to_string(),
        }
    }

    pub fn grammar(message: impl Into<String>) -> Self {
        LowerError::Grammar { message: message.into() }
    }

    pub fn invariant(phase: Phase, message: impl Into<String>) -> Self {
        LowerError::Invariant { phase, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_resolves_position() {
        let source = "let a = 1;\nfoo.bar;";
        let err = LowerError::unsupported(source, Span::new(11, 18), "member expression");
        let LowerError::Unsupported { line, col, snippet, .. } = err else {
            panic!("expected Unsupported");
        };
        assert_eq!(line, 2);
        assert_eq!(col, 1);
        assert_eq!(snippet, "foo.bar");
    }
}
