#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Position, Span};

/// A token produced by a lexer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token<T = String> {
    /// The name of the rule that produced the token.
    pub name: String,
    /// The value returned by the rule's callback, or the matched text.
    pub content: T,
    /// The position of the first character of the match.
    pub position: Position,
    /// The byte range of the match in the scanned text.
    pub span: Span,
}

impl<T> Token<T> {
    /// Create a new token.
    pub fn new(name: impl Into<String>, content: T, position: Position, span: Span) -> Self {
        Self {
            name: name.into(),
            content,
            position,
            span,
        }
    }

    /// Get the rule name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the content.
    #[inline]
    pub fn content(&self) -> &T {
        &self.content
    }

    /// Get the position.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Get the span.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Token<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}) at {}:{}",
            self.name, self.content, self.position.line, self.position.column
        )
    }
}

/// A piece of input that no rule matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkippedText {
    /// The position where the skipped text starts.
    pub position: Position,
    /// The byte range of the skipped text.
    pub span: Span,
    /// The skipped text itself.
    pub text: String,
}

impl std::fmt::Display for SkippedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "skipped {:?} at {}", self.text, self.position)
    }
}

/// The complete result of a scan: the tokens and the diagnostics for unmatched input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanOutput<T = String> {
    /// The tokens in input order.
    pub tokens: Vec<Token<T>>,
    /// The unmatched pieces of input in input order.
    pub skipped: Vec<SkippedText>,
}

impl<T> ScanOutput<T> {
    /// Check if the whole input was recognized.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}
