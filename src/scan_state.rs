use crate::Position;

/// The mutable position context of a single scan.
///
/// A fresh state is created for every scan and handed to each rule callback by mutable
/// reference. A callback that adjusts `line` or `column` itself sets `updated`, which tells the
/// scanner not to advance the column by the length of the match. The scanner clears the flag
/// again after the match has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    /// The current line, 1-based.
    pub line: usize,
    /// The current column, 1-based.
    pub column: usize,
    /// Set by a callback that moved the position manually.
    pub updated: bool,
}

impl ScanState {
    /// Creates the state for the start of a text.
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 1,
            updated: false,
        }
    }

    /// A snapshot of the current position.
    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Moves to the start of the next line and marks the state as updated.
    pub fn new_line(&mut self) {
        self.line += 1;
        self.column = 1;
        self.updated = true;
    }

    /// Advances the position over the given text.
    ///
    /// Without `track_newlines` only the column moves, by the number of characters. Otherwise
    /// each `\n` starts a new line and the column restarts behind the last one.
    pub(crate) fn advance(&mut self, text: &str, track_newlines: bool) {
        if track_newlines {
            if let Some(last) = text.rfind('\n') {
                self.line += text.matches('\n').count();
                self.column = text[last + 1..].chars().count() + 1;
                return;
            }
        }
        self.column += text.chars().count();
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new()
    }
}
