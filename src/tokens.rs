use fancy_regex::Captures;
use log::{trace, warn};

use crate::{
    internal::CompiledRuleSet, LexError, LexErrorKind, Position, Result, RuleCaptures,
    ScanState, SkippedText, Span, Token,
};

/// An iterator over the tokens of a text.
///
/// The iterator yields `Ok(Token)` values until the text is exhausted. Input that no rule
/// matches is skipped and recorded, see [Tokens::skipped]. An error from the regex engine or
/// from a rule callback is yielded once and ends the iteration.
///
/// * `'l` represents the lifetime of the lexer.
/// * `'h` represents the lifetime of the haystack being scanned.
///
/// This iterator can be created with the [`crate::Lexer::tokens`] method.
pub struct Tokens<'l, 'h, T> {
    rules: &'l CompiledRuleSet<T>,
    track_newlines: bool,
    haystack: &'h str,
    // The byte offset where the next search starts.
    cursor: usize,
    // The end of the last match. Input between it and the next match is skipped input.
    last_end: usize,
    state: ScanState,
    skipped: Vec<SkippedText>,
    finished: bool,
}

impl<'l, 'h, T> Tokens<'l, 'h, T>
where
    T: From<&'h str>,
{
    pub(crate) fn new(
        rules: &'l CompiledRuleSet<T>,
        track_newlines: bool,
        haystack: &'h str,
    ) -> Self {
        Self {
            rules,
            track_newlines,
            haystack,
            cursor: 0,
            last_end: 0,
            state: ScanState::new(),
            skipped: Vec::new(),
            finished: false,
        }
    }

    /// The pieces of input skipped so far.
    #[inline]
    pub fn skipped(&self) -> &[SkippedText] {
        &self.skipped
    }

    /// Consumes the iterator and returns the pieces of input skipped so far.
    pub fn into_skipped(self) -> Vec<SkippedText> {
        self.skipped
    }

    /// The current scan position, i.e. the position behind the last match.
    #[inline]
    pub fn position(&self) -> Position {
        self.state.position()
    }

    /// Returns the next token.
    ///
    /// Matches that produce no token are consumed until a token is found or the haystack is
    /// exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token<T>>> {
        while !self.finished {
            match self.find_next()? {
                Some(captures) => {
                    if let Some(token) = self.accept(&captures)? {
                        return Ok(Some(token));
                    }
                }
                None => self.finish(),
            }
        }
        Ok(None)
    }

    fn find_next(&self) -> Result<Option<Captures<'h>>> {
        if self.cursor > self.haystack.len() {
            return Ok(None);
        }
        self.rules
            .regex()
            .captures_from_pos(self.haystack, self.cursor)
            .map_err(|e| LexError::new(LexErrorKind::Matching(e)))
    }

    /// Translates a match of the composite pattern into a token.
    fn accept(&mut self, captures: &Captures<'h>) -> Result<Option<Token<T>>> {
        let Some(whole) = captures.get(0) else {
            self.finish();
            return Ok(None);
        };
        let span = Span::new(whole.start(), whole.end());
        if span.start > self.last_end {
            self.skip(self.last_end, span.start);
        }
        self.last_end = span.end;
        self.cursor = if span.is_empty() {
            // Step over one character, an empty match would be found again at the same place.
            self.haystack[span.end..]
                .chars()
                .next()
                .map_or(self.haystack.len() + 1, |c| span.end + c.len_utf8())
        } else {
            span.end
        };

        let rules = self.rules;
        let Some(rule) = rules.owner(captures) else {
            self.state.advance(whole.as_str(), self.track_newlines);
            return Ok(None);
        };
        trace!(
            "Rule '{}' matched {:?} at {}",
            rule.name(),
            whole.as_str(),
            self.state.position()
        );

        let position = self.state.position();
        let content = if rule.line_break {
            self.state.new_line();
            None
        } else if let Some(callback) = rule.callback() {
            let rule_captures = RuleCaptures::from_composite(
                self.haystack,
                captures,
                rule.group(),
                rule.num_captures(),
            );
            callback(&rule_captures, &mut self.state).map_err(|source| {
                LexError::new(LexErrorKind::Callback {
                    rule: rule.name().to_string(),
                    source,
                })
            })?
        } else {
            Some(T::from(whole.as_str()))
        };

        if self.state.updated {
            self.state.updated = false;
        } else {
            self.state.advance(whole.as_str(), self.track_newlines);
        }

        // Empty matches only move the cursor, they never become tokens.
        if rule.is_discarded() || span.is_empty() {
            return Ok(None);
        }
        Ok(content.map(|content| Token::new(rule.name(), content, position, span)))
    }

    /// Records the input between `start` and `end` as skipped.
    fn skip(&mut self, start: usize, end: usize) {
        let text = &self.haystack[start..end];
        let position = self.state.position();
        warn!("Skipped unrecognized input at {}: {:?}", position, text);
        self.skipped.push(SkippedText {
            position,
            span: Span::new(start, end),
            text: text.to_string(),
        });
        self.state.advance(text, self.track_newlines);
    }

    /// Ends the scan. Input behind the last match is skipped input.
    fn finish(&mut self) {
        self.finished = true;
        if self.last_end < self.haystack.len() {
            self.skip(self.last_end, self.haystack.len());
            self.last_end = self.haystack.len();
        }
    }
}

impl<'h, T> Iterator for Tokens<'_, 'h, T>
where
    T: From<&'h str>,
{
    type Item = Result<Token<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<T> std::fmt::Debug for Tokens<'_, '_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokens")
            .field("cursor", &self.cursor)
            .field("state", &self.state)
            .field("finished", &self.finished)
            .finish()
    }
}
