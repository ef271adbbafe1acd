use std::fmt;

use crate::{Callback, HTML_BREAK, HTML_BREAK_PATTERN};

/// A rule as it takes part in the composite pattern.
pub struct CompiledRule<T> {
    pub(crate) name: String,
    pub(crate) pattern_text: String,
    pub(crate) callback: Option<Callback<T>>,
    pub(crate) discard: bool,
    pub(crate) num_captures: usize,
    /// Set for the synthetic line-break rule, whose built-in action starts a new line.
    pub(crate) line_break: bool,
    /// The index of the group that wraps the rule in the composite pattern.
    pub(crate) group: usize,
}

impl<T> CompiledRule<T> {
    /// The synthetic rule for HTML line breaks.
    pub(crate) fn line_break() -> Self {
        Self {
            name: HTML_BREAK.to_string(),
            pattern_text: HTML_BREAK_PATTERN.to_string(),
            callback: None,
            discard: true,
            num_captures: 0,
            line_break: true,
            group: 0,
        }
    }

    /// Get the name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pattern text as it appears inside the composite pattern, without the wrapping group.
    #[inline]
    pub fn pattern_text(&self) -> &str {
        &self.pattern_text
    }

    /// The number of capturing groups of the rule's own pattern.
    #[inline]
    pub fn num_captures(&self) -> usize {
        self.num_captures
    }

    /// The index of the rule's wrapping group in the composite pattern. The rule's own groups
    /// follow directly.
    #[inline]
    pub fn group(&self) -> usize {
        self.group
    }

    /// Check if matches of the rule are discarded.
    #[inline]
    pub fn is_discarded(&self) -> bool {
        self.discard
    }

    #[inline]
    pub(crate) fn callback(&self) -> Option<&Callback<T>> {
        self.callback.as_ref()
    }
}

impl<T> fmt::Debug for CompiledRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRule")
            .field("name", &self.name)
            .field("pattern_text", &self.pattern_text)
            .field("discard", &self.discard)
            .field("num_captures", &self.num_captures)
            .field("line_break", &self.line_break)
            .field("group", &self.group)
            .finish()
    }
}
