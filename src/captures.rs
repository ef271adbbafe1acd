use crate::Span;

/// The captures of the rule that produced a match.
///
/// Only the groups that belong to the firing rule are visible. Group 0 is the whole text matched
/// by the rule, groups `1..len()` are the rule's own capturing groups, numbered as they are in
/// the rule's pattern.
#[derive(Debug, Clone)]
pub struct RuleCaptures<'h> {
    haystack: &'h str,
    groups: Vec<Option<Span>>,
}

impl<'h> RuleCaptures<'h> {
    pub(crate) fn new(haystack: &'h str, groups: Vec<Option<Span>>) -> Self {
        debug_assert!(!groups.is_empty(), "group 0 must always be present");
        Self { haystack, groups }
    }

    /// Collects the groups `first..=first + num_captures` of the composite match.
    pub(crate) fn from_composite(
        haystack: &'h str,
        captures: &fancy_regex::Captures<'h>,
        first: usize,
        num_captures: usize,
    ) -> Self {
        let groups = (first..=first + num_captures)
            .map(|i| captures.get(i).map(|m| Span::new(m.start(), m.end())))
            .collect();
        Self::new(haystack, groups)
    }

    /// The text of the given group, `None` if the group did not participate in the match.
    pub fn get(&self, index: usize) -> Option<&'h str> {
        self.span(index).map(|span| &self.haystack[span.range()])
    }

    /// The span of the given group in the scanned text.
    pub fn span(&self, index: usize) -> Option<Span> {
        self.groups.get(index).copied().flatten()
    }

    /// The whole text matched by the rule.
    pub fn as_str(&self) -> &'h str {
        self.get(0).unwrap_or_default()
    }

    /// The number of groups including group 0.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always false, group 0 is always present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates over the texts of all groups, group 0 first.
    pub fn iter(&self) -> impl Iterator<Item = Option<&'h str>> + '_ {
        (0..self.groups.len()).map(|i| self.get(i))
    }
}

impl std::ops::Index<usize> for RuleCaptures<'_> {
    type Output = str;

    /// Panics if the group does not exist or did not participate in the match.
    fn index(&self, index: usize) -> &str {
        self.get(index)
            .unwrap_or_else(|| panic!("no group at index '{}'", index))
    }
}
