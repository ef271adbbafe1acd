//! Module with the rule types a lexer is built from.
use std::{fmt, sync::Arc};

use crate::{CallbackError, RuleCaptures, ScanState};

/// The value a rule callback returns.
///
/// `Ok(None)` suppresses the token, `Ok(Some(content))` becomes the token's content and an error
/// aborts the scan.
pub type CallbackResult<T> = std::result::Result<Option<T>, CallbackError>;

/// A rule callback.
///
/// It receives the captures of the rule that fired and the live scan state. Callbacks are
/// shared between scans and therefore must be `Send + Sync`.
pub type Callback<T> =
    Arc<dyn Fn(&RuleCaptures<'_>, &mut ScanState) -> CallbackResult<T> + Send + Sync>;

/// The pattern of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RulePattern {
    /// A regular expression in the syntax of the `fancy-regex` crate.
    Regex(String),
    /// A string that is matched literally. All regex metacharacters in it are escaped.
    Literal(String),
}

impl RulePattern {
    /// The source text of the pattern as it was given.
    pub fn as_str(&self) -> &str {
        match self {
            RulePattern::Regex(s) | RulePattern::Literal(s) => s,
        }
    }

    /// Check if the pattern is a literal string.
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, RulePattern::Literal(_))
    }
}

impl From<fancy_regex::Regex> for RulePattern {
    fn from(regex: fancy_regex::Regex) -> Self {
        RulePattern::Regex(regex.as_str().to_string())
    }
}

impl From<&fancy_regex::Regex> for RulePattern {
    fn from(regex: &fancy_regex::Regex) -> Self {
        RulePattern::Regex(regex.as_str().to_string())
    }
}

impl fmt::Display for RulePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulePattern::Regex(s) => write!(f, "/{}/", s.escape_default()),
            RulePattern::Literal(s) => write!(f, "\"{}\"", s.escape_default()),
        }
    }
}

/// A named pattern with an optional callback and a discard flag.
///
/// The order of the rules given to a lexer is significant. At any position of the input the
/// first rule whose pattern matches wins, even if a later rule would match a longer text.
pub struct Rule<T = String> {
    name: String,
    pattern: RulePattern,
    callback: Option<Callback<T>>,
    discard: bool,
}

impl<T> Rule<T> {
    /// Create a new rule.
    pub fn new(name: impl Into<String>, pattern: impl Into<RulePattern>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            callback: None,
            discard: false,
        }
    }

    /// Create a rule with a regular expression pattern.
    pub fn regex(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, RulePattern::Regex(pattern.into()))
    }

    /// Create a rule that matches the given text literally.
    pub fn literal(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, RulePattern::Literal(text.into()))
    }

    /// Sets the callback that turns a match into the content of a token.
    pub fn with_callback<F>(self, callback: F) -> Self
    where
        F: Fn(&RuleCaptures<'_>, &mut ScanState) -> CallbackResult<T> + Send + Sync + 'static,
    {
        self.with_shared_callback(Arc::new(callback))
    }

    /// Sets a callback that may be shared with other rules.
    pub fn with_shared_callback(mut self, callback: Callback<T>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Marks the rule as discarded. Its matches consume input but never produce tokens.
    pub fn discarded(mut self) -> Self {
        self.discard = true;
        self
    }

    /// Sets the discard flag.
    pub fn set_discard(&mut self, discard: bool) {
        self.discard = discard;
    }

    /// Get the name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the pattern.
    #[inline]
    pub fn pattern(&self) -> &RulePattern {
        &self.pattern
    }

    /// Get the callback.
    #[inline]
    pub fn callback(&self) -> Option<&Callback<T>> {
        self.callback.as_ref()
    }

    /// Check if the rule is discarded.
    #[inline]
    pub fn is_discarded(&self) -> bool {
        self.discard
    }
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            pattern: self.pattern.clone(),
            callback: self.callback.clone(),
            discard: self.discard,
        }
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("callback", &self.callback.as_ref().map(|_| ".."))
            .field("discard", &self.discard)
            .finish()
    }
}

impl<T> fmt::Display for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.pattern)
    }
}

/// The name of the synthetic line-break rule every lexer starts with.
pub const HTML_BREAK: &str = "HTML_BREAK";
/// The pattern of the line-break rule: an HTML `<br>` element, optionally self-closed and with
/// optional whitespace inside the tag.
pub const HTML_BREAK_PATTERN: &str = r"(?i:<\s*br\s*/?\s*>)";

/// The name of the built-in whitespace rule.
pub const WHITESPACE: &str = "WHITESPACE";
/// The name of the built-in word rule.
pub const WORD: &str = "WORD";

/// A convenience rule set to start from.
///
/// `WHITESPACE` consumes runs of whitespace and is discarded, `WORD` matches runs of word
/// characters or any single other character.
pub fn default_rules<T>() -> Vec<Rule<T>> {
    vec![
        Rule::regex(WHITESPACE, r"\s+").discarded(),
        Rule::regex(WORD, r"\w+|."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_builders() {
        let rule: Rule = Rule::literal("LPAREN", "(");
        assert_eq!(rule.name(), "LPAREN");
        assert!(rule.pattern().is_literal());
        assert!(!rule.is_discarded());
        assert!(rule.callback().is_none());

        let rule: Rule = Rule::regex("WS", r"\s+")
            .discarded()
            .with_callback(|_, _| Ok(None));
        assert!(rule.is_discarded());
        assert!(rule.callback().is_some());
        assert_eq!(format!("{}", rule), "WS: /\\\\s+/");
    }

    #[test]
    fn test_pattern_from_regex() {
        let regex = fancy_regex::Regex::new(r"(a)\1").unwrap();
        let rule: Rule = Rule::new("DOUBLE", &regex);
        assert_eq!(rule.pattern(), &RulePattern::Regex(r"(a)\1".to_string()));
    }

    #[test]
    fn test_default_rules() {
        let rules: Vec<Rule> = default_rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name(), WHITESPACE);
        assert!(rules[0].is_discarded());
        assert_eq!(rules[1].name(), WORD);
        assert!(!rules[1].is_discarded());
    }
}
