use crate::{default_rules, Lexer, LexerOptions, Result, Rule};

/// A builder for creating a lexer.
///
/// ```
/// use rxlex::{Lexer, Rule};
///
/// let lexer: Lexer = Lexer::builder()
///     .add_rule(Rule::literal("LPAREN", "("))
///     .add_rule(Rule::literal("RPAREN", ")"))
///     .add_default_rules()
///     .build()
///     .unwrap();
/// let tokens = lexer.lex("(a b)").unwrap();
/// assert_eq!(tokens.len(), 4);
/// ```
pub struct LexerBuilder<T = String> {
    rules: Vec<Rule<T>>,
    options: LexerOptions,
}

impl<T> LexerBuilder<T> {
    /// Creates a new builder without rules and with default options.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            options: LexerOptions::default(),
        }
    }

    /// Appends a rule.
    pub fn add_rule(mut self, rule: Rule<T>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends the given rules in order.
    pub fn add_rules(mut self, rules: impl IntoIterator<Item = Rule<T>>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Appends the rules of [default_rules].
    pub fn add_default_rules(self) -> Self {
        self.add_rules(default_rules())
    }

    /// Replaces all options.
    pub fn with_options(mut self, options: LexerOptions) -> Self {
        self.options = options;
        self
    }

    /// Enables or disables the escaping of `&`, `<` and `>` in patterns.
    pub fn escape_markup(mut self, escape_markup: bool) -> Self {
        self.options.escape_markup = escape_markup;
        self
    }

    /// Enables or disables line counting at `\n` characters.
    pub fn track_newlines(mut self, track_newlines: bool) -> Self {
        self.options.track_newlines = track_newlines;
        self
    }

    /// Limits the backtracking steps of the regex engine per match attempt.
    pub fn backtrack_limit(mut self, limit: usize) -> Self {
        self.options.backtrack_limit = Some(limit);
        self
    }

    /// Creates the lexer and compiles its rules right away.
    pub fn build(self) -> Result<Lexer<T>> {
        let lexer = self.build_deferred();
        lexer.compile()?;
        Ok(lexer)
    }

    /// Creates the lexer. The rules are compiled on first use.
    pub fn build_deferred(self) -> Lexer<T> {
        Lexer::with_options(self.rules, self.options)
    }
}

impl<T> Default for LexerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for LexerBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexerBuilder")
            .field("rules", &self.rules)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LexErrorKind, WHITESPACE, WORD};

    #[test]
    fn test_builder() {
        let lexer: Lexer = LexerBuilder::new()
            .add_rule(Rule::literal("ARROW", "->"))
            .add_default_rules()
            .track_newlines(true)
            .backtrack_limit(10_000)
            .build()
            .unwrap();
        assert!(lexer.is_compiled());
        assert!(lexer.options().track_newlines);
        assert_eq!(lexer.options().backtrack_limit, Some(10_000));
        let names = lexer.rules().iter().map(Rule::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["ARROW", WHITESPACE, WORD]);
    }

    #[test]
    fn test_build_fails_eagerly() {
        let result: Result<Lexer> = LexerBuilder::new().build();
        assert!(matches!(
            result.unwrap_err().kind(),
            LexErrorKind::Validation { rule: None, .. }
        ));
    }

    #[test]
    fn test_build_deferred() {
        let lexer: Lexer = LexerBuilder::new()
            .add_rule(Rule::regex("BROKEN", "[a"))
            .escape_markup(false)
            .build_deferred();
        assert!(!lexer.is_compiled());
        assert!(!lexer.options().escape_markup);
        assert!(lexer.compile().is_err());
    }
}
