use std::sync::OnceLock;

use crate::{
    internal::CompiledRuleSet, CompiledRule, LexerBuilder, LexerOptions, Result, Rule,
    ScanOutput, Token, Tokens,
};

/// A lexer built from an ordered list of rules.
///
/// The rules are compiled into one composite pattern the first time the lexer is used, or
/// explicitly with [Lexer::compile]. A compiled lexer is immutable and can be used for any number
/// of scans, also from several threads at once. Every scan owns its own [crate::ScanState].
///
/// The composite pattern always starts with the synthetic `HTML_BREAK` rule, which matches HTML
/// `<br>` elements, starts a new line and produces no token.
pub struct Lexer<T = String> {
    rules: Vec<Rule<T>>,
    options: LexerOptions,
    compiled: OnceLock<CompiledRuleSet<T>>,
}

impl<T> Lexer<T> {
    /// Creates a lexer with default options. The rules are compiled on first use.
    pub fn new(rules: Vec<Rule<T>>) -> Self {
        Self::with_options(rules, LexerOptions::default())
    }

    /// Creates a lexer with the given options. The rules are compiled on first use.
    pub fn with_options(rules: Vec<Rule<T>>, options: LexerOptions) -> Self {
        Self {
            rules,
            options,
            compiled: OnceLock::new(),
        }
    }

    /// Creates a builder for a lexer.
    pub fn builder() -> LexerBuilder<T> {
        LexerBuilder::new()
    }

    /// Get the rules.
    #[inline]
    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }

    /// The names of the rules in order, without the synthetic line-break rule.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::name).collect()
    }

    /// Get the options.
    #[inline]
    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// Check if the rules have been compiled already.
    #[inline]
    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    /// Compiles the rules unless this already happened.
    ///
    /// Fails if a rule is malformed. A failed compilation leaves the lexer uncompiled.
    pub fn compile(&self) -> Result<()> {
        self.compiled().map(|_| ())
    }

    /// Compiles the rules again, discarding the previous result.
    ///
    /// On failure the previous result is kept.
    pub fn recompile(&mut self) -> Result<()> {
        let compiled = CompiledRuleSet::try_from_rules(&self.rules, &self.options)?;
        self.compiled = OnceLock::from(compiled);
        Ok(())
    }

    /// Appends a rule. The lexer has to be compiled again afterwards, which happens on next use.
    pub fn add_rule(&mut self, rule: Rule<T>) {
        self.rules.push(rule);
        self.compiled = OnceLock::new();
    }

    /// The composite pattern all rules are compiled into.
    pub fn composite_pattern(&self) -> Result<&str> {
        Ok(self.compiled()?.composite_pattern())
    }

    /// The compiled rules, the synthetic line-break rule first.
    pub fn compiled_rules(&self) -> Result<&[CompiledRule<T>]> {
        Ok(self.compiled()?.rules())
    }

    fn compiled(&self) -> Result<&CompiledRuleSet<T>> {
        if let Some(compiled) = self.compiled.get() {
            return Ok(compiled);
        }
        let compiled = CompiledRuleSet::try_from_rules(&self.rules, &self.options)?;
        // Another thread may have won the race, its result is identical.
        Ok(self.compiled.get_or_init(|| compiled))
    }

    /// Returns an iterator over the tokens of the given text.
    pub fn tokens<'h>(&self, text: &'h str) -> Result<Tokens<'_, 'h, T>>
    where
        T: From<&'h str>,
    {
        Ok(Tokens::new(
            self.compiled()?,
            self.options.track_newlines,
            text,
        ))
    }

    /// Scans the given text into tokens.
    ///
    /// Input no rule matches is skipped and logged. Use [Lexer::scan] to also get the skipped
    /// pieces of input.
    pub fn lex<'h>(&self, text: &'h str) -> Result<Vec<Token<T>>>
    where
        T: From<&'h str>,
    {
        self.tokens(text)?.collect()
    }

    /// Scans the given text into tokens and returns them together with the skipped input.
    pub fn scan<'h>(&self, text: &'h str) -> Result<ScanOutput<T>>
    where
        T: From<&'h str>,
    {
        let mut tokens = self.tokens(text)?;
        let mut result = Vec::new();
        while let Some(token) = tokens.next_token()? {
            result.push(token);
        }
        Ok(ScanOutput {
            tokens: result,
            skipped: tokens.into_skipped(),
        })
    }
}

impl<T> std::fmt::Debug for Lexer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("rules", &self.rules)
            .field("options", &self.options)
            .field("compiled", &self.compiled.get())
            .finish()
    }
}
