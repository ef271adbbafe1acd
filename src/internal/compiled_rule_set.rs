use std::fmt;

use fancy_regex::{Captures, Regex, RegexBuilder};
use log::{debug, trace};

use crate::{LexError, LexErrorKind, LexerOptions, Result, Rule, RuleId};

use super::{
    capture_groups::{count_captures, renumber_backreferences},
    normalize::normalize,
    CompiledRule,
};

/// The rules of a lexer compiled into one composite pattern.
///
/// The composite pattern has the form `(?m)(<line break>)|(<rule 1>)|(<rule 2>)|...`. Each rule is
/// wrapped into its own group, so exactly one wrapping group participates in any match and
/// identifies the rule that fired.
pub(crate) struct CompiledRuleSet<T> {
    rules: Vec<CompiledRule<T>>,
    regex: Regex,
}

impl<T> CompiledRuleSet<T> {
    /// Validates and compiles the given rules.
    ///
    /// Nothing is kept if any rule is rejected.
    pub(crate) fn try_from_rules(rules: &[Rule<T>], options: &LexerOptions) -> Result<Self> {
        if rules.is_empty() {
            return Err(LexError::validation(None, "no rules provided"));
        }
        let mut compiled = Vec::with_capacity(rules.len() + 1);
        compiled.push(CompiledRule::line_break());
        for (index, rule) in rules.iter().enumerate() {
            compiled.push(Self::compile_rule(index, rule, options)?);
        }

        let mut offset = 0;
        for rule in compiled.iter_mut() {
            rule.group = offset + 1;
            if let std::borrow::Cow::Owned(renumbered) =
                renumber_backreferences(&rule.pattern_text, rule.num_captures, offset)
            {
                trace!(
                    "Renumbered backreferences of rule '{}': {} -> {}",
                    rule.name,
                    rule.pattern_text,
                    renumbered
                );
                rule.pattern_text = renumbered;
            }
            offset += rule.num_captures + 1;
        }

        let composite = format!(
            "(?m){}",
            compiled
                .iter()
                .map(|rule| format!("({})", rule.pattern_text))
                .collect::<Vec<_>>()
                .join("|")
        );
        debug!(
            "Compiled {} rules into composite pattern: {}",
            rules.len(),
            composite
        );
        let regex = build_regex(&composite, options)
            .map_err(|e| LexError::new(LexErrorKind::CompositePattern(e)))?;
        debug_assert_eq!(regex.captures_len(), offset + 1);
        Ok(Self {
            rules: compiled,
            regex,
        })
    }

    /// Validates a single rule and prepares its pattern text.
    ///
    /// The rule is test-compiled on its own, wrapped the way it will be wrapped in the composite
    /// pattern. The regex engine has to agree with our group count, otherwise the rule uses
    /// syntax the renumbering does not understand and is rejected.
    fn compile_rule(
        index: usize,
        rule: &Rule<T>,
        options: &LexerOptions,
    ) -> Result<CompiledRule<T>> {
        if rule.name().is_empty() {
            return Err(LexError::validation(
                Some(RuleId::Index(index + 1)),
                "rule has no name",
            ));
        }
        if rule.pattern().as_str().is_empty() {
            return Err(LexError::validation(
                Some(RuleId::Name(rule.name().to_string())),
                "pattern must be a non-empty string or a regular expression",
            ));
        }

        let pattern_text = normalize(rule.pattern(), options.escape_markup);
        let num_captures = count_captures(&pattern_text);

        let isolated = format!(
            "({})",
            renumber_backreferences(&pattern_text, num_captures, 0)
        );
        let regex = build_regex(&isolated, options).map_err(|source| {
            LexError::new(LexErrorKind::RegexSyntax {
                rule: rule.name().to_string(),
                source,
            })
        })?;
        let engine_captures = regex.captures_len().saturating_sub(2);
        if engine_captures != num_captures {
            return Err(LexError::validation(
                Some(RuleId::Name(rule.name().to_string())),
                format!(
                    "unsupported group syntax: counted {} capturing groups, the regex engine reports {}",
                    num_captures, engine_captures
                ),
            ));
        }

        Ok(CompiledRule {
            name: rule.name().to_string(),
            pattern_text,
            callback: rule.callback().cloned(),
            discard: rule.is_discarded(),
            num_captures,
            line_break: false,
            group: 0,
        })
    }

    /// Returns the rule that produced the given match of the composite pattern.
    ///
    /// The rules are checked in order, the line-break rule first.
    pub(crate) fn owner(&self, captures: &Captures<'_>) -> Option<&CompiledRule<T>> {
        self.rules
            .iter()
            .find(|rule| captures.get(rule.group).is_some())
    }

    #[inline]
    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    #[inline]
    pub(crate) fn rules(&self) -> &[CompiledRule<T>] {
        &self.rules
    }

    #[inline]
    pub(crate) fn composite_pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl<T> fmt::Debug for CompiledRuleSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRuleSet")
            .field("rules", &self.rules)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

fn build_regex(
    pattern: &str,
    options: &LexerOptions,
) -> std::result::Result<Regex, fancy_regex::Error> {
    let mut builder = RegexBuilder::new(pattern);
    if let Some(limit) = options.backtrack_limit {
        builder.backtrack_limit(limit);
    }
    builder.build()
}
