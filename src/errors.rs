use thiserror::Error;

/// The result type for the `rxlex` crate.
pub type Result<T> = std::result::Result<T, LexError>;

/// The error type a rule callback may return.
/// It is wrapped into [LexErrorKind::Callback] together with the name of the rule.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// The error type for the `rxlex` crate.
#[derive(Error, Debug)]
pub struct LexError {
    /// The source of the error.
    pub source: Box<LexErrorKind>,
}

impl LexError {
    /// Create a new `LexError`.
    pub fn new(kind: LexErrorKind) -> Self {
        LexError {
            source: Box::new(kind),
        }
    }

    /// Create a validation error for the given rule.
    pub(crate) fn validation(rule: Option<RuleId>, message: impl Into<String>) -> Self {
        LexError::new(LexErrorKind::Validation {
            rule,
            message: message.into(),
        })
    }

    /// Get the error kind.
    #[inline]
    pub fn kind(&self) -> &LexErrorKind {
        &self.source
    }

    /// Returns the rule the error refers to, if any.
    pub fn rule(&self) -> Option<RuleId> {
        match self.kind() {
            LexErrorKind::Validation { rule, .. } => rule.clone(),
            LexErrorKind::RegexSyntax { rule, .. } | LexErrorKind::Callback { rule, .. } => {
                Some(RuleId::Name(rule.clone()))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Identifies a rule in error messages.
///
/// Before a rule's name has been validated it can only be referred to by its 1-based position
/// in the rule list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleId {
    /// The 1-based position of the rule in the rule list.
    Index(usize),
    /// The name of the rule.
    Name(String),
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleId::Index(index) => write!(f, "rule #{}", index),
            RuleId::Name(name) => write!(f, "rule '{}'", name),
        }
    }
}

fn rule_prefix(rule: &Option<RuleId>) -> String {
    rule.as_ref().map(|r| format!("{}: ", r)).unwrap_or_default()
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum LexErrorKind {
    /// A rule or the rule list is malformed.
    #[error("{}{message}", rule_prefix(.rule))]
    Validation {
        /// The offending rule, `None` if the rule list itself is malformed.
        rule: Option<RuleId>,
        /// A human readable reason.
        message: String,
    },

    /// The pattern of a single rule could not be parsed by the regex engine.
    #[error("rule '{rule}': {source}")]
    RegexSyntax {
        /// The name of the rule.
        rule: String,
        /// The error reported by the regex engine.
        source: fancy_regex::Error,
    },

    /// The composite pattern built from all rules could not be compiled.
    #[error("composite pattern: {0}")]
    CompositePattern(fancy_regex::Error),

    /// The regex engine gave up while scanning, e.g. because the backtrack limit was exceeded.
    #[error("matching failed: {0}")]
    Matching(fancy_regex::Error),

    /// A rule callback returned an error.
    #[error("callback of rule '{rule}' failed: {source}")]
    Callback {
        /// The name of the rule whose callback failed.
        rule: String,
        /// The error returned by the callback.
        source: CallbackError,
    },

    /// A std::io error occurred.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// A rule table could not be parsed as JSON.
    #[cfg(feature = "serde")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<std::io::Error> for LexError {
    fn from(error: std::io::Error) -> Self {
        LexError::new(LexErrorKind::IoError(error))
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for LexError {
    fn from(error: serde_json::Error) -> Self {
        LexError::new(LexErrorKind::Json(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = LexError::validation(None, "no rules provided");
        assert_eq!(err.to_string(), "no rules provided");
        assert_eq!(err.rule(), None);

        let err = LexError::validation(Some(RuleId::Index(3)), "rule has no name");
        assert_eq!(err.to_string(), "rule #3: rule has no name");
        assert_eq!(err.rule(), Some(RuleId::Index(3)));

        let err = LexError::validation(Some(RuleId::Name("NUM".into())), "pattern is empty");
        assert_eq!(err.to_string(), "rule 'NUM': pattern is empty");
    }

    #[test]
    fn test_callback_error_names_rule() {
        let err = LexError::new(LexErrorKind::Callback {
            rule: "NUM".to_string(),
            source: "not a number".into(),
        });
        assert_eq!(err.to_string(), "callback of rule 'NUM' failed: not a number");
        assert_eq!(err.rule(), Some(RuleId::Name("NUM".to_string())));
    }
}
