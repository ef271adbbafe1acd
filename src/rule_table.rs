//! Module with the JSON rule table loader.
use std::{io::Read, sync::Arc};

use log::debug;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    Callback, CallbackResult, LexError, Lexer, LexerOptions, Result, Rule, RuleCaptures, RuleId,
    RulePattern, ScanState,
};

/// Named callbacks that rules in a rule table can refer to.
pub struct CallbackRegistry<T> {
    callbacks: FxHashMap<String, Callback<T>>,
}

impl<T> CallbackRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            callbacks: FxHashMap::default(),
        }
    }

    /// Registers a callback under the given name. A previous callback with that name is replaced.
    pub fn register<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&RuleCaptures<'_>, &mut ScanState) -> CallbackResult<T> + Send + Sync + 'static,
    {
        self.register_shared(name, Arc::new(callback));
    }

    /// Registers a callback that may also be used elsewhere.
    pub fn register_shared(&mut self, name: impl Into<String>, callback: Callback<T>) {
        self.callbacks.insert(name.into(), callback);
    }

    /// Registers a callback and returns the registry, for chaining.
    pub fn with<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&RuleCaptures<'_>, &mut ScanState) -> CallbackResult<T> + Send + Sync + 'static,
    {
        self.register(name, callback);
        self
    }

    /// Get the callback registered under the given name.
    pub fn get(&self, name: &str) -> Option<&Callback<T>> {
        self.callbacks.get(name)
    }
}

impl<T> Default for CallbackRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for CallbackRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.callbacks.keys()).finish()
    }
}

/// Rules and options loaded from JSON.
///
/// A table is either an array of rules or an object with the keys `rules` and `options`.
/// A rule is an object with a `name` and either a literal `pattern` or a `regex`. The keys
/// `discard` (a boolean) and `callback` (the name of a registered callback) are optional.
///
/// ```json
/// {
///     "options": { "track_newlines": true },
///     "rules": [
///         { "name": "NUMBER", "regex": "\\d+", "callback": "number" },
///         { "name": "PLUS", "pattern": "+" },
///         { "name": "WS", "regex": "\\s+", "discard": true }
///     ]
/// }
/// ```
#[derive(Debug)]
pub struct RuleTable<T = String> {
    /// The rules in table order.
    pub rules: Vec<Rule<T>>,
    /// The options of the table, the defaults if the table has none.
    pub options: LexerOptions,
}

impl<T> RuleTable<T> {
    /// Parses a rule table from a JSON string.
    pub fn from_json_str(json: &str, callbacks: &CallbackRegistry<T>) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value, callbacks)
    }

    /// Reads a rule table from a reader that yields JSON.
    pub fn from_reader<R: Read>(mut reader: R, callbacks: &CallbackRegistry<T>) -> Result<Self> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        Self::from_json_str(&json, callbacks)
    }

    /// Builds a rule table from a parsed JSON value.
    pub fn from_value(value: &Value, callbacks: &CallbackRegistry<T>) -> Result<Self> {
        let (rules, options) = match value {
            Value::Array(rules) => (rules, LexerOptions::default()),
            Value::Object(table) => {
                let rules = match table.get("rules") {
                    Some(Value::Array(rules)) => rules,
                    _ => {
                        return Err(LexError::validation(
                            None,
                            "rule table must have a 'rules' array",
                        ))
                    }
                };
                let options = match table.get("options") {
                    None | Some(Value::Null) => LexerOptions::default(),
                    Some(options) => LexerOptions::deserialize(options)?,
                };
                (rules, options)
            }
            _ => {
                return Err(LexError::validation(
                    None,
                    "rule table must be an array or an object",
                ))
            }
        };
        let rules = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| parse_rule(index, rule, callbacks))
            .collect::<Result<Vec<_>>>()?;
        debug!("Loaded rule table with {} rules", rules.len());
        Ok(Self { rules, options })
    }

    /// Creates a lexer from the table. The rules are compiled on first use.
    pub fn into_lexer(self) -> Lexer<T> {
        Lexer::with_options(self.rules, self.options)
    }
}

fn parse_rule<T>(
    index: usize,
    value: &Value,
    callbacks: &CallbackRegistry<T>,
) -> Result<Rule<T>> {
    let by_index = || Some(RuleId::Index(index + 1));
    let Value::Object(fields) = value else {
        return Err(LexError::validation(by_index(), "rule must be an object"));
    };
    let name = match fields.get("name") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        _ => return Err(LexError::validation(by_index(), "rule has no name")),
    };
    let by_name = || Some(RuleId::Name(name.clone()));

    let pattern = match (non_null(fields, "pattern"), non_null(fields, "regex")) {
        (Some(Value::String(text)), None) if !text.is_empty() => {
            RulePattern::Literal(text.clone())
        }
        (None, Some(Value::String(regex))) if !regex.is_empty() => {
            RulePattern::Regex(regex.clone())
        }
        _ => {
            return Err(LexError::validation(
                by_name(),
                "pattern must be a non-empty string or a regular expression",
            ))
        }
    };
    let mut rule = Rule::new(name.clone(), pattern);

    match non_null(fields, "discard") {
        None => (),
        Some(Value::Bool(discard)) => rule.set_discard(*discard),
        Some(_) => {
            return Err(LexError::validation(by_name(), "discard must be a boolean"));
        }
    }

    match non_null(fields, "callback") {
        None => (),
        Some(Value::String(callback)) => match callbacks.get(callback) {
            Some(callback) => rule = rule.with_shared_callback(callback.clone()),
            None => {
                return Err(LexError::validation(
                    by_name(),
                    format!("callback is not invocable: no callback named '{}'", callback),
                ))
            }
        },
        Some(_) => {
            return Err(LexError::validation(by_name(), "callback is not invocable"));
        }
    }
    Ok(rule)
}

fn non_null<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::LexErrorKind;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn registry() -> CallbackRegistry<String> {
        CallbackRegistry::new().with("upper", |caps, _| Ok(Some(caps.as_str().to_uppercase())))
    }

    #[test]
    fn test_rule_table_object() {
        init();
        let table = RuleTable::from_json_str(
            r#"{
                "options": { "track_newlines": true },
                "rules": [
                    { "name": "WS", "regex": "\\s+", "discard": true },
                    { "name": "PLUS", "pattern": "+" },
                    { "name": "ID", "regex": "\\w+", "callback": "upper", "discard": null }
                ]
            }"#,
            &registry(),
        )
        .unwrap();
        assert!(table.options.track_newlines);
        assert!(table.rules[0].is_discarded());
        assert_eq!(table.rules[1].pattern(), &RulePattern::Literal("+".into()));
        assert!(table.rules[2].callback().is_some());

        let lexer = table.into_lexer();
        let tokens = lexer.lex("a +\nb").unwrap();
        let tokens = tokens
            .iter()
            .map(|t| (t.name(), t.content().as_str(), t.position().line))
            .collect::<Vec<_>>();
        assert_eq!(tokens, vec![("ID", "A", 1), ("PLUS", "+", 1), ("ID", "B", 2)]);
    }

    #[test]
    fn test_rule_table_array() {
        init();
        let table = RuleTable::from_reader(
            r#"[{ "name": "NUM", "regex": "\\d+" }]"#.as_bytes(),
            &registry(),
        )
        .unwrap();
        assert_eq!(table.rules.len(), 1);
        assert_eq!(table.options, LexerOptions::default());
    }

    #[rstest]
    #[case::not_an_object(r#"[1]"#, RuleId::Index(1))]
    #[case::missing_name(r#"[{ "name": "A", "regex": "a" }, { "regex": "b" }]"#, RuleId::Index(2))]
    #[case::empty_name(r#"[{ "name": "", "regex": "a" }]"#, RuleId::Index(1))]
    #[case::name_not_a_string(r#"[{ "name": 1, "regex": "a" }]"#, RuleId::Index(1))]
    #[case::missing_pattern(r#"[{ "name": "A" }]"#, RuleId::Name("A".into()))]
    #[case::empty_pattern(r#"[{ "name": "A", "pattern": "" }]"#, RuleId::Name("A".into()))]
    #[case::two_patterns(
        r#"[{ "name": "A", "pattern": "a", "regex": "a" }]"#,
        RuleId::Name("A".into())
    )]
    #[case::pattern_not_a_string(r#"[{ "name": "A", "regex": 42 }]"#, RuleId::Name("A".into()))]
    #[case::discard_not_a_bool(
        r#"[{ "name": "A", "regex": "a", "discard": "yes" }]"#,
        RuleId::Name("A".into())
    )]
    #[case::unknown_callback(
        r#"[{ "name": "A", "regex": "a", "callback": "lower" }]"#,
        RuleId::Name("A".into())
    )]
    #[case::callback_not_a_string(
        r#"[{ "name": "A", "regex": "a", "callback": true }]"#,
        RuleId::Name("A".into())
    )]
    fn test_invalid_rules(#[case] json: &str, #[case] expected: RuleId) {
        init();
        let err = RuleTable::from_json_str(json, &registry()).unwrap_err();
        assert!(matches!(err.kind(), LexErrorKind::Validation { .. }));
        assert_eq!(err.rule(), Some(expected));
    }

    #[rstest]
    #[case::not_json("[")]
    #[case::bad_options(r#"{ "rules": [], "options": { "escape": true } }"#)]
    fn test_invalid_json(#[case] json: &str) {
        let err = RuleTable::from_json_str(json, &registry()).unwrap_err();
        assert!(matches!(err.kind(), LexErrorKind::Json(_)));
    }

    #[test]
    fn test_invalid_table_shape() {
        let err = RuleTable::from_json_str(r#""rules""#, &registry()).unwrap_err();
        assert_eq!(err.rule(), None);
        let err = RuleTable::from_json_str(r#"{ "options": {} }"#, &registry()).unwrap_err();
        assert_eq!(err.to_string(), "rule table must have a 'rules' array");
    }
}
