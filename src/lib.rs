#![forbid(missing_docs)]
//! # `rxlex`
//! The `rxlex` crate is a library that turns an ordered list of regex rules into a lexer.
//! Each rule has a name, a pattern and optionally a callback that turns a match into the content
//! of a token. All rules are compiled into one composite regular expression, so a scan walks the
//! input only once. The first rule that matches at a position wins.
//!
//! The patterns are handled by the `fancy-regex` crate, so rules may use backreferences and
//! lookaround. Backreferences keep their meaning inside the composite pattern, and a callback
//! sees the capturing groups of its own rule numbered as if the rule stood alone.
//!
//! Every lexer recognizes HTML line breaks (`<br>`, `<br/>`, `<BR />`) before any other rule.
//! They start a new line and produce no token.
//!
//! # Example
//! ```rust
//! use rxlex::{Lexer, Rule};
//!
//! let lexer: Lexer = Lexer::builder()
//!     .add_rule(Rule::literal("LPAREN", "("))
//!     .add_rule(Rule::literal("RPAREN", ")"))
//!     .add_rule(Rule::regex("WHITESPACE", r"\s+").discarded())
//!     .add_rule(Rule::regex("NUMBER", r"\d+"))
//!     .add_rule(Rule::regex("STRING", r#"(['"])(.*?)\1"#).with_callback(|caps, _| {
//!         Ok(caps.get(2).map(str::to_string))
//!     }))
//!     .add_rule(Rule::regex("SYMBOL", r"\w+|."))
//!     .build()
//!     .expect("LexerBuilder error");
//!
//! for token in lexer.lex("(print 'hello' 42)<br>(exit)").unwrap() {
//!     println!("{}", token);
//! }
//! ```
//! The output of the example is:
//! ```text
//! LPAREN(() at 1:1
//! SYMBOL(print) at 1:2
//! STRING(hello) at 1:8
//! NUMBER(42) at 1:16
//! RPAREN()) at 1:18
//! LPAREN(() at 2:1
//! SYMBOL(exit) at 2:2
//! RPAREN()) at 2:6
//! ```
//!
//! # Crate features
//! - `serde`: Enabled by default. Adds serialization of tokens and positions and the
//!   [RuleTable] loader that reads rules from JSON.

/// Module with the captures handed to rule callbacks
mod captures;
pub use captures::RuleCaptures;

/// Module with error definitions
mod errors;
pub use errors::{CallbackError, LexError, LexErrorKind, Result, RuleId};

/// The module with internal implementation details.
mod internal;
pub use internal::CompiledRule;

/// The module with the lexer.
mod lexer;
pub use lexer::Lexer;

/// The module with the lexer builder.
mod lexer_builder;
pub use lexer_builder::LexerBuilder;

/// The module with the lexer options.
mod lexer_options;
pub use lexer_options::LexerOptions;

/// Module that provides a position type
mod position;
pub use position::Position;

/// Module with the rule types and the built-in rules
mod rule;
pub use rule::{
    default_rules, Callback, CallbackResult, Rule, RulePattern, HTML_BREAK, HTML_BREAK_PATTERN,
    WHITESPACE, WORD,
};

#[cfg(feature = "serde")]
mod rule_table;
#[cfg(feature = "serde")]
pub use rule_table::{CallbackRegistry, RuleTable};

/// Module with the state of a running scan
mod scan_state;
pub use scan_state::ScanState;

/// Module that provides a Span type
mod span;
pub use span::Span;

/// Module with the token types
mod token;
pub use token::{ScanOutput, SkippedText, Token};

/// Module that provides the Tokens iterator
mod tokens;
pub use tokens::Tokens;
