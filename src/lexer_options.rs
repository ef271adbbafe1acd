#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options that change how rules are compiled and how positions are tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct LexerOptions {
    /// Replace `&`, `<` and `>` in rule patterns by their HTML entities. This lets rules match
    /// text that is HTML-escaped. Enabled by default.
    pub escape_markup: bool,
    /// Let newline characters in the input start a new line. By default only the HTML line-break
    /// rule advances the line number.
    pub track_newlines: bool,
    /// The backtrack limit of the regex engine. `None` keeps the engine's default.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub backtrack_limit: Option<usize>,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            escape_markup: true,
            track_newlines: false,
            backtrack_limit: None,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_options_deserialization() {
        let options: LexerOptions = serde_json::from_str(r#"{"track_newlines": true}"#).unwrap();
        assert_eq!(
            options,
            LexerOptions {
                escape_markup: true,
                track_newlines: true,
                backtrack_limit: None,
            }
        );
        assert!(serde_json::from_str::<LexerOptions>(r#"{"track_newline": true}"#).is_err());
    }
}
