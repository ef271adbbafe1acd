//! Turns the pattern of a rule into the pattern text that is compiled.
use std::borrow::Cow;

use crate::RulePattern;

/// Characters with a meaning in regex syntax outside of classes.
const METACHARACTERS: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$',
];

/// Escapes all regex metacharacters of the given text so that it matches literally.
pub(crate) fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if METACHARACTERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn entity(b: u8) -> Option<&'static str> {
    match b {
        b'&' => Some("&amp;"),
        b'<' => Some("&lt;"),
        b'>' => Some("&gt;"),
        _ => None,
    }
}

/// Replaces `&`, `<` and `>` in a pattern by their HTML entities.
///
/// Escaped occurrences are replaced including the backslash. The headers of named groups and
/// lookbehind assertions are kept.
pub(crate) fn escape_markup(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains(['&', '<', '>']) {
        return Cow::Borrowed(pattern);
    }
    let bytes = pattern.as_bytes();
    let mut result = String::with_capacity(pattern.len() + 8);
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes[i + 1..].starts_with(b"k<") => i = name_end(bytes, i + 3),
            b'\\' => match bytes.get(i + 1).copied().and_then(entity) {
                Some(replacement) => {
                    result.push_str(&pattern[copied..i]);
                    result.push_str(replacement);
                    i += 2;
                    copied = i;
                }
                None => i += 2,
            },
            b'(' => i = group_header_end(bytes, i),
            b => {
                if let Some(replacement) = entity(b) {
                    result.push_str(&pattern[copied..i]);
                    result.push_str(replacement);
                    copied = i + 1;
                }
                i += 1;
            }
        }
    }
    result.push_str(&pattern[copied..]);
    Cow::Owned(result)
}

/// Returns the index behind the header of the group that opens at `start`.
///
/// For `(?<=`, `(?<!`, `(?<name>` and `(?P<name>` the header includes the angle brackets, for
/// all other groups it is just the parenthesis.
fn group_header_end(bytes: &[u8], start: usize) -> usize {
    match &bytes[start + 1..] {
        [b'?', b'<', b'=' | b'!', ..] => start + 4,
        [b'?', b'<', ..] => name_end(bytes, start + 3),
        [b'?', b'P', b'<', ..] => name_end(bytes, start + 4),
        _ => start + 1,
    }
}

/// Returns the index behind the `>` that closes a group name starting at `name_start`.
fn name_end(bytes: &[u8], name_start: usize) -> usize {
    bytes[name_start..]
        .iter()
        .position(|b| *b == b'>')
        .map_or(bytes.len(), |p| name_start + p + 1)
}

/// Produces the pattern text of a rule before backreferences are renumbered.
pub(crate) fn normalize(pattern: &RulePattern, markup: bool) -> String {
    let text = match pattern {
        RulePattern::Literal(text) => Cow::Owned(escape_literal(text)),
        RulePattern::Regex(text) => Cow::Borrowed(text.as_str()),
    };
    if markup {
        escape_markup(&text).into_owned()
    } else {
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("(", r"\(")]
    #[case("a+b", r"a\+b")]
    #[case(r"C:\dir\*.rs", r"C:\\dir\\\*\.rs")]
    #[case("[x]{2}|^$?", r"\[x\]\{2\}\|\^\$\?")]
    #[case("plain äö", "plain äö")]
    fn test_escape_literal(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(escape_literal(text), expected);
        let regex = fancy_regex::Regex::new(&format!("^{}$", escape_literal(text))).unwrap();
        assert!(regex.is_match(text).unwrap());
    }

    #[rstest]
    #[case("a<b", "a&lt;b")]
    #[case("x>=y&&z", "x&gt;=y&amp;&amp;z")]
    #[case(r"\<tag\>", "&lt;tag&gt;")]
    #[case(r"\\<", r"\\&lt;")]
    #[case("(?<=a)<", "(?<=a)&lt;")]
    #[case("(?<!a)>", "(?<!a)&gt;")]
    #[case("(?<key>k)<(?P<v>v)", "(?<key>k)&lt;(?P<v>v)")]
    #[case(r"(?<q>['])\w+\k<q>", r"(?<q>['])\w+\k<q>")]
    #[case(r"(?<q>a)\k<q><", r"(?<q>a)\k<q>&lt;")]
    #[case("no markup", "no markup")]
    fn test_escape_markup(#[case] pattern: &str, #[case] expected: &str) {
        assert_eq!(escape_markup(pattern), expected);
    }

    #[test]
    fn test_normalize() {
        let literal = RulePattern::Literal("<(".to_string());
        assert_eq!(normalize(&literal, true), r"&lt;\(");
        assert_eq!(normalize(&literal, false), r"<\(");
        let regex = RulePattern::Regex(r"<\w+>".to_string());
        assert_eq!(normalize(&regex, true), r"&lt;\w+&gt;");
    }
}
