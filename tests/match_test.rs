/// This file contains a table of match tests to verify that single rules behave inside the
/// composite pattern like they do on their own.
use rxlex::{LexErrorKind, Lexer, Rule};

/// Test data for the match tests.
/// The test data consists of a pattern, an input string, the expected matches, and an optional error
/// message.
#[derive(Debug)]
struct TestData {
    pattern: &'static str,
    input: &'static str,
    expected: &'static [(&'static str, usize, usize)],
    error_msg: Option<&'static str>,
}

// A macros to easily create a TestData struct.

// Valid pattern, input, and expected matches.
macro_rules! td {
    ($pattern:expr, $input:expr, $expected:expr) => {
        TestData {
            pattern: $pattern,
            input: $input,
            expected: $expected,
            error_msg: None,
        }
    };
}

// Rejected rule and a part of the expected error message.
macro_rules! tu {
    ($pattern:expr, $result:expr) => {
        TestData {
            pattern: $pattern,
            input: "",
            expected: &[],
            error_msg: Some($result),
        }
    };
}

// Pattern that causes a regex parse error
macro_rules! tr {
    ($pattern:expr) => {
        TestData {
            pattern: $pattern,
            input: "",
            expected: &[],
            error_msg: Some("regex parse error"),
        }
    };
}

const TEST_DATA: &[TestData] = &[
    td!("a", "aXa", &[("a", 0, 1), ("a", 2, 3)]),
    td!(r"\d+", "12 345", &[("12", 0, 2), ("345", 3, 6)]),
    td!("é+", "ééa", &[("éé", 0, 4)]),
    td!(r"(?i)abc", "ABC abc", &[("ABC", 0, 3), ("abc", 4, 7)]),
    td!(r"(a)(b)\2\1", "abba abab", &[("abba", 0, 4)]),
    td!(r"(?P<x>a)(?P=x)", "aaa", &[("aa", 0, 2)]),
    td!(r"(?<q>['])\w+\k<q>", "'ab' 'c", &[("'ab'", 0, 4)]),
    td!(r"(a)\2", "a\u{2}a", &[("a\u{2}", 0, 2)]),
    td!(r"(a)[\1b]+", "a\u{1}bc", &[("a\u{1}b", 0, 3)]),
    td!(r"(?<=\$)\d+", "$12 34", &[("12", 1, 3)]),
    td!(r"\w+(?=!)", "hey! you", &[("hey", 0, 3)]),
    td!(r"(?:ab)+", "ababa", &[("abab", 0, 4)]),
    td!(r"[(]+", "((a", &[("((", 0, 2)]),
    td!(r"x*", "ab", &[]),
    td!(r"x*", "", &[]),
    td!(r"\w+", "a<br>b", &[("a", 0, 1), ("b", 5, 6)]),
    tr!("(a"),
    tr!("[a"),
    tu!("", "pattern must be a non-empty string or a regular expression"),
];

#[test]
fn test_matches() {
    let _ = env_logger::builder().is_test(true).try_init();
    for (index, test) in TEST_DATA.iter().enumerate() {
        let lexer: Lexer = Lexer::new(vec![Rule::regex("RULE", test.pattern)]);
        match lexer.compile() {
            Ok(()) => {
                assert!(
                    test.error_msg.is_none(),
                    "#{index}: expected an error for pattern {:?}",
                    test.pattern
                );
            }
            Err(err) => {
                let expected = test.error_msg.unwrap_or_else(|| {
                    panic!("#{index}: unexpected error for {:?}: {err}", test.pattern)
                });
                if expected == "regex parse error" {
                    assert!(
                        matches!(err.kind(), LexErrorKind::RegexSyntax { .. }),
                        "#{index}: {err}"
                    );
                } else {
                    assert!(err.to_string().contains(expected), "#{index}: {err}");
                }
                continue;
            }
        }

        let matches = lexer
            .lex(test.input)
            .unwrap()
            .into_iter()
            .map(|t| (t.content, t.span.start, t.span.end))
            .collect::<Vec<_>>();
        let expected = test
            .expected
            .iter()
            .map(|(s, start, end)| (s.to_string(), *start, *end))
            .collect::<Vec<_>>();
        assert_eq!(matches, expected, "#{index}: pattern {:?}", test.pattern);
    }
}

#[test]
fn test_group_numbering_is_local() {
    let _ = env_logger::builder().is_test(true).try_init();
    let lexer: Lexer = Lexer::new(vec![
        Rule::regex("DATE", r"(\d{4})-(\d\d)-(\d\d)")
            .with_callback(|caps, _| Ok(Some(format!("{}/{}/{}", &caps[3], &caps[2], &caps[1])))),
        Rule::regex("PAIR", r"(\w)(\w)\2\1")
            .with_callback(|caps, _| Ok(Some(format!("{}{}", &caps[1], &caps[2])))),
        Rule::regex("ANY", r"(.)").with_callback(|caps, _| {
            assert_eq!(caps.len(), 2);
            Ok(None)
        }),
    ]);
    let tokens = lexer
        .lex("2024-01-31 otto")
        .unwrap()
        .into_iter()
        .map(|t| (t.name, t.content))
        .collect::<Vec<_>>();
    assert_eq!(
        tokens,
        vec![
            ("DATE".to_string(), "31/01/2024".to_string()),
            ("PAIR".to_string(), "ot".to_string()),
        ]
    );
}

#[test]
fn test_tokens_iterator() {
    let lexer: Lexer = Lexer::new(vec![Rule::regex("NUM", r"\d+")]);
    let mut tokens = lexer.tokens("1 2 x").unwrap();
    assert_eq!(tokens.next().unwrap().unwrap().content, "1");
    assert_eq!(tokens.position().column, 2);
    assert_eq!(tokens.next().unwrap().unwrap().content, "2");
    assert_eq!(tokens.skipped().len(), 1);
    assert!(tokens.next().is_none());
    assert_eq!(tokens.skipped().len(), 2);
    assert_eq!(tokens.skipped()[1].text, " x");
}
