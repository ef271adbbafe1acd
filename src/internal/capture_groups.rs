//! Capture group accounting on the source text of a rule pattern.
//!
//! Both functions scan the pattern text byte-wise. All syntax they look at is ASCII, so every
//! index where they split or copy the text is a char boundary.
use std::borrow::Cow;

/// Returns the byte index behind the bracketed class that starts at `start`.
///
/// A `]` directly behind the opening bracket (or behind `[^`) is a class member. Nested classes
/// as in `[[:alpha:]--[aeiou]]` are skipped as a whole. An unterminated class extends to the end
/// of the pattern.
pub(crate) fn class_end(pattern: &[u8], start: usize) -> usize {
    debug_assert_eq!(pattern.get(start), Some(&b'['));
    let skip_leading = |mut i: usize| {
        if pattern.get(i) == Some(&b'^') {
            i += 1;
        }
        if pattern.get(i) == Some(&b']') {
            i += 1;
        }
        i
    };
    let mut depth = 1;
    let mut i = skip_leading(start + 1);
    while i < pattern.len() {
        match pattern[i] {
            b'\\' => i += 2,
            b'[' => {
                depth += 1;
                i = skip_leading(i + 1);
            }
            b']' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => i += 1,
        }
    }
    pattern.len()
}

/// Checks whether the text behind an opening parenthesis makes it a capturing group.
fn opens_capture_group(rest: &[u8]) -> bool {
    match rest {
        // Named groups capture.
        [b'?', b'P', b'<', ..] => true,
        // Lookbehind.
        [b'?', b'<', b'=' | b'!', ..] => false,
        [b'?', b'<', ..] => true,
        // Non-capturing groups, lookahead, atomic groups and flag groups.
        [b'?', ..] => false,
        _ => true,
    }
}

/// Counts the capturing groups of a pattern.
///
/// Escaped characters and bracketed classes are skipped, non-capturing groups and lookaround
/// are not counted.
pub(crate) fn count_captures(pattern: &str) -> usize {
    let bytes = pattern.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'[' => i = class_end(bytes, i),
            b'(' => {
                if opens_capture_group(&bytes[i + 1..]) {
                    count += 1;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    count
}

/// Shifts the backreferences of a rule pattern to their group numbers in the composite pattern.
///
/// `offset` is the number of groups all preceding rules occupy, including their wrapping
/// groups. The rule's own wrapping group comes next, so `\N` becomes `\(N + offset + 1)`.
///
/// A `\N` that does not refer to one of the rule's `num_captures` groups is read as a legacy
/// octal escape and replaced by the equivalent `\x{..}` escape. Inside bracketed classes every
/// `\N` is such an escape.
pub(crate) fn renumber_backreferences(
    pattern: &str,
    num_captures: usize,
    offset: usize,
) -> Cow<'_, str> {
    let bytes = pattern.as_bytes();
    let mut result = String::new();
    let mut rewritten = false;
    let mut copied = 0;
    // The end of the class the cursor is in, 0 outside of classes.
    let mut class_until = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'[' if i >= class_until => {
                class_until = class_end(bytes, i);
                i += 1;
            }
            b'\\' => {
                let digits_start = i + 1;
                let digits_end = digits_start
                    + bytes[digits_start..]
                        .iter()
                        .take_while(|b| b.is_ascii_digit())
                        .count();
                if digits_end == digits_start {
                    i += 2;
                    continue;
                }
                result.push_str(&pattern[copied..i]);
                let digits = &pattern[digits_start..digits_end];
                match digits.parse::<usize>() {
                    Ok(n) if i >= class_until && (1..=num_captures).contains(&n) => {
                        result.push_str(&format!("\\{}", n + offset + 1));
                    }
                    _ => result.push_str(&octal_escape(digits)),
                }
                rewritten = true;
                copied = digits_end;
                i = digits_end;
            }
            _ => i += 1,
        }
    }
    if !rewritten {
        return Cow::Borrowed(pattern);
    }
    result.push_str(&pattern[copied..]);
    Cow::Owned(result)
}

/// Converts the digits of a `\N` escape into a hex escape of the octal value they start with.
/// Digits that are not part of the octal value stay literal digits.
fn octal_escape(digits: &str) -> String {
    let mut value: u32 = 0;
    let mut len = 0;
    for b in digits.bytes().take(3) {
        if !(b'0'..=b'7').contains(&b) {
            break;
        }
        let next = value * 8 + u32::from(b - b'0');
        if next > 0o377 {
            break;
        }
        value = next;
        len += 1;
    }
    if len == 0 {
        // `\8` and `\9` are identity escapes.
        return digits.to_string();
    }
    format!("\\x{{{:02X}}}{}", value, &digits[len..])
}
