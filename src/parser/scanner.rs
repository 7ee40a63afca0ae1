//! Quote- and paren-aware search primitives
//!
//! These are the only routines that understand nesting. Everything above
//! them (statement extraction, clause splitting) goes through here so that
//! a match inside a string literal or an extra open paren is never reported.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::shield::neutralize_string_literals;

/// Top-level list separator for FROM clauses
static COMMA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(",").unwrap());

/// Find the first match of `pattern` that sits at paren depth zero.
///
/// Depth is the number of `(` minus the number of `)` before the match,
/// counted over the text with string literal contents neutralized. Only a
/// depth of exactly zero is accepted, so a stray `)` before the match
/// (negative depth) rejects it as well. Returns the byte range of the
/// accepted match.
pub fn find_balanced(code: &str, pattern: &Regex) -> Option<Range<usize>> {
    let shielded = neutralize_string_literals(code);
    let bytes = shielded.as_bytes();
    let mut depth: i64 = 0;
    let mut counted = 0;
    let mut pos = 0;

    loop {
        let found = pattern.find_at(&shielded, pos)?;
        depth += paren_balance(&bytes[counted..found.start()]);
        counted = found.start();
        if depth == 0 {
            return Some(found.range());
        }
        // Retry one character further so overlapping candidates are not skipped
        pos = found.start()
            + shielded[found.start()..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
        if pos > shielded.len() {
            return None;
        }
    }
}

/// Find the first `;` that is not inside a single-quoted literal.
///
/// A candidate is accepted when the number of `'` before it is even.
pub fn find_end_of_statement(code: &str) -> Option<usize> {
    let mut quotes = 0usize;
    for (i, b) in code.bytes().enumerate() {
        match b {
            b'\'' => quotes += 1,
            b';' if quotes % 2 == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Find the `)` matching the `(` that `code` starts with.
pub fn find_matching_paren(code: &str) -> Option<usize> {
    let shielded = neutralize_string_literals(code);
    let mut depth: i64 = 0;
    for (i, b) in shielded.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split `code` on commas at paren depth zero.
pub fn split_top_level(code: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = code;
    while let Some(sep) = find_balanced(rest, &COMMA_RE) {
        parts.push(&rest[..sep.start]);
        rest = &rest[sep.end..];
    }
    parts.push(rest);
    parts
}

fn paren_balance(bytes: &[u8]) -> i64 {
    bytes.iter().fold(0, |acc, b| match b {
        b'(' => acc + 1,
        b')' => acc - 1,
        _ => acc,
    })
}
