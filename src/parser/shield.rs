//! Length-preserving text shields for procedural SQL
//!
//! Both transforms keep every byte offset and line break of the input, so
//! positions found in shielded text are valid in the original and in each
//! other. Unterminated comments and literals run to end of input.

/// Scanner state for [`strip_comments`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentState {
    Code,
    Literal,
    LineComment,
    BlockComment,
}

/// Replace the interior of every single-quoted literal with `_`.
///
/// The quotes themselves stay in place. A doubled quote (`''`) inside a
/// literal closes and reopens it, which leaves quote parity unchanged.
pub fn neutralize_string_literals(code: &str) -> String {
    let mut result = String::with_capacity(code.len());
    let mut in_literal = false;

    for c in code.chars() {
        if c == '\'' {
            in_literal = !in_literal;
            result.push(c);
        } else if in_literal {
            push_filler(&mut result, c, '_');
        } else {
            result.push(c);
        }
    }

    result
}

/// Blank out `--` line comments and `/* */` block comments.
///
/// Comment text becomes spaces while newlines and carriage returns stay
/// where they were. Comment openers inside a string literal are literal text.
pub fn strip_comments(code: &str) -> String {
    let mut result = String::with_capacity(code.len());
    let mut chars = code.chars().peekable();
    let mut state = CommentState::Code;

    while let Some(c) = chars.next() {
        match state {
            CommentState::Code => match c {
                '\'' => {
                    state = CommentState::Literal;
                    result.push(c);
                }
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    result.push_str("  ");
                    state = CommentState::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    result.push_str("  ");
                    state = CommentState::BlockComment;
                }
                _ => result.push(c),
            },
            CommentState::Literal => {
                if c == '\'' {
                    state = CommentState::Code;
                }
                result.push(c);
            }
            CommentState::LineComment => {
                if c == '\n' {
                    state = CommentState::Code;
                }
                push_filler(&mut result, c, ' ');
            }
            CommentState::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    result.push_str("  ");
                    state = CommentState::Code;
                } else {
                    push_filler(&mut result, c, ' ');
                }
            }
        }
    }

    result
}

/// Push `fill` once per UTF-8 byte of `c`, keeping line breaks as they are.
fn push_filler(out: &mut String, c: char, fill: char) {
    if fill == ' ' && (c == '\n' || c == '\r') {
        out.push(c);
        return;
    }
    for _ in 0..c.len_utf8() {
        out.push(fill);
    }
}
