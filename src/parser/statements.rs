//! SELECT statement extraction from procedural source
//!
//! Two statement shapes are recognized:
//!
//! - plain statements, terminated by the first unquoted `;`
//! - cursor loops (`FOR rec IN (SELECT ...)`), terminated by the paren that
//!   closes the cursor's opening `(`
//!
//! A `SELECT` directly after `(` is a subquery of something else and does not
//! start a statement on its own.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{trace, warn};

use super::scanner::{find_end_of_statement, find_matching_paren};
use super::shield::strip_comments;

/// Statement opener: a cursor `FOR ... IN (` or a non-`(` boundary, then SELECT
static SELECT_OPENER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\bFOR\s+\S+\s+IN\s*(?P<open>\()\s*|(?:^|[^(\w])\s*)(?P<keyword>SELECT)\s",
    )
    .unwrap()
});

/// Extract every SELECT statement from `code`.
///
/// Comments are blanked in the returned text but keep their footprint, so
/// line and column positions match the input. The statement text starts at
/// the `SELECT` keyword and excludes its terminator. Extraction stops at the
/// first statement without a terminator; statements found before it are kept.
pub fn extract_selects(code: &str) -> Vec<String> {
    let code = strip_comments(code);
    let mut selects = Vec::new();
    let mut pos = 0;

    while let Some(caps) = SELECT_OPENER_RE.captures_at(&code, pos) {
        let Some(keyword) = caps.name("keyword") else {
            break;
        };
        let start = keyword.start();

        let end = match caps.name("open") {
            Some(open) => {
                find_matching_paren(&code[open.start()..]).map(|close| open.start() + close)
            }
            None => find_end_of_statement(&code[start..]).map(|semi| start + semi),
        };

        let Some(end) = end else {
            warn!(
                offset = start,
                cursor = caps.name("open").is_some(),
                "cannot find end of SELECT statement"
            );
            break;
        };

        trace!(start, end, "extracted SELECT statement");
        selects.push(code[start..end].to_string());

        // The terminator itself is a valid boundary for the next opener
        pos = end;
    }

    selects
}
