//! FROM / WHERE resolution for a single SELECT statement
//!
//! The FROM clause gives an alias map, the WHERE clause gives pairs of
//! qualified fields compared with `=` or `LIKE`. Resolving both sides of a
//! pair through the alias map yields a join link.
//!
//! Pairing is positional: every qualified field is paired with the next one
//! in the text. In `WHERE A.x = 1 AND B.y = C.z` this also pairs `A.x` with
//! `B.y`, because the text between them contains `=`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use super::scanner::{find_balanced, split_top_level};
use super::shield::neutralize_string_literals;
use crate::graph::{Link, TableRef};
use crate::util::contains_ci;

/// Alias (upper-case) to table name as written in the FROM clause
pub type AliasMap = BTreeMap<String, String>;

/// A pair of raw `alias.field` references from a WHERE clause
pub type EquationCandidate = (String, String);

static FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[[:space:]]FROM[[:space:]]").unwrap());

static WHERE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[[:space:]]WHERE[[:space:]]").unwrap());

/// Resolve the cross-table joins expressed in one SELECT statement.
pub fn resolve_links(select: &str) -> BTreeSet<Link> {
    let mut links = BTreeSet::new();

    // Literal contents can never hold a join, keep them out of every scan
    let select = neutralize_string_literals(select);

    let Some(from) = find_balanced(&select, &FROM_RE) else {
        debug!(statement = %select, "cannot find FROM");
        return links;
    };
    let after_from = &select[from.end..];

    let Some(where_) = find_balanced(after_from, &WHERE_RE) else {
        debug!(statement = %select, "cannot find WHERE");
        return links;
    };
    let from_clause = &after_from[..where_.start];
    let where_clause = &after_from[where_.end..];

    let aliases = from_tables(from_clause);
    trace!(?aliases, "FROM tables");

    let equations = where_equations(where_clause, &aliases);
    if equations.is_empty() {
        debug!(where_clause, "no equations");
        return links;
    }

    for (left, right) in &equations {
        let (Some(x), Some(y)) = (
            resolve_field(left, &aliases),
            resolve_field(right, &aliases),
        ) else {
            continue;
        };
        if let Some(link) = Link::new(x, y) {
            links.insert(link);
        }
    }

    links
}

/// Build the alias map of a FROM clause.
///
/// Entries are split on top-level commas. Entries containing parens are
/// subqueries and cannot be resolved to a table, so they are skipped. An
/// entry is `table alias`, `table AS alias`, or a bare table name that acts
/// as its own alias.
pub fn from_tables(from: &str) -> AliasMap {
    let mut tables = AliasMap::new();

    for part in split_top_level(from) {
        let part = part.trim();
        if part.is_empty() || part.contains(|c| c == '(' || c == ')') {
            continue;
        }

        match part.rfind(char::is_whitespace) {
            Some(i) => {
                let alias = part[i..].trim_start();
                let table = strip_alias_keyword(part[..i].trim_end());
                tables.insert(alias.to_uppercase(), table.to_string());
            }
            None => {
                tables.insert(part.to_uppercase(), part.to_string());
            }
        }
    }

    tables
}

/// Find `alias.field` pairs compared with `=` or `LIKE` in a WHERE clause.
///
/// Only references through a known alias are considered.
pub fn where_equations(where_clause: &str, aliases: &AliasMap) -> Vec<EquationCandidate> {
    if aliases.is_empty() {
        return Vec::new();
    }

    // `\b` only fits in front of aliases that start with a word character;
    // a quoted alias such as `"E"` starts with punctuation
    let alternatives = aliases
        .keys()
        .map(|alias| {
            let boundary = if alias.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
                r"\b"
            } else {
                ""
            };
            format!("{}{}", boundary, regex::escape(alias))
        })
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?i)(?:{})\.[A-Za-z][A-Za-z0-9_]*\b", alternatives);
    let field_re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            debug!(%pattern, error = %e, "cannot build field pattern");
            return Vec::new();
        }
    };

    let fields: Vec<_> = field_re.find_iter(where_clause).collect();
    if fields.is_empty() {
        debug!(where_clause, "cannot find fields");
        return Vec::new();
    }

    fields
        .windows(2)
        .filter_map(|pair| {
            let between = &where_clause[pair[0].end()..pair[1].start()];
            if between.contains('=') || contains_ci(between, "LIKE") {
                Some((pair[0].as_str().to_string(), pair[1].as_str().to_string()))
            } else {
                trace!(between, "no comparison between fields");
                None
            }
        })
        .collect()
}

/// Resolve `alias.field` through the alias map.
fn resolve_field(raw: &str, aliases: &AliasMap) -> Option<TableRef> {
    let (alias, field) = raw.rsplit_once('.')?;
    match aliases.get(&alias.to_uppercase()) {
        Some(table) => Some(TableRef::new(table, field)),
        None => {
            debug!(field = raw, "cannot find table for field");
            None
        }
    }
}

/// Drop a trailing `AS` from `table AS alias` entries.
fn strip_alias_keyword(table: &str) -> &str {
    match table.rsplit_once(char::is_whitespace) {
        Some((name, keyword)) if keyword.eq_ignore_ascii_case("AS") => name.trim_end(),
        _ => table,
    }
}
