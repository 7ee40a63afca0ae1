//! Heuristic SQL extraction from procedural source
//!
//! This is not a SQL parser. Statements are located and split with
//! quote- and paren-aware text scans, tolerant of partial or malformed code.

mod clauses;
mod scanner;
mod shield;
mod statements;

pub use clauses::{from_tables, resolve_links, where_equations, AliasMap, EquationCandidate};
pub use scanner::{find_balanced, find_end_of_statement, find_matching_paren, split_top_level};
pub use shield::{neutralize_string_literals, strip_comments};
pub use statements::extract_selects;
