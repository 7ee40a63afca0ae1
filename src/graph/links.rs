//! Join link types

use std::fmt;

/// A fully resolved, upper-cased `TABLE.FIELD` reference
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableRef {
    pub table: String,
    pub field: String,
}

impl TableRef {
    /// Build a reference, upper-casing both parts.
    pub fn new(table: &str, field: &str) -> Self {
        Self {
            table: table.trim().to_uppercase(),
            field: field.trim().to_uppercase(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.field)
    }
}

/// One inferred equi-join between two different tables.
///
/// Always canonical: `a.table < b.table`. Two links compare equal when both
/// endpoints do, so a `BTreeSet<Link>` deduplicates joins found in
/// different statements.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Link {
    pub a: TableRef,
    pub b: TableRef,
}

impl Link {
    /// Order the two sides by table name.
    ///
    /// Returns `None` when both sides are the same table: a self-join says
    /// nothing about how tables relate to each other.
    pub fn new(x: TableRef, y: TableRef) -> Option<Self> {
        match x.table.cmp(&y.table) {
            std::cmp::Ordering::Less => Some(Self { a: x, b: y }),
            std::cmp::Ordering::Greater => Some(Self { a: y, b: x }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.a, self.b)
    }
}
