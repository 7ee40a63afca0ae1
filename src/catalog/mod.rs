//! Schema and source metadata
//!
//! The serialized field names follow the `tables.json` / `sources.json`
//! interchange format, so archives written by earlier exports load as is.

mod archive;
mod loader;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use archive::{read_archive, write_archive, SOURCES_ENTRY, TABLES_ENTRY};
pub use loader::{load_sources_dir, load_tables, DEFAULT_SOURCE_PATTERN};

/// A table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Field {
    pub name: String,
    /// Column data type (e.g., "VARCHAR2", "NUMBER")
    #[serde(rename = "Type")]
    pub data_type: String,
    #[serde(default)]
    pub comment: String,
}

/// A table with its columns, in column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// One named chunk of procedural source, such as a package body or a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceUnit {
    pub name: String,
    /// Object kind (e.g., "PACKAGE BODY", "PROCEDURE")
    #[serde(rename = "Type")]
    pub kind: String,
    pub code: String,
}

/// Everything the link inference needs: known tables and the source to scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub tables: Vec<Table>,
    pub sources: Vec<SourceUnit>,
}

impl Catalog {
    /// Upper-cased names of all known tables
    pub fn table_names(&self) -> HashSet<String> {
        self.tables.iter().map(|t| t.name.to_uppercase()).collect()
    }
}
