//! Catalog loading from plain files
//!
//! Tables come from a `tables.json` export, procedural source from a
//! directory of script files (one source unit per file).

use std::path::{Path, PathBuf};

use anyhow::Result;
use encoding_rs::WINDOWS_1252;
use glob::{MatchOptions, Pattern};
use tracing::{debug, info};

use super::{SourceUnit, Table};
use crate::error::DbGraphError;

/// File name pattern used when no pattern is given
pub const DEFAULT_SOURCE_PATTERN: &str = "*.sql";

/// Read a `tables.json` export.
pub fn load_tables(path: &Path) -> Result<Vec<Table>> {
    let content = std::fs::read_to_string(path).map_err(|e| DbGraphError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let tables: Vec<Table> =
        serde_json::from_str(&content).map_err(|e| DbGraphError::JsonDecodeError {
            path: path.to_path_buf(),
            name: "tables".to_string(),
            source: e,
        })?;

    info!(count = tables.len(), "read tables");
    Ok(tables)
}

/// Load every file under `dir` whose name matches one of `patterns`.
///
/// File names are matched case-insensitively. Each file becomes one source
/// unit named after its upper-cased stem, with the upper-cased extension as
/// its kind. Units are returned in path order.
pub fn load_sources_dir(dir: &Path, patterns: &[String]) -> Result<Vec<SourceUnit>> {
    if !dir.is_dir() {
        return Err(DbGraphError::SourceDirNotFound {
            path: dir.to_path_buf(),
        }
        .into());
    }

    let matchers = compile_patterns(patterns)?;
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            matchers.iter().any(|m| m.matches_with(&name, options))
        })
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    let sources = paths
        .iter()
        .map(|path| read_source(path))
        .collect::<Result<Vec<_>>>()?;

    info!(count = sources.len(), dir = %dir.display(), "read sources");
    Ok(sources)
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    if patterns.is_empty() {
        return Ok(vec![Pattern::new(DEFAULT_SOURCE_PATTERN)?]);
    }

    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                DbGraphError::InvalidPattern {
                    pattern: p.clone(),
                    message: e.msg.to_string(),
                }
                .into()
            })
        })
        .collect()
}

fn read_source(path: &Path) -> Result<SourceUnit> {
    let content = read_file_with_encoding_fallback(path)?;
    // Strip UTF-8 BOM if present
    let code = content
        .strip_prefix('\u{FEFF}')
        .unwrap_or(&content)
        .to_string();

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_default();
    let kind = path
        .extension()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_default();

    debug!(path = %path.display(), %name, %kind, bytes = code.len(), "loaded source");
    Ok(SourceUnit { name, kind, code })
}

/// Read a file as a string, trying UTF-8 first, then Windows-1252 as fallback
fn read_file_with_encoding_fallback(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| DbGraphError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            // Scripts exported on Windows are often in the ANSI code page
            let bytes = e.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(DbGraphError::InvalidEncoding {
                    path: path.to_path_buf(),
                }
                .into())
            } else {
                Ok(decoded.into_owned())
            }
        }
    }
}
