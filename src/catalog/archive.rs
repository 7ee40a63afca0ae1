//! ZIP archive of catalog metadata
//!
//! An archive holds two JSON entries, `tables.json` and `sources.json`. It
//! lets a schema exported once be re-rendered without database access.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use super::Catalog;
use crate::error::DbGraphError;

/// Archive entry holding the table list
pub const TABLES_ENTRY: &str = "tables.json";

/// Archive entry holding the source units
pub const SOURCES_ENTRY: &str = "sources.json";

/// Read a catalog from a ZIP archive.
///
/// Entries other than `tables.json` and `sources.json` are ignored. A
/// missing entry yields an empty list.
pub fn read_archive(path: &Path) -> Result<Catalog> {
    let file = File::open(path).map_err(|e| DbGraphError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut archive = ZipArchive::new(file).map_err(|e| DbGraphError::ZipError {
        message: format!("Failed to read archive {}: {}", path.display(), e),
    })?;

    let tables = read_json_entry(&mut archive, path, TABLES_ENTRY)?;
    info!(count = tables.len(), "read tables");

    let sources = read_json_entry(&mut archive, path, SOURCES_ENTRY)?;
    info!(count = sources.len(), "read sources");

    Ok(Catalog { tables, sources })
}

/// Write a catalog to a ZIP archive, creating parent directories as needed.
pub fn write_archive(catalog: &Catalog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DbGraphError::FileWriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let file = File::create(path).map_err(|e| DbGraphError::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    write_json_entry(&mut zip, options, TABLES_ENTRY, &catalog.tables)?;
    write_json_entry(&mut zip, options, SOURCES_ENTRY, &catalog.sources)?;

    zip.finish().map_err(DbGraphError::from)?;

    info!(
        path = %path.display(),
        tables = catalog.tables.len(),
        sources = catalog.sources.len(),
        "saved archive"
    );
    Ok(())
}

fn read_json_entry<T, R>(archive: &mut ZipArchive<R>, path: &Path, name: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read + Seek,
{
    let entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            warn!(archive = %path.display(), entry = name, "archive entry missing");
            return Ok(Vec::new());
        }
        Err(e) => return Err(DbGraphError::from(e).into()),
    };

    let items = serde_json::from_reader(BufReader::new(entry)).map_err(|e| {
        DbGraphError::JsonDecodeError {
            path: path.to_path_buf(),
            name: name.to_string(),
            source: e,
        }
    })?;
    Ok(items)
}

fn write_json_entry<W, T>(
    zip: &mut ZipWriter<W>,
    options: SimpleFileOptions,
    name: &str,
    items: &T,
) -> Result<()>
where
    W: std::io::Write + Seek,
    T: Serialize + ?Sized,
{
    zip.start_file(name, options).map_err(DbGraphError::from)?;
    serde_json::to_writer(&mut *zip, items).map_err(|e| DbGraphError::JsonEncodeError {
        name: name.to_string(),
        source: e,
    })?;
    Ok(())
}
