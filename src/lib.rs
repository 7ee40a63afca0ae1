//! rust-dbgraph: table relationship graphs from stored procedure source
//!
//! This library scans the SELECT statements embedded in procedures, packages
//! and views, infers which tables are joined on which columns, and renders
//! the result as a Graphviz DOT graph.

pub mod catalog;
pub mod error;
pub mod graph;
pub mod parser;
pub mod render;
pub mod util;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

pub use error::DbGraphError;

use catalog::Catalog;
use graph::JoinGraph;
use render::DotStyle;

/// Where the catalog metadata comes from
#[derive(Debug, Clone)]
pub enum InputSource {
    /// A ZIP archive with `tables.json` and `sources.json`
    Archive(PathBuf),
    /// A `tables.json` export plus a directory of source files
    Files {
        tables: PathBuf,
        sources_dir: PathBuf,
        /// File name patterns for source files (defaults to `*.sql`)
        patterns: Vec<String>,
    },
}

/// Options for building a graph
#[derive(Debug, Clone)]
pub struct GraphOptions {
    /// Catalog input
    pub input: InputSource,
    /// Output path for the DOT file (defaults to stdout)
    pub output_path: Option<PathBuf>,
    /// Also save the loaded catalog as an archive here
    pub save_archive: Option<PathBuf>,
    /// Node label style
    pub style: DotStyle,
}

/// Load the catalog described by `input`
pub fn load_catalog(input: &InputSource) -> Result<Catalog> {
    match input {
        InputSource::Archive(path) => {
            info!(path = %path.display(), "loading archive");
            catalog::read_archive(path)
        }
        InputSource::Files {
            tables,
            sources_dir,
            patterns,
        } => Ok(Catalog {
            tables: catalog::load_tables(tables)?,
            sources: catalog::load_sources_dir(sources_dir, patterns)?,
        }),
    }
}

/// Build the join graph and write it as DOT
pub fn build_graph(options: GraphOptions) -> Result<JoinGraph> {
    // Step 1: Load tables and source units
    let catalog = load_catalog(&options.input)?;

    // Step 2: Save the archive (if requested)
    if let Some(archive_path) = &options.save_archive {
        catalog::write_archive(&catalog, archive_path)?;
    }

    // Step 3: Infer links between known tables
    let graph = graph::infer_links(&catalog.sources, &catalog.table_names());

    // Step 4: Render
    match &options.output_path {
        Some(path) => {
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
            render::write_dot(file, &catalog.tables, &graph, options.style)?;
            info!(path = %path.display(), "wrote graph");
        }
        None => {
            render::write_dot(std::io::stdout().lock(), &catalog.tables, &graph, options.style)?;
        }
    }

    Ok(graph)
}

/// Bundle a `tables.json` export and a source directory into an archive
pub fn pack_archive(
    tables: &Path,
    sources_dir: &Path,
    patterns: &[String],
    output: &Path,
) -> Result<Catalog> {
    let catalog = load_catalog(&InputSource::Files {
        tables: tables.to_path_buf(),
        sources_dir: sources_dir.to_path_buf(),
        patterns: patterns.to_vec(),
    })?;
    catalog::write_archive(&catalog, output)?;
    Ok(catalog)
}
