//! Link inference over a whole catalog

use std::collections::{BTreeSet, HashSet};

use rayon::prelude::*;
use tracing::{debug, info};

use super::links::Link;
use crate::catalog::SourceUnit;
use crate::parser::{extract_selects, resolve_links};

/// Minimum number of source units to trigger parallel scanning.
/// Below this threshold, sequential processing is faster due to rayon overhead.
const PARALLEL_THRESHOLD: usize = 8;

/// The inferred relationship graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinGraph {
    /// Deduplicated links whose tables are both known
    pub links: BTreeSet<Link>,
    /// Tables that take part in at least one link
    pub used_tables: BTreeSet<String>,
}

impl JoinGraph {
    /// Add a link if both of its tables are in `known_tables`.
    fn insert(&mut self, link: Link, known_tables: &HashSet<String>) {
        for table in [&link.a.table, &link.b.table] {
            if !known_tables.contains(table) {
                info!(%table, %link, "not a table name, skipping link");
                return;
            }
        }
        self.used_tables.insert(link.a.table.clone());
        self.used_tables.insert(link.b.table.clone());
        self.links.insert(link);
    }
}

/// Links found in the SELECT statements of one source unit
pub fn source_links(source: &SourceUnit) -> BTreeSet<Link> {
    let selects = extract_selects(&source.code);
    let links: BTreeSet<Link> = selects.iter().flat_map(|s| resolve_links(s)).collect();
    debug!(
        source = %source.name,
        kind = %source.kind,
        statements = selects.len(),
        links = links.len(),
        "scanned source"
    );
    links
}

/// Infer the join graph of `sources`, keeping only links between known tables.
///
/// Table names are compared upper-cased. Source units are scanned
/// independently and their results merged afterwards, so the outcome does
/// not depend on scan order.
pub fn infer_links(sources: &[SourceUnit], known_tables: &HashSet<String>) -> JoinGraph {
    let known: HashSet<String> = known_tables.iter().map(|t| t.to_uppercase()).collect();

    let per_source: Vec<BTreeSet<Link>> = if sources.len() >= PARALLEL_THRESHOLD {
        sources.par_iter().map(source_links).collect()
    } else {
        sources.iter().map(source_links).collect()
    };

    let mut graph = JoinGraph::default();
    for link in per_source.into_iter().flatten() {
        graph.insert(link, &known);
    }

    info!(
        sources = sources.len(),
        links = graph.links.len(),
        tables = graph.used_tables.len(),
        "inferred join graph"
    );
    graph
}
