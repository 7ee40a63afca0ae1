//! Graphviz DOT output for the join graph
//!
//! Tables become record (or HTML-like table) nodes with one port per
//! column; every link becomes an undirected edge between the two ports.

use std::io::{BufWriter, Write};

use anyhow::Result;
use quick_xml::escape::escape;
use tracing::debug;

use crate::catalog::Table;
use crate::graph::{JoinGraph, TableRef};

/// Node label style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DotStyle {
    /// `shape=record` labels, one field per column
    #[default]
    Record,
    /// HTML-like `<table>` labels with a highlighted header row
    Html,
}

/// Write `graph` as a DOT `graph` document.
///
/// Only tables that take part in at least one link are emitted.
pub fn write_dot<W: Write>(
    writer: W,
    tables: &[Table],
    graph: &JoinGraph,
    style: DotStyle,
) -> Result<()> {
    let mut out = BufWriter::new(writer);

    writeln!(out, "graph tables {{")?;
    writeln!(out, "\tnode [shape=record];")?;

    for table in tables {
        if !graph.used_tables.contains(&table.name.to_uppercase()) {
            debug!(table = %table.name, "not used, skipping");
            continue;
        }
        match style {
            DotStyle::Record => write_record_node(&mut out, table)?,
            DotStyle::Html => write_html_node(&mut out, table)?,
        }
    }
    writeln!(out)?;

    for link in &graph.links {
        writeln!(out, "\t{} -- {};", edge_end(&link.a), edge_end(&link.b))?;
    }

    writeln!(out, "}}")?;
    out.flush()?;
    Ok(())
}

fn write_record_node<W: Write>(out: &mut W, table: &Table) -> Result<()> {
    write!(
        out,
        "\t{} [label=\"{{{}",
        node_id(&table.name),
        escape_record(&table.name)
    )?;
    for field in &table.fields {
        write!(
            out,
            "|<{}> {} {}",
            escape_record(&field.name.to_uppercase()),
            escape_record(&unocaps(&field.name)),
            escape_record(&field.data_type)
        )?;
    }
    writeln!(out, "}}\"];")?;
    Ok(())
}

fn write_html_node<W: Write>(out: &mut W, table: &Table) -> Result<()> {
    writeln!(
        out,
        "\t{} [shape=none, margin=0, label=<",
        node_id(&table.name)
    )?;
    writeln!(
        out,
        r#"<table border="0" cellborder="1" cellspacing="0">"#
    )?;
    writeln!(
        out,
        r#"  <tr><td align="center" bgcolor="BLACK"><font color="WHITE"><b>{}</b></font></td></tr>"#,
        escape(unocaps(&table.name).as_str())
    )?;
    for field in &table.fields {
        writeln!(
            out,
            r#"  <tr><td align="left" PORT="{}">{} {}</td></tr>"#,
            escape(field.name.to_uppercase().as_str()),
            escape(unocaps(&field.name).as_str()),
            escape(field.data_type.as_str())
        )?;
    }
    writeln!(out, "</table>\n>];")?;
    Ok(())
}

/// `table_NAME:"FIELD"` for one side of an edge
fn edge_end(side: &TableRef) -> String {
    format!(
        "{}:\"{}\"",
        node_id(&side.table),
        side.field.replace('"', "\\\"")
    )
}

/// DOT node id for a table.
///
/// Names with schema dots or other punctuation are quoted, so `HR.EMP` and
/// `HR_EMP` stay distinct nodes.
fn node_id(table: &str) -> String {
    let name = table.to_uppercase();
    if name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        format!("table_{}", name)
    } else {
        format!("\"table_{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Escape characters with a meaning inside record labels
fn escape_record(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '{' | '}' | '|' | '<' | '>' | '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Upper-case the prefix before the first `_`, lower-case the rest.
///
/// `T_EMPLOYEE_NAME` reads as `T_employee_name`.
pub fn unocaps(text: &str) -> String {
    match text.split_once('_') {
        Some((prefix, rest)) => format!("{}_{}", prefix.to_uppercase(), rest.to_lowercase()),
        None => text.to_string(),
    }
}
