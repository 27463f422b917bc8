// src/export.rs

//! Rendering a graph for consumption outside the process.
//!
//! - `json`: the structural `GraphSnapshot`, reloadable with
//!   `DependencyGraph::from_structured`.
//! - `dot`: Graphviz source built through `petgraph::dot`.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::dag::{DependencyGraph, NodePayload};
use crate::errors::Result;

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Structural snapshot, pretty-printed JSON.
    #[default]
    Json,
    /// Graphviz DOT.
    Dot,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "dot" | "graphviz" => Ok(ExportFormat::Dot),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, dot",
                s
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Dot => write!(f, "dot"),
        }
    }
}

/// Copy the structure of `graph` into a petgraph `DiGraph`, borrowing ids.
///
/// Nodes are inserted in id order, so indices are stable for a given graph.
pub fn to_petgraph<T>(graph: &DependencyGraph<T>) -> DiGraph<&str, ()> {
    let mut out = DiGraph::with_capacity(graph.len(), graph.edge_count());
    let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(graph.len());

    for id in graph.nodes() {
        index.insert(id, out.add_node(id));
    }

    for (source, target) in graph.edges() {
        if let (Some(&from), Some(&to)) = (index.get(source.as_str()), index.get(target.as_str())) {
            out.add_edge(from, to, ());
        }
    }

    out
}

/// Graphviz DOT for `graph`; edges are unlabelled.
pub fn to_dot<T>(graph: &DependencyGraph<T>) -> String {
    let pg = to_petgraph(graph).map(|_, id| *id, |_, _| "");
    format!("{}", Dot::with_config(&pg, &[Config::EdgeNoLabel]))
}

pub fn render<T: NodePayload>(graph: &DependencyGraph<T>, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(graph.to_structured().to_json()?),
        ExportFormat::Dot => Ok(to_dot(graph)),
    }
}

/// Render `graph` and write it to `out` with a trailing newline.
pub fn write_to<T: NodePayload>(
    graph: &DependencyGraph<T>,
    format: ExportFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let rendered = render(graph, format)?;
    writeln!(out, "{rendered}")?;
    Ok(())
}
