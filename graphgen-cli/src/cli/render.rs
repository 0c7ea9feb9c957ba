//! Text renderers for generated graphs.

use std::io::{self, Write};

use clap::ValueEnum;
use graphgen_core::{Edge, Graph, NodeId};
use serde_json::{Map, Value, json};

use super::commands::GenerationSummary;

/// Output formats supported by `generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Space-separated adjacency matrix holding weights, or 1 for an edge.
    Matrix,
    /// Graphviz `strict graph` source.
    Dot,
    /// One JSON object per graph, one per line.
    Json,
}

/// Renders every graph in `summary`. Matrix and dot outputs are separated by
/// a blank line; JSON output writes one document per line.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
pub fn render_summary(summary: &GenerationSummary, mut writer: impl Write) -> io::Result<()> {
    for (index, result) in summary.results.iter().enumerate() {
        let graph: &dyn Graph = &*result.graph;
        match summary.format {
            OutputFormat::Matrix | OutputFormat::Dot if index > 0 => writeln!(writer)?,
            _ => {}
        }
        match summary.format {
            OutputFormat::Matrix => render_matrix(graph, &mut writer)?,
            OutputFormat::Dot => render_dot(graph, &mut writer)?,
            OutputFormat::Json => render_json(graph, &mut writer)?,
        }
    }
    Ok(())
}

/// Writes the adjacency matrix of `graph`, one row per line.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
///
/// # Examples
/// ```
/// use graphgen_cli::cli::render_matrix;
/// use graphgen_core::SimpleGraph;
///
/// let mut out = Vec::new();
/// render_matrix(&SimpleGraph::complete(3), &mut out)?;
/// assert_eq!(String::from_utf8(out)?, "0 1 1\n1 0 1\n1 1 0\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_matrix(graph: &dyn Graph, mut writer: impl Write) -> io::Result<()> {
    let nodes = graph.node_count();
    for row in 0..nodes {
        let cells: Vec<String> = (0..nodes)
            .map(|column| cell(graph, row, column).to_string())
            .collect();
        writeln!(writer, "{}", cells.join(" "))?;
    }
    Ok(())
}

fn cell(graph: &dyn Graph, row: NodeId, column: NodeId) -> i64 {
    if !graph.has_edge(row, column) {
        return 0;
    }
    graph.weight(Edge::new(row, column)).unwrap_or(1)
}

/// Writes `graph` as a Graphviz `strict graph`. Edges are listed in
/// ascending order with a `label` on weighted graphs, followed by every
/// isolated node.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
pub fn render_dot(graph: &dyn Graph, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "strict graph {{")?;
    let weighted = graph.properties().weighted();
    for edge in graph.edges() {
        write!(writer, "\t{} -- {}", edge.left(), edge.right())?;
        if weighted {
            let weight = graph.weight(edge).unwrap_or_default();
            write!(writer, " [label=\"{weight}\"]")?;
        }
        writeln!(writer)?;
    }
    for node in (0..graph.node_count()).filter(|&node| graph.degree(node) == 0) {
        writeln!(writer, "\t{node}")?;
    }
    writeln!(writer, "}}")
}

/// Writes `graph` as a single-line JSON object.
///
/// Nodes are named by their labels when the graph carries them and by their
/// index otherwise. `edges` maps each node name to its neighbours' names;
/// weighted graphs add a `weights` object keyed by `"left-right"`.
///
/// # Errors
/// Returns [`io::Error`] if serialisation or writing fails.
pub fn render_json(graph: &dyn Graph, mut writer: impl Write) -> io::Result<()> {
    let names: Vec<String> = match graph.names() {
        Some(names) => names.to_vec(),
        None => (0..graph.node_count()).map(|node| node.to_string()).collect(),
    };
    let name = |node: NodeId| names.get(node).cloned().unwrap_or_else(|| node.to_string());

    let mut edges = Map::new();
    for (node, neighbours) in graph.adjacency().iter().enumerate() {
        let listed = neighbours.iter().map(|&other| Value::from(name(other))).collect();
        edges.insert(name(node), Value::Array(listed));
    }

    let mut document = json!({ "nodes": names, "edges": edges });
    if let (Some(weights), Value::Object(fields)) = (graph.weights(), &mut document) {
        let weights: Map<String, Value> = weights
            .iter()
            .map(|(edge, &weight)| (format!("{}-{}", edge.left(), edge.right()), json!(weight)))
            .collect();
        fields.insert("weights".to_owned(), Value::Object(weights));
    }

    serde_json::to_writer(&mut writer, &document)?;
    writeln!(writer)
}
