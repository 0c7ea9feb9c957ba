//! Base unweighted graph used as the working representation by generators.

use std::collections::BTreeSet;

use super::{Graph, GraphProperties, NodeId};

/// Undirected simple graph backed by per-node neighbour sets.
///
/// # Examples
/// ```
/// use graphgen_core::{Graph, SimpleGraph};
///
/// let graph = SimpleGraph::complete(4);
/// assert_eq!(graph.edge_count(), 6);
/// assert!(graph.adjacency().iter().all(|set| set.len() == 3));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SimpleGraph {
    adjacency: Vec<BTreeSet<NodeId>>,
}

impl SimpleGraph {
    /// Creates a graph with `nodes` isolated nodes.
    #[must_use]
    pub fn empty(nodes: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); nodes],
        }
    }

    /// Creates the complete graph on `nodes` nodes.
    #[must_use]
    pub fn complete(nodes: usize) -> Self {
        let adjacency = (0..nodes)
            .map(|node| (0..nodes).filter(|&other| other != node).collect())
            .collect();
        Self { adjacency }
    }

    /// Inserts the undirected edge `u -- v`.
    ///
    /// Returns `false` without modifying the graph when the edge would be a
    /// self-loop, already exists, or references a node outside the graph.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        if u == v || u >= self.adjacency.len() || v >= self.adjacency.len() {
            return false;
        }
        if !self.adjacency[u].insert(v) {
            return false;
        }
        self.adjacency[v].insert(u);
        true
    }

    /// Removes the undirected edge `u -- v`, returning whether it existed.
    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        let removed = self
            .adjacency
            .get_mut(u)
            .is_some_and(|set| set.remove(&v));
        if removed {
            if let Some(set) = self.adjacency.get_mut(v) {
                set.remove(&u);
            }
        }
        removed
    }

    /// Returns the graph whose edges are exactly the non-edges of `self`.
    #[must_use]
    pub fn complement(&self) -> Self {
        let nodes = self.adjacency.len();
        let adjacency = self
            .adjacency
            .iter()
            .enumerate()
            .map(|(node, set)| {
                (0..nodes)
                    .filter(|&other| other != node && !set.contains(&other))
                    .collect()
            })
            .collect();
        Self { adjacency }
    }

    /// Returns the current degree of every node.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(BTreeSet::len).collect()
    }
}

impl Graph for SimpleGraph {
    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn adjacency(&self) -> &[BTreeSet<NodeId>] {
        &self.adjacency
    }

    fn properties(&self) -> GraphProperties {
        GraphProperties::NONE
    }
}
