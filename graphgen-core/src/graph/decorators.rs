//! Weighted and named decorators layered over an owned inner graph.

use std::collections::{BTreeMap, BTreeSet};

use super::{BoxedGraph, Edge, Graph, GraphProperties, NodeId};
use crate::error::GraphError;

/// Attaches a non-zero integer weight to every edge of the inner graph.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use graphgen_core::{Edge, Graph, SimpleGraph, WeightedGraph};
///
/// let mut inner = SimpleGraph::empty(2);
/// inner.add_edge(0, 1);
/// let weights = BTreeMap::from([(Edge::new(1, 0), -4)]);
/// let graph = WeightedGraph::new(inner, weights).expect("weights match edges");
/// assert_eq!(graph.weight(Edge::new(0, 1)), Some(-4));
/// assert!(graph.properties().weighted());
/// ```
#[derive(Clone, Debug)]
pub struct WeightedGraph<G = BoxedGraph> {
    inner: G,
    weights: BTreeMap<Edge, i64>,
}

impl<G: Graph> WeightedGraph<G> {
    /// Wraps `inner` with the supplied weights.
    ///
    /// # Errors
    /// Returns [`GraphError::MissingEdge`] when a weight refers to a pair that
    /// is not an edge of `inner`, and [`GraphError::ZeroWeight`] for zero
    /// weights.
    pub fn new(inner: G, weights: BTreeMap<Edge, i64>) -> Result<Self, GraphError> {
        for (&edge, &weight) in &weights {
            if !inner.has_edge(edge.left(), edge.right()) {
                return Err(GraphError::MissingEdge { edge });
            }
            if weight == 0 {
                return Err(GraphError::ZeroWeight { edge });
            }
        }
        Ok(Self { inner, weights })
    }

    /// Returns the wrapped graph.
    #[must_use]
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: Graph> Graph for WeightedGraph<G> {
    fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    fn adjacency(&self) -> &[BTreeSet<NodeId>] {
        self.inner.adjacency()
    }

    fn properties(&self) -> GraphProperties {
        self.inner.properties() | GraphProperties::WEIGHTED
    }

    fn weights(&self) -> Option<&BTreeMap<Edge, i64>> {
        Some(&self.weights)
    }

    fn names(&self) -> Option<&[String]> {
        self.inner.names()
    }
}

/// Attaches a label to every node of the inner graph.
#[derive(Clone, Debug)]
pub struct NamedGraph<G = BoxedGraph> {
    inner: G,
    names: Vec<String>,
}

impl<G: Graph> NamedGraph<G> {
    /// Wraps `inner` with one label per node.
    ///
    /// # Errors
    /// Returns [`GraphError::NameCountMismatch`] when `names.len()` differs
    /// from the node count of `inner`.
    pub fn new(inner: G, names: Vec<String>) -> Result<Self, GraphError> {
        if names.len() != inner.node_count() {
            return Err(GraphError::NameCountMismatch {
                names: names.len(),
                nodes: inner.node_count(),
            });
        }
        Ok(Self { inner, names })
    }

    /// Labels every node with its decimal index.
    #[must_use]
    pub fn with_index_names(inner: G) -> Self {
        let names = (0..inner.node_count()).map(|node| node.to_string()).collect();
        Self { inner, names }
    }

    /// Returns the wrapped graph.
    #[must_use]
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: Graph> Graph for NamedGraph<G> {
    fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    fn adjacency(&self) -> &[BTreeSet<NodeId>] {
        self.inner.adjacency()
    }

    fn properties(&self) -> GraphProperties {
        self.inner.properties() | GraphProperties::NAMED
    }

    fn weights(&self) -> Option<&BTreeMap<Edge, i64>> {
        self.inner.weights()
    }

    fn names(&self) -> Option<&[String]> {
        Some(&self.names)
    }
}
