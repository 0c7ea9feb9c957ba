//! Graph capability shared by every generator and by downstream renderers.
//!
//! Adjacency is stored as one ordered neighbour set per node so that
//! iteration order, and therefore every seeded random choice made while
//! walking a graph, is reproducible.

mod decorators;
mod simple;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    ops::BitOr,
};

pub use self::{
    decorators::{NamedGraph, WeightedGraph},
    simple::SimpleGraph,
};

/// Identity of a node: its index in `0..node_count`.
pub type NodeId = usize;

/// Owned, type-erased graph handed between threads.
pub type BoxedGraph = Box<dyn Graph + Send + Sync>;

/// An undirected edge stored with its smaller endpoint first.
///
/// # Examples
/// ```
/// use graphgen_core::Edge;
///
/// let edge = Edge::new(7, 3);
/// assert_eq!((edge.left(), edge.right()), (3, 7));
/// assert_eq!(edge, Edge::new(3, 7));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Edge {
    left: NodeId,
    right: NodeId,
}

impl Edge {
    /// Creates an edge, normalising the endpoint order.
    #[must_use]
    pub const fn new(u: NodeId, v: NodeId) -> Self {
        if v < u {
            Self { left: v, right: u }
        } else {
            Self { left: u, right: v }
        }
    }

    /// Returns the smaller endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn left(&self) -> NodeId { self.left }

    /// Returns the larger endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn right(&self) -> NodeId { self.right }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.left, self.right)
    }
}

/// Flags describing which decorations a graph carries.
///
/// # Examples
/// ```
/// use graphgen_core::GraphProperties;
///
/// let props = GraphProperties::NONE | GraphProperties::WEIGHTED;
/// assert!(props.weighted());
/// assert!(!props.named());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct GraphProperties(u8);

impl GraphProperties {
    /// A plain unweighted, unnamed graph.
    pub const NONE: Self = Self(0);
    /// Nodes carry labels.
    pub const NAMED: Self = Self(1);
    /// Edges carry integer weights.
    pub const WEIGHTED: Self = Self(1 << 1);

    /// Returns `true` when node labels are present.
    #[must_use]
    pub const fn named(self) -> bool {
        self.0 & Self::NAMED.0 != 0
    }

    /// Returns `true` when edge weights are present.
    #[must_use]
    pub const fn weighted(self) -> bool {
        self.0 & Self::WEIGHTED.0 != 0
    }
}

impl BitOr for GraphProperties {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Read-only view over a simple undirected graph.
///
/// Implementations guarantee a symmetric adjacency relation without
/// self-loops. Weighted implementations store exactly one non-zero weight per
/// present edge.
pub trait Graph: fmt::Debug {
    /// Returns the number of nodes.
    fn node_count(&self) -> usize;

    /// Returns the neighbour set of every node, indexed by [`NodeId`].
    fn adjacency(&self) -> &[BTreeSet<NodeId>];

    /// Returns the decorations carried by this graph.
    fn properties(&self) -> GraphProperties;

    /// Returns the weight map when the graph is weighted.
    fn weights(&self) -> Option<&BTreeMap<Edge, i64>> {
        None
    }

    /// Returns the node labels when the graph is named.
    fn names(&self) -> Option<&[String]> {
        None
    }

    /// Returns the neighbours of `node`, or `None` when it does not exist.
    fn neighbours(&self, node: NodeId) -> Option<&BTreeSet<NodeId>> {
        self.adjacency().get(node)
    }

    /// Returns the degree of `node` (zero for unknown nodes).
    fn degree(&self, node: NodeId) -> usize {
        self.neighbours(node).map_or(0, BTreeSet::len)
    }

    /// Returns `true` when `u` and `v` are adjacent.
    fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.neighbours(u).is_some_and(|set| set.contains(&v))
    }

    /// Returns the weight of `edge`, if the graph is weighted and the edge exists.
    fn weight(&self, edge: Edge) -> Option<i64> {
        self.weights().and_then(|weights| weights.get(&edge).copied())
    }

    /// Returns the number of undirected edges.
    fn edge_count(&self) -> usize {
        self.adjacency().iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Returns every undirected edge once, in ascending order.
    fn edges(&self) -> Vec<Edge> {
        self.adjacency()
            .iter()
            .enumerate()
            .flat_map(|(node, set)| {
                set.range(node + 1..)
                    .map(move |&other| Edge::new(node, other))
            })
            .collect()
    }

    /// Returns `true` when a breadth-first walk from any node reaches all others.
    fn is_connected(&self) -> bool {
        crate::connectivity::components(self.adjacency()).len() <= 1
    }
}

impl<G: Graph + ?Sized> Graph for Box<G> {
    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn adjacency(&self) -> &[BTreeSet<NodeId>] {
        (**self).adjacency()
    }

    fn properties(&self) -> GraphProperties {
        (**self).properties()
    }

    fn weights(&self) -> Option<&BTreeMap<Edge, i64>> {
        (**self).weights()
    }

    fn names(&self) -> Option<&[String]> {
        (**self).names()
    }
}
