//! Degree-constrained random graph generators.
//!
//! Every generator validates its parameters, optionally bootstraps a spanning
//! tree when connectivity is required, then places the remaining edges by
//! drawing endpoints from an [`OrderStatisticTree`] keyed by degree deficit.
//! Self-pairs and duplicate edges are rejected and redrawn. All randomness
//! comes from the caller's generator, so a seeded generator reproduces the
//! same graph.

mod average;
mod bounded;
mod complete;
mod regular;

use rand::Rng;

pub use self::{
    average::average_degree,
    bounded::{at_least_degree, between_degree},
    complete::complete,
    regular::{MAX_PAIRING_ATTEMPTS, exact_degree},
};
pub(crate) use self::{
    average::validate as validate_average,
    bounded::validate as validate_between,
    regular::validate as validate_exact,
};
use crate::{
    error::{OrderStatisticError, Result},
    graph::{Graph, NodeId, SimpleGraph},
    order_stats::OrderStatisticTree,
};

/// Draws one remaining unit uniformly from `points` and returns its owner.
fn draw<R: Rng + ?Sized>(points: &OrderStatisticTree, rng: &mut R) -> Result<NodeId> {
    let len = points.len();
    if len == 0 {
        return Err(OrderStatisticError::Empty.into());
    }
    Ok(points.select(rng.gen_range(0..len))?)
}

/// Returns `true` when `u -- v` may be added to `graph`.
fn is_open_pair(graph: &SimpleGraph, u: NodeId, v: NodeId) -> bool {
    u != v && !graph.has_edge(u, v)
}

/// Rewires a random edge `a -- b` away from the stuck pair into `a -- left`
/// and `b -- right`, so `a` and `b` keep their degrees while `left` and
/// `right` each gain one. With `left == right` the node gains two neighbours.
///
/// Returns `false` when no edge of `graph` can be rewired.
fn rewire_onto<R: Rng + ?Sized>(
    graph: &mut SimpleGraph,
    left: NodeId,
    right: NodeId,
    rng: &mut R,
) -> bool {
    let stuck = |node: NodeId| node == left || node == right;
    let options: Vec<(NodeId, NodeId)> = graph
        .edges()
        .into_iter()
        .filter(|edge| !stuck(edge.left()) && !stuck(edge.right()))
        .flat_map(|edge| [(edge.left(), edge.right()), (edge.right(), edge.left())])
        .filter(|&(a, b)| !graph.has_edge(a, left) && !graph.has_edge(b, right))
        .collect();
    if options.is_empty() {
        return false;
    }

    let (a, b) = options[rng.gen_range(0..options.len())];
    graph.remove_edge(a, b);
    graph.add_edge(a, left);
    graph.add_edge(b, right);
    true
}

/// Stall threshold after which sampling falls back to an exhaustive scan.
const fn stall_limit(nodes: usize, remaining: usize) -> usize {
    2 * (nodes + remaining)
}
