//! Connected-component discovery and degree-preserving component merging.
//!
//! [`repair_connectivity`] joins the components of a graph by repeatedly
//! cutting one edge in each of two components and cross-wiring the four
//! endpoints. Every node keeps its degree, so regular graphs stay regular.

use std::collections::{BTreeSet, VecDeque};

use rand::Rng;
use tracing::{debug, instrument};

use crate::{
    error::{GenerationError, Result},
    graph::{Graph, NodeId, SimpleGraph},
};

/// Upper bound on full merge passes before the repair gives up.
pub const MAX_REPAIR_PASSES: usize = 32;

/// Returns the connected components of `adjacency`, each sorted ascending and
/// ordered by their smallest member.
///
/// # Examples
/// ```
/// use graphgen_core::{SimpleGraph, Graph, connectivity::components};
///
/// let mut graph = SimpleGraph::empty(4);
/// graph.add_edge(0, 2);
/// assert_eq!(components(graph.adjacency()), vec![vec![0, 2], vec![1], vec![3]]);
/// ```
#[must_use]
pub fn components(adjacency: &[BTreeSet<NodeId>]) -> Vec<Vec<NodeId>> {
    let mut seen = vec![false; adjacency.len()];
    let mut result = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..adjacency.len() {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        queue.push_back(start);
        let mut members = Vec::new();
        while let Some(node) = queue.pop_front() {
            members.push(node);
            for &next in &adjacency[node] {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        members.sort_unstable();
        result.push(members);
    }
    result
}

/// Merges every component of `graph` into one while preserving each node's
/// degree.
///
/// A pass pairs components off, removes a random edge `a -- a'` from the
/// first and `b -- b'` from the second, and inserts `a -- b'` and `a' -- b`.
/// Cutting a bridge can leave the merged group split, so passes repeat until a
/// single component remains or [`MAX_REPAIR_PASSES`] is reached.
///
/// # Errors
/// Returns [`GenerationError::ConnectivityRepairExhausted`] when a component
/// has no edge to cut or the pass limit is reached.
#[instrument(level = "debug", skip(graph, rng), fields(nodes = graph.node_count()), err)]
pub fn repair_connectivity<R: Rng + ?Sized>(graph: &mut SimpleGraph, rng: &mut R) -> Result<()> {
    for pass in 0..MAX_REPAIR_PASSES {
        let found = components(graph.adjacency());
        if found.len() <= 1 {
            return Ok(());
        }
        debug!(pass, components = found.len(), "merging components");
        if !merge_pass(graph, found.into(), rng) {
            return Err(GenerationError::ConnectivityRepairExhausted {
                passes: pass + 1,
                components: components(graph.adjacency()).len(),
            });
        }
    }

    let remaining = components(graph.adjacency()).len();
    if remaining <= 1 {
        Ok(())
    } else {
        Err(GenerationError::ConnectivityRepairExhausted {
            passes: MAX_REPAIR_PASSES,
            components: remaining,
        })
    }
}

fn merge_pass<R: Rng + ?Sized>(
    graph: &mut SimpleGraph,
    mut groups: VecDeque<Vec<NodeId>>,
    rng: &mut R,
) -> bool {
    while groups.len() > 1 {
        let (Some(mut first), Some(second)) = (groups.pop_front(), groups.pop_front()) else {
            break;
        };
        let Some((a, a_next)) = random_edge_within(graph, &first, rng) else {
            return false;
        };
        let Some((b, b_next)) = random_edge_within(graph, &second, rng) else {
            return false;
        };

        graph.remove_edge(a, a_next);
        graph.remove_edge(b, b_next);
        graph.add_edge(a, b_next);
        graph.add_edge(a_next, b);

        first.extend(second);
        groups.push_back(first);
    }
    true
}

fn random_edge_within<R: Rng + ?Sized>(
    graph: &SimpleGraph,
    members: &[NodeId],
    rng: &mut R,
) -> Option<(NodeId, NodeId)> {
    let eligible: Vec<NodeId> = members
        .iter()
        .copied()
        .filter(|&node| graph.degree(node) > 0)
        .collect();
    if eligible.is_empty() {
        return None;
    }
    let node = eligible[rng.gen_range(0..eligible.len())];
    let neighbours = graph.neighbours(node)?;
    let other = neighbours.iter().nth(rng.gen_range(0..neighbours.len()))?;
    Some((node, *other))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use super::*;

    fn cycle_union(sizes: &[usize]) -> SimpleGraph {
        let total = sizes.iter().sum();
        let mut graph = SimpleGraph::empty(total);
        let mut offset = 0;
        for &size in sizes {
            for step in 0..size {
                graph.add_edge(offset + step, offset + (step + 1) % size);
            }
            offset += size;
        }
        graph
    }

    #[test]
    fn components_are_sorted_and_disjoint() {
        let graph = cycle_union(&[3, 4]);
        assert_eq!(
            components(graph.adjacency()),
            vec![vec![0, 1, 2], vec![3, 4, 5, 6]]
        );
    }

    #[rstest]
    #[case::two_triangles(&[3, 3], 1)]
    #[case::many_cycles(&[3, 4, 5, 3, 6], 7)]
    #[case::already_connected(&[8], 3)]
    fn repair_joins_cycles_and_keeps_degrees(#[case] sizes: &[usize], #[case] seed: u64) {
        let mut graph = cycle_union(sizes);
        let before = graph.degrees();
        let mut rng = SmallRng::seed_from_u64(seed);

        repair_connectivity(&mut graph, &mut rng).expect("cycles can always be merged");

        assert!(graph.is_connected());
        assert_eq!(graph.degrees(), before);
        graphgen_test_support::assert_simple_graph(graph.adjacency());
    }

    #[test]
    fn isolated_nodes_cannot_be_merged() {
        let mut graph = cycle_union(&[3]);
        graph = {
            let mut widened = SimpleGraph::empty(4);
            for edge in graph.edges() {
                widened.add_edge(edge.left(), edge.right());
            }
            widened
        };
        let mut rng = SmallRng::seed_from_u64(5);
        let err = repair_connectivity(&mut graph, &mut rng).expect_err("node 3 has no edges");
        assert!(matches!(
            err,
            GenerationError::ConnectivityRepairExhausted { passes: 1, .. }
        ));
    }
}
