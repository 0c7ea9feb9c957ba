//! Random spanning trees with a per-node degree cap.

use rand::Rng;
use tracing::instrument;

use crate::{
    error::{GenerationError, Result},
    graph::{Graph, NodeId, SimpleGraph},
};

const GENERATOR: &str = "spanning-tree";

/// Builds a uniformly seeded random spanning tree on `nodes` nodes in which no
/// node exceeds `max_degree`.
///
/// Starting from singleton components, two distinct components are drawn at
/// random and joined by an edge between one unsaturated member of each until a
/// single component remains.
///
/// # Errors
/// Returns [`GenerationError::EmptyGraph`] for zero nodes and
/// [`GenerationError::InvalidParameters`] when the cap cannot admit a tree:
/// `max_degree < 2` with more than two nodes, or `max_degree < 1` with two.
///
/// # Examples
/// ```
/// use graphgen_core::{Graph, spanning::random_spanning_tree};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(11);
/// let tree = random_spanning_tree(12, 3, &mut rng)?;
/// assert_eq!(tree.edge_count(), 11);
/// assert!(tree.is_connected());
/// assert!((0..12).all(|node| tree.degree(node) <= 3));
/// # Ok::<(), graphgen_core::GenerationError>(())
/// ```
#[instrument(level = "debug", skip(rng), err)]
pub fn random_spanning_tree<R: Rng + ?Sized>(
    nodes: usize,
    max_degree: usize,
    rng: &mut R,
) -> Result<SimpleGraph> {
    if nodes == 0 {
        return Err(GenerationError::EmptyGraph);
    }
    if nodes > 2 && max_degree < 2 {
        return Err(GenerationError::invalid(
            GENERATOR,
            format!("a tree on {nodes} nodes needs a degree cap of at least 2"),
        ));
    }
    if nodes == 2 && max_degree < 1 {
        return Err(GenerationError::invalid(
            GENERATOR,
            "a tree on 2 nodes needs a degree cap of at least 1",
        ));
    }

    let mut graph = SimpleGraph::empty(nodes);
    let mut components: Vec<Vec<NodeId>> = (0..nodes).map(|node| vec![node]).collect();

    while components.len() > 1 {
        let first = rng.gen_range(0..components.len());
        let second = rng.gen_range(0..components.len());
        if first == second {
            continue;
        }
        let (keep, merge) = if first < second {
            (first, second)
        } else {
            (second, first)
        };

        let u = pick_unsaturated(&graph, &components[keep], max_degree, rng)?;
        let v = pick_unsaturated(&graph, &components[merge], max_degree, rng)?;
        graph.add_edge(u, v);

        // `merge > keep`, so swapping the tail into `merge` leaves `keep` in place.
        let absorbed = components.swap_remove(merge);
        components[keep].extend(absorbed);
    }
    Ok(graph)
}

/// Draws a member of `component` whose degree is still below `max_degree`.
///
/// Sampling uniformly among the unsaturated members matches redrawing until an
/// unsaturated member appears.
fn pick_unsaturated<R: Rng + ?Sized>(
    graph: &SimpleGraph,
    component: &[NodeId],
    max_degree: usize,
    rng: &mut R,
) -> Result<NodeId> {
    let open: Vec<NodeId> = component
        .iter()
        .copied()
        .filter(|&node| graph.degree(node) < max_degree)
        .collect();
    if open.is_empty() {
        return Err(GenerationError::invalid(
            GENERATOR,
            format!("every node of a component already has degree {max_degree}"),
        ));
    }
    Ok(open[rng.gen_range(0..open.len())])
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::single(1, 0)]
    #[case::pair(2, 1)]
    #[case::path_only(9, 2)]
    #[case::branching(40, 3)]
    #[case::unconstrained(25, 24)]
    fn trees_span_and_respect_the_cap(#[case] nodes: usize, #[case] cap: usize) {
        for seed in 0..8 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let tree = random_spanning_tree(nodes, cap, &mut rng).expect("parameters are feasible");
            assert_eq!(tree.edge_count(), nodes - 1);
            assert!(tree.is_connected());
            assert!(tree.degrees().into_iter().all(|degree| degree <= cap));
        }
    }

    #[rstest]
    #[case::empty(0, 3, true)]
    #[case::pair_without_edges(2, 0, false)]
    #[case::path_impossible(3, 1, false)]
    fn infeasible_caps_are_rejected(
        #[case] nodes: usize,
        #[case] cap: usize,
        #[case] empty: bool,
    ) {
        let mut rng = SmallRng::seed_from_u64(0);
        let err = random_spanning_tree(nodes, cap, &mut rng)
            .expect_err("parameters are infeasible");
        if empty {
            assert_eq!(err, GenerationError::EmptyGraph);
        } else {
            assert!(matches!(err, GenerationError::InvalidParameters { .. }));
        }
    }

    #[test]
    fn seeded_trees_are_reproducible() {
        let build = || {
            let mut rng = SmallRng::seed_from_u64(42);
            random_spanning_tree(30, 3, &mut rng).expect("feasible")
        };
        assert_eq!(build(), build());
    }
}
