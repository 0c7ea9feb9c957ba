//! Random graphs with a requested average degree.

use rand::Rng;
use tracing::instrument;

use super::is_open_pair;
use crate::{
    error::{GenerationError, Result},
    graph::{Graph, SimpleGraph},
    spanning::random_spanning_tree,
};

const GENERATOR: &str = "average-degree";

/// Generates a graph with `round(nodes * average / 2)` edges placed
/// uniformly at random between distinct, non-adjacent nodes.
///
/// With `connected` set, an unconstrained random spanning tree is placed
/// first and counts towards the edge budget.
///
/// # Errors
/// Returns [`GenerationError::EmptyGraph`] for zero nodes and
/// [`GenerationError::InvalidParameters`] when `average` is not finite, is
/// negative, or falls outside `[2, nodes - 1)` on more than two nodes. On one
/// or two nodes the average may not exceed `nodes - 1`, and a connected pair
/// needs an average of at least 1.
///
/// # Examples
/// ```
/// use graphgen_core::{Graph, generators::average_degree};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(9);
/// let graph = average_degree(10, 3.0, false, &mut rng)?;
/// assert_eq!(graph.edge_count(), 15);
/// # Ok::<(), graphgen_core::GenerationError>(())
/// ```
#[instrument(level = "debug", skip(rng), err)]
pub fn average_degree<R: Rng + ?Sized>(
    nodes: usize,
    average: f64,
    connected: bool,
    rng: &mut R,
) -> Result<SimpleGraph> {
    validate(nodes, average, connected)?;

    let mut graph = if connected {
        random_spanning_tree(nodes, nodes - 1, rng)?
    } else {
        SimpleGraph::empty(nodes)
    };

    let target = target_edges(nodes, average);
    let mut edges = graph.edge_count();
    while edges < target {
        let u = rng.gen_range(0..nodes);
        let v = rng.gen_range(0..nodes);
        if !is_open_pair(&graph, u, v) {
            continue;
        }
        graph.add_edge(u, v);
        edges += 1;
    }
    Ok(graph)
}

/// Returns the edge budget for `average`, capped at the complete graph.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "the edge budget is a rounded product of the node count and a validated average"
)]
fn target_edges(nodes: usize, average: f64) -> usize {
    let wanted = (nodes as f64 * average / 2.0).round() as usize;
    wanted.min(nodes * (nodes - 1) / 2)
}

#[expect(
    clippy::cast_precision_loss,
    reason = "node counts are far below the f64 mantissa limit"
)]
pub(crate) fn validate(nodes: usize, average: f64, connected: bool) -> Result<()> {
    if nodes == 0 {
        return Err(GenerationError::EmptyGraph);
    }
    if !average.is_finite() || average < 0.0 {
        return Err(GenerationError::invalid(
            GENERATOR,
            format!("average degree {average} must be a finite non-negative number"),
        ));
    }
    let ceiling = (nodes - 1) as f64;
    if nodes > 2 {
        if average < 2.0 || average >= ceiling {
            return Err(GenerationError::invalid(
                GENERATOR,
                format!("average degree {average} must lie in [2, {ceiling}) for {nodes} nodes"),
            ));
        }
    } else if average > ceiling {
        return Err(GenerationError::invalid(
            GENERATOR,
            format!("average degree {average} exceeds {ceiling} for {nodes} nodes"),
        ));
    } else if connected && nodes == 2 && average < 1.0 {
        return Err(GenerationError::invalid(
            GENERATOR,
            "a connected pair of nodes needs an average degree of at least 1",
        ));
    }
    Ok(())
}
