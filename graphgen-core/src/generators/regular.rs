//! Random regular graphs by pairing with switching repair.

use rand::Rng;
use tracing::{debug, instrument};

use super::{draw, is_open_pair, rewire_onto};
use crate::{
    connectivity::repair_connectivity,
    error::{GenerationError, Result},
    graph::{NodeId, SimpleGraph},
    order_stats::OrderStatisticTree,
};

const GENERATOR: &str = "exact-degree";

/// Number of from-scratch pairing attempts before giving up.
pub const MAX_PAIRING_ATTEMPTS: usize = 64;

/// Generates a graph on `nodes` nodes in which every node has exactly
/// `degree` neighbours.
///
/// Endpoints are paired at random from the remaining degree deficits. When a
/// run of collisions exceeds twice the number of edges still to place, an
/// existing edge away from the stuck pair is rewired onto it. If no such edge
/// exists the attempt restarts, up to [`MAX_PAIRING_ATTEMPTS`] times.
///
/// Degrees above `nodes / 2` are produced as the complement of a graph with
/// degree `nodes - degree - 1`. The complement of a sparse regular graph is
/// already connected, so connectivity repair only runs on the direct path.
///
/// # Errors
/// Returns [`GenerationError::EmptyGraph`] for zero nodes,
/// [`GenerationError::InvalidParameters`] when `degree` is zero, not below
/// `nodes`, makes `nodes * degree` odd, or is below 2 for a connected graph on
/// more than two nodes, [`GenerationError::PairingExhausted`] when every
/// attempt stalls, and [`GenerationError::ConnectivityRepairExhausted`] when
/// components cannot be merged.
///
/// # Examples
/// ```
/// use graphgen_core::{Graph, generators::exact_degree};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(12);
/// let graph = exact_degree(20, 5, true, &mut rng)?;
/// assert!((0..20).all(|node| graph.degree(node) == 5));
/// assert!(graph.is_connected());
/// # Ok::<(), graphgen_core::GenerationError>(())
/// ```
#[instrument(level = "debug", skip(rng), err)]
pub fn exact_degree<R: Rng + ?Sized>(
    nodes: usize,
    degree: usize,
    connected: bool,
    rng: &mut R,
) -> Result<SimpleGraph> {
    validate(nodes, degree, connected)?;

    let inverted = degree > nodes / 2;
    let working = if inverted { nodes - degree - 1 } else { degree };

    let mut graph = None;
    for attempt in 1..=MAX_PAIRING_ATTEMPTS {
        if let Some(paired) = pair_endpoints(nodes, working, rng)? {
            graph = Some(paired);
            break;
        }
        debug!(attempt, "pairing stalled without a switch, restarting");
    }
    let mut graph = graph.ok_or(GenerationError::PairingExhausted {
        attempts: MAX_PAIRING_ATTEMPTS,
    })?;

    if inverted {
        graph = graph.complement();
    } else if connected {
        repair_connectivity(&mut graph, rng)?;
    }
    Ok(graph)
}

pub(crate) fn validate(nodes: usize, degree: usize, connected: bool) -> Result<()> {
    if nodes == 0 {
        return Err(GenerationError::EmptyGraph);
    }
    if degree == 0 || degree >= nodes {
        return Err(GenerationError::invalid(
            GENERATOR,
            format!("degree {degree} must lie in 1..{nodes}"),
        ));
    }
    if nodes * degree % 2 != 0 {
        return Err(GenerationError::invalid(
            GENERATOR,
            format!("{nodes} nodes of degree {degree} leave an unpaired endpoint"),
        ));
    }
    if connected && degree < 2 && nodes > 2 {
        return Err(GenerationError::invalid(
            GENERATOR,
            "a connected graph on more than two nodes needs degree 2 or more",
        ));
    }
    Ok(())
}

/// Runs one pairing attempt. Returns `Ok(None)` when the attempt stalls and
/// no switch can free it.
fn pair_endpoints<R: Rng + ?Sized>(
    nodes: usize,
    degree: usize,
    rng: &mut R,
) -> Result<Option<SimpleGraph>> {
    let mut graph = SimpleGraph::empty(nodes);
    let mut points = OrderStatisticTree::new(&vec![degree; nodes]);
    let mut stalls = 0_usize;

    while !points.is_empty() {
        let left = draw(&points, rng)?;
        let right = draw(&points, rng)?;

        if !is_open_pair(&graph, left, right) {
            stalls += 1;
            if stalls > points.len() && (left != right || points.rank(left) > 1) {
                if !switch_onto(&mut graph, &mut points, left, right, rng)? {
                    return Ok(None);
                }
                stalls = 0;
            }
            continue;
        }

        stalls = 0;
        graph.add_edge(left, right);
        points.remove(left)?;
        points.remove(right)?;
    }
    Ok(Some(graph))
}

/// Rewires an existing edge onto the stuck pair `left -- right` and consumes
/// one unit of each endpoint. Returns `false` when no edge can be rewired.
pub(super) fn switch_onto<R: Rng + ?Sized>(
    graph: &mut SimpleGraph,
    points: &mut OrderStatisticTree,
    left: NodeId,
    right: NodeId,
    rng: &mut R,
) -> Result<bool> {
    if !rewire_onto(graph, left, right, rng) {
        return Ok(false);
    }
    points.remove(left)?;
    points.remove(right)?;
    Ok(true)
}
