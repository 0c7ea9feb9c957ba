//! Random graphs whose degrees lie between a lower and an upper bound.
//!
//! Phase one lifts every node to the minimum degree using a tree over the
//! deficits towards `min_degree`. When a draw collides, the right endpoint is
//! redrawn from the headroom tree (`max_degree - min_degree` units per node)
//! among nodes that already reached the minimum. If no open pair is left, an
//! existing edge is rewired onto a short node. Phase two keeps drawing both
//! endpoints from the headroom tree until a target edge count, sampled
//! uniformly from the range the bounds admit, is met.
//!
//! Equal bounds describe a regular graph and are generated by
//! [`exact_degree`](super::exact_degree).

use rand::{Rng, seq::SliceRandom};
use tracing::{debug, instrument};

use super::{draw, exact_degree, is_open_pair, rewire_onto, stall_limit};
use crate::{
    error::{GenerationError, Result},
    connectivity::repair_connectivity,
    graph::{Graph, NodeId, SimpleGraph},
    order_stats::OrderStatisticTree,
    spanning::random_spanning_tree,
};

const GENERATOR: &str = "between-degree";

/// Which tree paid for the right endpoint of an edge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Source {
    Minimum,
    Headroom,
}

struct Pools {
    minimum: OrderStatisticTree,
    headroom: OrderStatisticTree,
}

impl Pools {
    fn new(graph: &SimpleGraph, min_degree: usize, max_degree: usize) -> Self {
        let degrees = graph.degrees();
        let surplus: Vec<usize> = degrees
            .iter()
            .map(|&degree| degree.saturating_sub(min_degree))
            .collect();
        Self {
            minimum: OrderStatisticTree::from_deficits(min_degree, &degrees),
            headroom: OrderStatisticTree::from_deficits(max_degree - min_degree, &surplus),
        }
    }

    fn reached_minimum(&self, node: NodeId) -> bool {
        self.minimum.rank(node) == 0
    }

    fn connect(
        &mut self,
        graph: &mut SimpleGraph,
        left: NodeId,
        right: NodeId,
        source: Source,
    ) -> Result<()> {
        graph.add_edge(left, right);
        self.consume(left, right, source)
    }

    fn consume(&mut self, left: NodeId, right: NodeId, source: Source) -> Result<()> {
        self.minimum.remove(left)?;
        match source {
            Source::Minimum => self.minimum.remove(right)?,
            Source::Headroom => self.headroom.remove(right)?,
        };
        Ok(())
    }
}

/// Generates a graph whose node degrees all lie in `[min_degree, max_degree]`.
///
/// With `connected` set, a random spanning tree capped at
/// `max(min_degree, 2)` seeds the construction. Equal bounds produce a
/// regular graph through [`exact_degree`](super::exact_degree).
///
/// # Errors
/// Returns [`GenerationError::EmptyGraph`] for zero nodes,
/// [`GenerationError::InvalidParameters`] when `min_degree > max_degree`,
/// `max_degree >= nodes`, equal bounds leave an odd degree sum, or the bounds
/// cannot hold a connected graph, and
/// [`GenerationError::DegreeSequenceUnsatisfiable`] when neither a new edge
/// nor a rewired one can lift a node to its minimum.
///
/// # Examples
/// ```
/// use graphgen_core::{Graph, generators::between_degree};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(3);
/// let graph = between_degree(30, 2, 5, true, &mut rng)?;
/// assert!((0..30).all(|node| (2..=5).contains(&graph.degree(node))));
/// assert!(graph.is_connected());
/// # Ok::<(), graphgen_core::GenerationError>(())
/// ```
#[instrument(level = "debug", skip(rng), err)]
pub fn between_degree<R: Rng + ?Sized>(
    nodes: usize,
    min_degree: usize,
    max_degree: usize,
    connected: bool,
    rng: &mut R,
) -> Result<SimpleGraph> {
    validate(nodes, min_degree, max_degree, connected)?;
    if min_degree == max_degree {
        return if max_degree == 0 {
            Ok(SimpleGraph::empty(nodes))
        } else {
            exact_degree(nodes, max_degree, connected, rng)
        };
    }

    let mut graph = if connected {
        random_spanning_tree(nodes, min_degree.max(2), rng)?
    } else {
        SimpleGraph::empty(nodes)
    };
    let mut pools = Pools::new(&graph, min_degree, max_degree);

    fill_minimum(&mut graph, &mut pools, rng)?;

    let min_edges = (nodes * min_degree).div_ceil(2);
    let max_edges = nodes * max_degree / 2;
    let target = if min_edges < max_edges {
        rng.gen_range(min_edges..=max_edges)
    } else {
        max_edges
    };
    fill_headroom(&mut graph, &mut pools.headroom, target, rng)?;

    // Rewiring may have cut a bridge of the spanning tree.
    if connected && !graph.is_connected() {
        repair_connectivity(&mut graph, rng)?;
    }
    Ok(graph)
}

/// Generates a graph in which every node has at least `min_degree`
/// neighbours.
///
/// # Errors
/// Fails under the same conditions as [`between_degree`] with
/// `max_degree = nodes - 1`.
pub fn at_least_degree<R: Rng + ?Sized>(
    nodes: usize,
    min_degree: usize,
    connected: bool,
    rng: &mut R,
) -> Result<SimpleGraph> {
    if nodes == 0 {
        return Err(GenerationError::EmptyGraph);
    }
    between_degree(nodes, min_degree, nodes - 1, connected, rng)
}

pub(crate) fn validate(
    nodes: usize,
    min_degree: usize,
    max_degree: usize,
    connected: bool,
) -> Result<()> {
    if nodes == 0 {
        return Err(GenerationError::EmptyGraph);
    }
    if min_degree > max_degree {
        return Err(GenerationError::invalid(
            GENERATOR,
            format!("minimum degree {min_degree} exceeds maximum degree {max_degree}"),
        ));
    }
    if max_degree >= nodes {
        return Err(GenerationError::invalid(
            GENERATOR,
            format!("maximum degree {max_degree} must be below the node count {nodes}"),
        ));
    }
    if min_degree == max_degree && nodes * max_degree % 2 != 0 {
        return Err(GenerationError::invalid(
            GENERATOR,
            format!("{nodes} nodes of degree {max_degree} leave an unpaired endpoint"),
        ));
    }
    let needed = (nodes - 1).min(2);
    if connected && max_degree < needed {
        return Err(GenerationError::invalid(
            GENERATOR,
            format!(
                "a connected graph on {nodes} nodes needs a maximum degree of at least {needed}"
            ),
        ));
    }
    Ok(())
}

fn fill_minimum<R: Rng + ?Sized>(
    graph: &mut SimpleGraph,
    pools: &mut Pools,
    rng: &mut R,
) -> Result<()> {
    let nodes = graph.node_count();
    let mut stalls = 0_usize;

    while !pools.minimum.is_empty() {
        if stalls > stall_limit(nodes, pools.minimum.len()) {
            debug!(remaining = pools.minimum.len(), "minimum phase stalled, scanning");
            match scan_minimum(graph, pools, rng) {
                Some((left, right, source)) => pools.connect(graph, left, right, source)?,
                None => switch_minimum(graph, pools, rng)?,
            }
            stalls = 0;
            continue;
        }

        let left = draw(&pools.minimum, rng)?;
        let mut right = draw(&pools.minimum, rng)?;
        let mut source = Source::Minimum;

        if !is_open_pair(graph, left, right) {
            if pools.headroom.is_empty() {
                stalls += 1;
                continue;
            }
            right = draw(&pools.headroom, rng)?;
            if !pools.reached_minimum(right) {
                stalls += 1;
                continue;
            }
            source = Source::Headroom;
        }
        if !is_open_pair(graph, left, right) {
            stalls += 1;
            continue;
        }

        pools.connect(graph, left, right, source)?;
        stalls = 0;
    }
    Ok(())
}

/// Picks uniformly among every edge that can still serve the minimum phase.
fn scan_minimum<R: Rng + ?Sized>(
    graph: &SimpleGraph,
    pools: &Pools,
    rng: &mut R,
) -> Option<(NodeId, NodeId, Source)> {
    let options: Vec<_> = minimum_partners(graph, pools)
        .into_iter()
        .filter(|&(left, right, _)| is_open_pair(graph, left, right))
        .collect();
    if options.is_empty() {
        return None;
    }
    Some(options[rng.gen_range(0..options.len())])
}

/// Lists every `(short, partner)` pair that could take one edge if the two
/// were not already adjacent. A short node may partner itself when it lacks
/// two or more edges.
fn minimum_partners(graph: &SimpleGraph, pools: &Pools) -> Vec<(NodeId, NodeId, Source)> {
    let nodes = graph.node_count();
    let mut partners = Vec::new();
    for left in (0..nodes).filter(|&node| !pools.reached_minimum(node)) {
        for right in 0..nodes {
            let short = pools.minimum.rank(right);
            if short > usize::from(right == left) {
                partners.push((left, right, Source::Minimum));
            } else if short == 0 && pools.headroom.rank(right) > 0 {
                partners.push((left, right, Source::Headroom));
            }
        }
    }
    partners
}

/// Rewires an existing edge onto a short node when no open pair remains.
fn switch_minimum<R: Rng + ?Sized>(
    graph: &mut SimpleGraph,
    pools: &mut Pools,
    rng: &mut R,
) -> Result<()> {
    let mut partners = minimum_partners(graph, pools);
    partners.shuffle(rng);
    for (left, right, source) in partners {
        if rewire_onto(graph, left, right, rng) {
            debug!(left, right, "rewired an edge onto a short node");
            return pools.consume(left, right, source);
        }
    }
    let node = (0..graph.node_count())
        .find(|&node| !pools.reached_minimum(node))
        .unwrap_or_default();
    Err(GenerationError::DegreeSequenceUnsatisfiable { node })
}

fn fill_headroom<R: Rng + ?Sized>(
    graph: &mut SimpleGraph,
    headroom: &mut OrderStatisticTree,
    target: usize,
    rng: &mut R,
) -> Result<()> {
    let nodes = graph.node_count();
    let mut edges = graph.edge_count();
    let mut stalls = 0_usize;

    while edges < target && headroom.len() > 1 {
        let (left, right) = if stalls > stall_limit(nodes, headroom.len()) {
            let open: Vec<(NodeId, NodeId)> = (0..nodes)
                .filter(|&node| headroom.rank(node) > 0)
                .flat_map(|left| (left + 1..nodes).map(move |right| (left, right)))
                .filter(|&(left, right)| {
                    headroom.rank(right) > 0 && is_open_pair(graph, left, right)
                })
                .collect();
            if open.is_empty() {
                debug!(edges, target, "no open pair left within the degree bounds");
                break;
            }
            open[rng.gen_range(0..open.len())]
        } else {
            (draw(headroom, rng)?, draw(headroom, rng)?)
        };

        if !is_open_pair(graph, left, right) {
            stalls += 1;
            continue;
        }
        graph.add_edge(left, right);
        headroom.remove(left)?;
        headroom.remove(right)?;
        edges += 1;
        stalls = 0;
    }
    Ok(())
}
