//! Non-zero integer edge weights drawn from an inclusive range.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::instrument;

use crate::{
    error::{GenerationError, Result},
    graph::{BoxedGraph, Edge, Graph, WeightedGraph},
};

/// Inclusive bounds for generated edge weights.
///
/// # Examples
/// ```
/// use graphgen_core::WeightBounds;
///
/// let bounds = WeightBounds::new(-3, 3);
/// assert!(bounds.validate().is_ok());
/// assert!(WeightBounds::new(0, 0).validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WeightBounds {
    /// Smallest weight that may be drawn.
    pub min: i64,
    /// Largest weight that may be drawn.
    pub max: i64,
}

impl WeightBounds {
    /// Creates bounds covering `min..=max`.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Checks that the range is ordered and admits a non-zero value.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidWeightBounds`] when `max < min` or
    /// both bounds are zero.
    pub fn validate(self) -> Result<()> {
        if self.max < self.min || (self.min == 0 && self.max == 0) {
            return Err(GenerationError::InvalidWeightBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Wraps `graph` with a uniform non-zero weight in `bounds` for every edge.
///
/// Edges are visited once each in ascending order and draws landing on zero
/// are repeated, so a seeded generator yields the same weights every time.
/// Graphs that already carry weights are returned unchanged.
///
/// # Errors
/// Returns [`GenerationError::InvalidWeightBounds`] when `bounds` is rejected
/// by [`WeightBounds::validate`].
///
/// # Examples
/// ```
/// use graphgen_core::{BoxedGraph, Graph, SimpleGraph, WeightBounds, assign_weights};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(0);
/// let graph: BoxedGraph = Box::new(SimpleGraph::complete(5));
/// let weighted = assign_weights(graph, WeightBounds::new(1, 1), &mut rng)?;
/// let weights = weighted.weights().expect("weights were assigned");
/// assert_eq!(weights.len(), 10);
/// assert!(weights.values().all(|&weight| weight == 1));
/// # Ok::<(), graphgen_core::GenerationError>(())
/// ```
#[instrument(level = "debug", skip(graph, rng), fields(edges = graph.edge_count()), err)]
pub fn assign_weights<R: Rng + ?Sized>(
    graph: BoxedGraph,
    bounds: WeightBounds,
    rng: &mut R,
) -> Result<BoxedGraph> {
    bounds.validate()?;
    if graph.properties().weighted() {
        return Ok(graph);
    }

    let weights: BTreeMap<Edge, i64> = graph
        .edges()
        .into_iter()
        .map(|edge| (edge, draw_non_zero(bounds, rng)))
        .collect();
    Ok(Box::new(WeightedGraph::new(graph, weights)?))
}

fn draw_non_zero<R: Rng + ?Sized>(bounds: WeightBounds, rng: &mut R) -> i64 {
    loop {
        let value = rng.gen_range(bounds.min..=bounds.max);
        if value != 0 {
            return value;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use super::*;
    use crate::graph::SimpleGraph;

    fn cycle(nodes: usize) -> BoxedGraph {
        let mut graph = SimpleGraph::empty(nodes);
        for node in 0..nodes {
            graph.add_edge(node, (node + 1) % nodes);
        }
        Box::new(graph)
    }

    #[rstest]
    #[case::positive(1, 9)]
    #[case::straddles_zero(-2, 2)]
    #[case::only_negative(-5, -1)]
    #[case::zero_lower_bound(0, 1)]
    fn weights_are_non_zero_and_in_range(#[case] min: i64, #[case] max: i64) {
        let mut rng = SmallRng::seed_from_u64(17);
        let weighted =
            assign_weights(cycle(12), WeightBounds::new(min, max), &mut rng).expect("valid bounds");
        let weights = weighted.weights().expect("weighted");
        assert_eq!(weights.len(), 12);
        for edge in weighted.edges() {
            let weight = weighted.weight(edge).expect("every edge is weighted");
            assert_ne!(weight, 0);
            assert!((min..=max).contains(&weight));
        }
    }

    #[rstest]
    #[case::inverted(3, 1)]
    #[case::only_zero(0, 0)]
    fn invalid_bounds_are_rejected(#[case] min: i64, #[case] max: i64) {
        let mut rng = SmallRng::seed_from_u64(0);
        let err = assign_weights(cycle(3), WeightBounds::new(min, max), &mut rng)
            .expect_err("bounds admit no weight");
        assert_eq!(err, GenerationError::InvalidWeightBounds { min, max });
    }

    #[test]
    fn weighted_graphs_pass_through_unchanged() {
        let mut rng = SmallRng::seed_from_u64(1);
        let once = assign_weights(cycle(4), WeightBounds::new(10, 20), &mut rng).expect("valid");
        let before = once.weights().cloned();
        let twice = assign_weights(once, WeightBounds::new(-1, -1), &mut rng).expect("valid");
        assert_eq!(twice.weights().cloned(), before);
    }

    #[test]
    fn seeded_weights_repeat() {
        let run = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            assign_weights(cycle(9), WeightBounds::new(-50, 50), &mut rng)
                .expect("valid")
                .weights()
                .cloned()
        };
        assert_eq!(run(3), run(3));
    }
}
