//! Generation requests, their admission checks, and completed results.

use std::fmt;

use crate::{
    error::{GenerationError, Result},
    generators,
    graph::BoxedGraph,
    weights::WeightBounds,
};

/// Default largest node count accepted by [`GraphRequest::validate`].
pub const DEFAULT_MAX_NODES: usize = 100;
/// Default largest number of requests admitted as one batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;

/// Family of graph to generate, carrying its degree parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GraphKind {
    /// Every node has exactly `degree` neighbours.
    ExactDegree {
        /// Required degree of every node.
        degree: usize,
    },
    /// Every node has at least `min` neighbours.
    AtLeastDegree {
        /// Lower bound on every node's degree.
        min: usize,
    },
    /// Every node has between `min` and `max` neighbours inclusive.
    BetweenDegree {
        /// Lower bound on every node's degree.
        min: usize,
        /// Upper bound on every node's degree.
        max: usize,
    },
    /// The mean degree is `average`, up to rounding of the edge count.
    AverageDegree {
        /// Requested mean degree.
        average: f64,
    },
    /// Every pair of distinct nodes is adjacent.
    Complete,
}

impl GraphKind {
    /// Returns the stable kebab-case name of the kind.
    ///
    /// # Examples
    /// ```
    /// use graphgen_core::GraphKind;
    ///
    /// assert_eq!(GraphKind::BetweenDegree { min: 1, max: 3 }.name(), "between-degree");
    /// ```
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ExactDegree { .. } => "exact-degree",
            Self::AtLeastDegree { .. } => "at-least-degree",
            Self::BetweenDegree { .. } => "between-degree",
            Self::AverageDegree { .. } => "average-degree",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Admission limits applied before a request is queued.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RequestLimits {
    /// Largest accepted node count.
    pub max_nodes: usize,
    /// Largest number of requests accepted in one batch.
    pub max_batch_size: usize,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

/// Immutable description of one graph to generate.
///
/// The seed is always explicit: equal requests produce equal graphs.
///
/// # Examples
/// ```
/// use graphgen_core::{GraphKind, GraphRequest, RequestLimits, WeightBounds};
///
/// let request = GraphRequest::new(7, GraphKind::ExactDegree { degree: 3 }, 10, 99)
///     .with_connected(true)
///     .with_weights(WeightBounds::new(1, 5));
/// assert!(request.weighted());
/// assert!(request.validate(&RequestLimits::default()).is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GraphRequest {
    /// Caller-assigned identity echoed on the result.
    pub id: u32,
    /// Family and degree parameters.
    pub kind: GraphKind,
    /// Number of nodes.
    pub nodes: usize,
    /// Whether the graph must be connected.
    pub connected: bool,
    /// Seed for the request-local random generator.
    pub seed: u64,
    /// Weight bounds when the graph should be weighted.
    pub weights: Option<WeightBounds>,
}

impl GraphRequest {
    /// Creates an unweighted request that does not require connectivity.
    #[must_use]
    pub const fn new(id: u32, kind: GraphKind, nodes: usize, seed: u64) -> Self {
        Self {
            id,
            kind,
            nodes,
            connected: false,
            seed,
            weights: None,
        }
    }

    /// Sets whether the graph must be connected.
    #[must_use]
    pub const fn with_connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }

    /// Requests edge weights drawn from `bounds`.
    #[must_use]
    pub const fn with_weights(mut self, bounds: WeightBounds) -> Self {
        self.weights = Some(bounds);
        self
    }

    /// Returns `true` when edge weights were requested.
    #[must_use]
    pub const fn weighted(&self) -> bool {
        self.weights.is_some()
    }

    /// Checks the request against `limits` and the feasibility rules of its
    /// generator without generating anything.
    ///
    /// # Errors
    /// Returns [`GenerationError::EmptyGraph`] or
    /// [`GenerationError::NodeLimitExceeded`] for node counts outside
    /// `1..=limits.max_nodes`, [`GenerationError::InvalidParameters`] for
    /// infeasible degree or connectivity settings, and
    /// [`GenerationError::InvalidWeightBounds`] for unusable weight bounds.
    pub fn validate(&self, limits: &RequestLimits) -> Result<()> {
        let nodes = self.nodes;
        if nodes == 0 {
            return Err(GenerationError::EmptyGraph);
        }
        if nodes > limits.max_nodes {
            return Err(GenerationError::NodeLimitExceeded {
                nodes,
                max_nodes: limits.max_nodes,
            });
        }

        match self.kind {
            GraphKind::ExactDegree { degree } => {
                generators::validate_exact(nodes, degree, self.connected)?;
            }
            GraphKind::AtLeastDegree { min } => {
                generators::validate_between(nodes, min, nodes - 1, self.connected)?;
            }
            GraphKind::BetweenDegree { min, max } => {
                generators::validate_between(nodes, min, max, self.connected)?;
            }
            GraphKind::AverageDegree { average } => {
                generators::validate_average(nodes, average, self.connected)?;
            }
            GraphKind::Complete => {}
        }

        if let Some(bounds) = self.weights {
            bounds.validate()?;
        }
        Ok(())
    }
}

/// A generated graph tagged with the identity of its request.
#[derive(Debug)]
pub struct GraphResult {
    /// Identity copied from [`GraphRequest::id`].
    pub id: u32,
    /// The generated graph, weighted when the request asked for weights.
    pub graph: BoxedGraph,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::ErrorClass;

    fn request(kind: GraphKind, nodes: usize) -> GraphRequest {
        GraphRequest::new(1, kind, nodes, 0)
    }

    #[rstest]
    #[case::regular(request(GraphKind::ExactDegree { degree: 4 }, 10))]
    #[case::at_least(request(GraphKind::AtLeastDegree { min: 9 }, 10))]
    #[case::between_equal(request(GraphKind::BetweenDegree { min: 3, max: 3 }, 10))]
    #[case::average(request(GraphKind::AverageDegree { average: 3.5 }, 10).with_connected(true))]
    #[case::complete_limit(request(GraphKind::Complete, 100))]
    #[case::weighted(request(GraphKind::Complete, 3).with_weights(WeightBounds::new(-1, 0)))]
    fn feasible_requests_are_admitted(#[case] request: GraphRequest) {
        assert_eq!(request.validate(&RequestLimits::default()), Ok(()));
    }

    #[rstest]
    #[case::empty(request(GraphKind::Complete, 0))]
    #[case::odd_regular(request(GraphKind::ExactDegree { degree: 3 }, 7))]
    #[case::at_least_too_high(request(GraphKind::AtLeastDegree { min: 10 }, 10))]
    #[case::between_inverted(request(GraphKind::BetweenDegree { min: 4, max: 2 }, 10))]
    #[case::between_odd_regular(request(GraphKind::BetweenDegree { min: 3, max: 3 }, 7))]
    #[case::average_too_dense(request(GraphKind::AverageDegree { average: 9.0 }, 10))]
    #[case::disconnected_regular(
        request(GraphKind::ExactDegree { degree: 1 }, 10).with_connected(true)
    )]
    #[case::zero_weights(request(GraphKind::Complete, 3).with_weights(WeightBounds::new(0, 0)))]
    fn infeasible_requests_are_rejected(#[case] request: GraphRequest) {
        let err = request
            .validate(&RequestLimits::default())
            .expect_err("request is infeasible");
        assert_eq!(err.class(), ErrorClass::Validation);
    }

    #[test]
    fn node_limit_is_enforced() {
        let limits = RequestLimits {
            max_nodes: 8,
            ..RequestLimits::default()
        };
        assert_eq!(
            request(GraphKind::Complete, 9).validate(&limits),
            Err(GenerationError::NodeLimitExceeded {
                nodes: 9,
                max_nodes: 8
            })
        );
    }

    #[rstest]
    #[case(GraphKind::ExactDegree { degree: 1 }, "exact-degree")]
    #[case(GraphKind::AtLeastDegree { min: 1 }, "at-least-degree")]
    #[case(GraphKind::AverageDegree { average: 2.0 }, "average-degree")]
    #[case(GraphKind::Complete, "complete")]
    fn kinds_display_their_names(#[case] kind: GraphKind, #[case] name: &str) {
        assert_eq!(kind.to_string(), name);
    }
}
