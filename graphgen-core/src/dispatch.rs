//! Routes a request to its generator and applies weights.

use rand::{SeedableRng, rngs::SmallRng};
use tracing::instrument;

use crate::{
    error::Result,
    generators,
    graph::{BoxedGraph, SimpleGraph},
    request::{GraphKind, GraphRequest, GraphResult},
    weights::assign_weights,
};

/// Generates the graph described by `request`.
///
/// A fresh [`SmallRng`] seeded from [`GraphRequest::seed`] drives every
/// random choice, so the same request always yields the same graph no matter
/// which thread runs it.
///
/// # Errors
/// Propagates the [`crate::GenerationError`] of the selected generator or of
/// weight assignment.
///
/// # Examples
/// ```
/// use graphgen_core::{Graph, GraphKind, GraphRequest, generate};
///
/// let request = GraphRequest::new(2233, GraphKind::Complete, 3, 255);
/// let result = generate(&request)?;
/// assert_eq!(result.id, 2233);
/// assert!((0..3).all(|node| result.graph.degree(node) == 2));
/// # Ok::<(), graphgen_core::GenerationError>(())
/// ```
#[instrument(
    name = "generate",
    err,
    skip(request),
    fields(id = request.id, kind = %request.kind, nodes = request.nodes),
)]
pub fn generate(request: &GraphRequest) -> Result<GraphResult> {
    let mut rng = SmallRng::seed_from_u64(request.seed);
    let nodes = request.nodes;
    let connected = request.connected;

    let graph: SimpleGraph = match request.kind {
        GraphKind::ExactDegree { degree } => {
            generators::exact_degree(nodes, degree, connected, &mut rng)?
        }
        GraphKind::AtLeastDegree { min } => {
            generators::at_least_degree(nodes, min, connected, &mut rng)?
        }
        GraphKind::BetweenDegree { min, max } => {
            generators::between_degree(nodes, min, max, connected, &mut rng)?
        }
        GraphKind::AverageDegree { average } => {
            generators::average_degree(nodes, average, connected, &mut rng)?
        }
        GraphKind::Complete => generators::complete(nodes)?,
    };

    let mut graph: BoxedGraph = Box::new(graph);
    if let Some(bounds) = request.weights {
        graph = assign_weights(graph, bounds, &mut rng)?;
    }
    Ok(GraphResult {
        id: request.id,
        graph,
    })
}
