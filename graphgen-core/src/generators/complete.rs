use tracing::instrument;

use crate::{
    error::{GenerationError, Result},
    graph::SimpleGraph,
};

/// Generates the complete graph on `nodes` nodes.
///
/// # Errors
/// Returns [`GenerationError::EmptyGraph`] when `nodes` is zero.
#[instrument(level = "debug", err)]
pub fn complete(nodes: usize) -> Result<SimpleGraph> {
    if nodes == 0 {
        return Err(GenerationError::EmptyGraph);
    }
    Ok(SimpleGraph::complete(nodes))
}
