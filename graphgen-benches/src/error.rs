//! Benchmark setup error type.

use graphgen_core::{GenerationError, OrderStatisticError, ServiceError};

/// Errors that may occur while preparing or running a benchmark.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// A generator rejected its parameters or failed to converge.
    #[error("graph generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// An order-statistic query went out of bounds.
    #[error("order-statistic query failed: {0}")]
    Sampling(#[from] OrderStatisticError),
    /// The generation service rejected a configuration or request.
    #[error("service operation failed: {0}")]
    Service(#[from] ServiceError),
    /// The service stopped publishing before every result arrived.
    #[error("expected {expected} results but received {received}")]
    MissingResults {
        /// Results the benchmark waited for.
        expected: usize,
        /// Results that actually arrived.
        received: usize,
    },
}
