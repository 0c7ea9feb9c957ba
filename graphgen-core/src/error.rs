//! Error types for the graph generation core.
//!
//! Every public error enum carries a stable machine-readable code so callers
//! can log and match failures without depending on message text.

use std::{fmt, io};

use thiserror::Error;

use crate::graph::Edge;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Errors raised while assembling graph decorators.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// A weight was supplied for a pair of nodes that are not adjacent.
    #[error("weight supplied for absent edge {edge}")]
    MissingEdge {
        /// The pair that carried a weight without an edge.
        edge: Edge,
    },
    /// Weights must never be zero.
    #[error("edge {edge} has a zero weight")]
    ZeroWeight {
        /// The edge holding the zero weight.
        edge: Edge,
    },
    /// A node label list did not match the node count of the inner graph.
    #[error("{names} node names supplied for a graph with {nodes} nodes")]
    NameCountMismatch {
        /// Number of labels supplied.
        names: usize,
        /// Number of nodes in the wrapped graph.
        nodes: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// A weight was supplied for a pair of nodes that are not adjacent.
        MissingEdge => MissingEdge { .. } => "GRAPH_MISSING_EDGE",
        /// Weights must never be zero.
        ZeroWeight => ZeroWeight { .. } => "GRAPH_ZERO_WEIGHT",
        /// A node label list did not match the node count.
        NameCountMismatch => NameCountMismatch { .. } => "GRAPH_NAME_COUNT_MISMATCH",
    }
}

/// Errors raised by [`crate::OrderStatisticTree`] queries.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum OrderStatisticError {
    /// The tree holds no remaining weight.
    #[error("order-statistic tree holds no remaining weight")]
    Empty,
    /// A selection index was at or past the total remaining weight.
    #[error("index {index} is outside the remaining weight {len}")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Total remaining weight at the time of the query.
        len: usize,
    },
    /// A point identity outside `0..points` was referenced.
    #[error("point {point} is not part of a tree over {points} points")]
    UnknownPoint {
        /// Offending point identity.
        point: usize,
        /// Number of points in the tree.
        points: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`OrderStatisticError`] variants.
    enum OrderStatisticErrorCode for OrderStatisticError {
        /// The tree holds no remaining weight.
        Empty => Empty => "ORDER_STATS_EMPTY",
        /// A selection index was at or past the total remaining weight.
        IndexOutOfRange => IndexOutOfRange { .. } => "ORDER_STATS_INDEX_OUT_OF_RANGE",
        /// A point identity outside the tree was referenced.
        UnknownPoint => UnknownPoint { .. } => "ORDER_STATS_UNKNOWN_POINT",
    }
}

/// Broad classification of generation failures.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    /// The request parameters can never be satisfied; resubmitting unchanged
    /// parameters fails again.
    Validation,
    /// The randomised construction could not converge within its retry caps.
    Capacity,
}

/// Errors produced while generating a graph.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GenerationError {
    /// A graph must contain at least one node.
    #[error("a graph must contain at least one node")]
    EmptyGraph,
    /// Degree or connectivity parameters are infeasible for the node count.
    #[error("invalid {generator} parameters: {reason}")]
    InvalidParameters {
        /// Generator that rejected the parameters.
        generator: &'static str,
        /// Human-readable description of the violated precondition.
        reason: String,
    },
    /// Weight bounds are inverted or admit only zero.
    #[error("invalid weight bounds [{min}, {max}]")]
    InvalidWeightBounds {
        /// Lower bound supplied by the caller.
        min: i64,
        /// Upper bound supplied by the caller.
        max: i64,
    },
    /// A request exceeded the configured node limit.
    #[error("{nodes} nodes requested but at most {max_nodes} are allowed")]
    NodeLimitExceeded {
        /// Requested node count.
        nodes: usize,
        /// Configured maximum.
        max_nodes: usize,
    },
    /// The regular-graph pairing restarted too many times without finishing.
    #[error("random pairing did not complete after {attempts} attempts")]
    PairingExhausted {
        /// Number of full attempts made.
        attempts: usize,
    },
    /// Connectivity repair could not merge every component.
    #[error("connectivity repair left {components} components after {passes} passes")]
    ConnectivityRepairExhausted {
        /// Number of repair passes executed.
        passes: usize,
        /// Components remaining after the final pass.
        components: usize,
    },
    /// No valid edge remains that can lift a node to its minimum degree.
    #[error("node {node} cannot reach its minimum degree")]
    DegreeSequenceUnsatisfiable {
        /// Node still below its minimum degree.
        node: usize,
    },
    /// The order-statistic tree was queried outside its bounds.
    #[error("point sampling failed: {0}")]
    Sampling(#[from] OrderStatisticError),
    /// A graph decorator rejected its input.
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),
}

define_error_codes! {
    /// Stable codes describing [`GenerationError`] variants.
    enum GenerationErrorCode for GenerationError {
        /// A graph must contain at least one node.
        EmptyGraph => EmptyGraph => "GENERATION_EMPTY_GRAPH",
        /// Degree or connectivity parameters are infeasible.
        InvalidParameters => InvalidParameters { .. } => "GENERATION_INVALID_PARAMETERS",
        /// Weight bounds are inverted or admit only zero.
        InvalidWeightBounds => InvalidWeightBounds { .. } => "GENERATION_INVALID_WEIGHT_BOUNDS",
        /// A request exceeded the configured node limit.
        NodeLimitExceeded => NodeLimitExceeded { .. } => "GENERATION_NODE_LIMIT_EXCEEDED",
        /// The regular-graph pairing restarted too many times.
        PairingExhausted => PairingExhausted { .. } => "GENERATION_PAIRING_EXHAUSTED",
        /// Connectivity repair could not merge every component.
        ConnectivityRepairExhausted => ConnectivityRepairExhausted { .. } => "GENERATION_CONNECTIVITY_REPAIR_EXHAUSTED",
        /// No valid edge remains to satisfy a minimum degree.
        DegreeSequenceUnsatisfiable => DegreeSequenceUnsatisfiable { .. } => "GENERATION_DEGREE_SEQUENCE_UNSATISFIABLE",
        /// The order-statistic tree was queried outside its bounds.
        Sampling => Sampling(..) => "GENERATION_SAMPLING",
        /// A graph decorator rejected its input.
        Graph => Graph(..) => "GENERATION_GRAPH",
    }
}

impl GenerationError {
    pub(crate) fn invalid(generator: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            generator,
            reason: reason.into(),
        }
    }

    /// Classifies the failure as a validation or capacity error.
    ///
    /// # Examples
    /// ```
    /// use graphgen_core::{ErrorClass, GenerationError};
    ///
    /// assert_eq!(GenerationError::EmptyGraph.class(), ErrorClass::Validation);
    /// let stuck = GenerationError::PairingExhausted { attempts: 64 };
    /// assert_eq!(stuck.class(), ErrorClass::Capacity);
    /// ```
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::PairingExhausted { .. }
            | Self::ConnectivityRepairExhausted { .. }
            | Self::DegreeSequenceUnsatisfiable { .. }
            | Self::Sampling(_)
            | Self::Graph(_) => ErrorClass::Capacity,
            Self::EmptyGraph
            | Self::InvalidParameters { .. }
            | Self::InvalidWeightBounds { .. }
            | Self::NodeLimitExceeded { .. } => ErrorClass::Validation,
        }
    }
}

/// Lifecycle operations exposed by [`crate::GenerationService`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ServiceOperation {
    /// Launch the worker pool.
    Start,
    /// Park every worker.
    Pause,
    /// Release parked workers.
    Resume,
    /// Enqueue a request.
    Push,
    /// Close the input queue and drain.
    Stop,
}

impl ServiceOperation {
    /// Returns the lowercase operation name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Push => "push",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for ServiceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned synchronously by [`crate::GenerationService`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The operation is not permitted in the current lifecycle state.
    #[error("cannot {operation} a service that is {state}")]
    InvalidState {
        /// Operation that was attempted.
        operation: ServiceOperation,
        /// State the service was in.
        state: crate::ServiceState,
    },
    /// The service configuration was rejected.
    #[error("invalid service configuration: {reason}")]
    InvalidConfig {
        /// Description of the rejected setting.
        reason: String,
    },
    /// A batch exceeded the configured maximum batch size.
    #[error("batch of {requested} requests exceeds the limit of {max_batch_size}")]
    BatchTooLarge {
        /// Number of requests in the batch.
        requested: usize,
        /// Configured maximum batch size.
        max_batch_size: usize,
    },
    /// The input queue lacks room for a whole batch.
    #[error("batch of {requested} requests does not fit into {free} free queue slots")]
    InsufficientCapacity {
        /// Number of requests in the batch.
        requested: usize,
        /// Free slots observed in the input queue.
        free: usize,
    },
    /// A request failed admission checks.
    #[error("request {id} rejected: {source}")]
    InvalidRequest {
        /// Identity of the rejected request.
        id: u32,
        /// Underlying validation failure.
        #[source]
        source: GenerationError,
    },
    /// The operating system refused to spawn a worker thread.
    #[error("failed to spawn worker {worker}: {source}")]
    WorkerSpawn {
        /// Index of the worker that could not be spawned.
        worker: usize,
        /// Error reported by the thread builder.
        #[source]
        source: io::Error,
    },
    /// A worker thread terminated by panicking outside request processing.
    #[error("worker {worker} panicked")]
    WorkerPanicked {
        /// Index of the worker that panicked.
        worker: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`ServiceError`] variants.
    enum ServiceErrorCode for ServiceError {
        /// The operation is not permitted in the current lifecycle state.
        InvalidState => InvalidState { .. } => "SERVICE_INVALID_STATE",
        /// The service configuration was rejected.
        InvalidConfig => InvalidConfig { .. } => "SERVICE_INVALID_CONFIG",
        /// A batch exceeded the configured maximum batch size.
        BatchTooLarge => BatchTooLarge { .. } => "SERVICE_BATCH_TOO_LARGE",
        /// The input queue lacks room for a whole batch.
        InsufficientCapacity => InsufficientCapacity { .. } => "SERVICE_INSUFFICIENT_CAPACITY",
        /// A request failed admission checks.
        InvalidRequest => InvalidRequest { .. } => "SERVICE_INVALID_REQUEST",
        /// A worker thread could not be spawned.
        WorkerSpawn => WorkerSpawn { .. } => "SERVICE_WORKER_SPAWN",
        /// A worker thread panicked.
        WorkerPanicked => WorkerPanicked { .. } => "SERVICE_WORKER_PANICKED",
    }
}

impl ServiceError {
    /// Retrieve the inner [`GenerationErrorCode`] when a request was rejected.
    #[must_use]
    pub const fn generation_code(&self) -> Option<GenerationErrorCode> {
        match self {
            Self::InvalidRequest { source, .. } => Some(source.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the generators.
pub type Result<T> = core::result::Result<T, GenerationError>;
