//! Random graph generation under degree, connectivity and weight constraints,
//! served by a bounded worker pool.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod connectivity;
mod dispatch;
mod error;
pub mod generators;
mod graph;
mod order_stats;
mod request;
mod service;
pub mod spanning;
mod weights;

pub use crate::{
    dispatch::generate,
    error::{
        ErrorClass, GenerationError, GenerationErrorCode, GraphError, GraphErrorCode,
        OrderStatisticError, OrderStatisticErrorCode, Result, ServiceError, ServiceErrorCode,
        ServiceOperation,
    },
    graph::{
        BoxedGraph, Edge, Graph, GraphProperties, NamedGraph, NodeId, SimpleGraph, WeightedGraph,
    },
    order_stats::OrderStatisticTree,
    request::{
        DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_NODES, GraphKind, GraphRequest, GraphResult,
        RequestLimits,
    },
    service::{
        DEFAULT_WORKERS, GenerationService, ServiceBuilder, ServiceConfig, ServiceState,
    },
    weights::{WeightBounds, assign_weights},
};
