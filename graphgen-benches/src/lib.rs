//! Benchmark support crate for graphgen.
//!
//! Provides parameter types and a setup error shared by the Criterion
//! benchmarks for the order-statistic tree, the generators and the service.

pub mod error;
pub mod params;
