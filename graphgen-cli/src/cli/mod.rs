//! Command-line interface for generating random graphs.
//!
//! The `generate` command turns flags into a batch of requests, runs them
//! through a [`graphgen_core::GenerationService`], and renders the results as
//! an adjacency matrix, Graphviz dot, or JSON.

mod commands;
mod render;

pub use commands::{
    Cli, CliError, Command, GenerateCommand, GenerationSummary, KindArg, ServiceArgs, run_cli,
};
pub use render::{OutputFormat, render_dot, render_json, render_matrix, render_summary};
