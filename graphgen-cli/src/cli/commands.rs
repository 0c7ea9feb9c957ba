//! Argument parsing and execution of the `generate` command.

use clap::{Args, Parser, Subcommand, ValueEnum};
use graphgen_core::{
    DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_NODES, DEFAULT_WORKERS, GenerationService, GraphKind,
    GraphRequest, GraphResult, ServiceBuilder, ServiceConfig, ServiceError, WeightBounds,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

use super::render::OutputFormat;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "graphgen", about = "Generate random graphs under degree constraints.")]
pub struct Cli {
    /// Worker pool settings.
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Worker pool and admission limits. Each flag falls back to an environment
/// variable.
#[derive(Debug, Args, Clone, PartialEq, Eq)]
pub struct ServiceArgs {
    /// Number of generation workers.
    #[arg(long, global = true, env = "GRAPHGEN_WORKERS", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Largest node count accepted per request.
    #[arg(long, global = true, env = "GRAPHGEN_MAX_NODES", default_value_t = DEFAULT_MAX_NODES)]
    pub max_nodes: usize,

    /// Largest number of requests accepted in one batch.
    #[arg(
        long,
        global = true,
        env = "GRAPHGEN_MAX_BATCH_SIZE",
        default_value_t = DEFAULT_MAX_BATCH_SIZE,
    )]
    pub max_batch_size: usize,

    /// Capacity of the input and output queues (derived when omitted).
    #[arg(long, global = true, env = "GRAPHGEN_QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,
}

impl Default for ServiceArgs {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            max_nodes: DEFAULT_MAX_NODES,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            queue_capacity: None,
        }
    }
}

impl ServiceArgs {
    fn config(&self) -> Result<ServiceConfig, ServiceError> {
        let builder = ServiceBuilder::new()
            .with_workers(self.workers)
            .with_max_nodes(self.max_nodes)
            .with_max_batch_size(self.max_batch_size);
        match self.queue_capacity {
            Some(capacity) => builder.with_queue_capacity(capacity).build(),
            None => builder.build(),
        }
    }
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate one or more graphs and print them to stdout.
    Generate(GenerateCommand),
}

/// Graph families selectable with `--kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Every node has exactly `--degree` neighbours.
    ExactDegree,
    /// Every node has at least `--min-degree` neighbours.
    AtLeastDegree,
    /// Degrees lie between `--min-degree` and `--max-degree`.
    BetweenDegree,
    /// Mean degree equals `--average`.
    AverageDegree,
    /// Every pair of nodes is adjacent.
    Complete,
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Graph family to generate.
    #[arg(long, value_enum)]
    pub kind: KindArg,

    /// Number of nodes in each graph.
    #[arg(long)]
    pub nodes: usize,

    /// Degree for `exact-degree`.
    #[arg(long)]
    pub degree: Option<usize>,

    /// Lower degree bound for `at-least-degree` and `between-degree`.
    #[arg(long)]
    pub min_degree: Option<usize>,

    /// Upper degree bound for `between-degree`.
    #[arg(long)]
    pub max_degree: Option<usize>,

    /// Mean degree for `average-degree`.
    #[arg(long)]
    pub average: Option<f64>,

    /// Require every generated graph to be connected.
    #[arg(long)]
    pub connected: bool,

    /// Seed of the first graph; later graphs use consecutive seeds. Drawn
    /// from OS entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Smallest edge weight. Requires `--weight-max`.
    #[arg(long, requires = "weight_max", allow_negative_numbers = true)]
    pub weight_min: Option<i64>,

    /// Largest edge weight. Requires `--weight-min`.
    #[arg(long, requires = "weight_min", allow_negative_numbers = true)]
    pub weight_max: Option<i64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Matrix)]
    pub format: OutputFormat,

    /// Number of graphs to generate.
    #[arg(long, default_value_t = 1)]
    pub count: u32,
}

impl GenerateCommand {
    /// Builds the batch of requests described by the flags.
    ///
    /// # Errors
    /// Returns [`CliError::MissingParameter`] when `--kind` needs a flag that
    /// was not given and [`CliError::IncompleteWeights`] when only one
    /// weight bound is present.
    pub fn requests(&self) -> Result<Vec<GraphRequest>, CliError> {
        let kind = self.graph_kind()?;
        let weights = match (self.weight_min, self.weight_max) {
            (Some(min), Some(max)) => Some(WeightBounds::new(min, max)),
            (None, None) => None,
            _ => return Err(CliError::IncompleteWeights),
        };
        let first_seed = self.seed.unwrap_or_else(rand::random);

        Ok((0..self.count)
            .map(|id| {
                let seed = first_seed.wrapping_add(u64::from(id));
                let request =
                    GraphRequest::new(id, kind, self.nodes, seed).with_connected(self.connected);
                match weights {
                    Some(bounds) => request.with_weights(bounds),
                    None => request,
                }
            })
            .collect())
    }

    fn graph_kind(&self) -> Result<GraphKind, CliError> {
        let kind = match self.kind {
            KindArg::ExactDegree => GraphKind::ExactDegree {
                degree: require(self.kind, "--degree", self.degree)?,
            },
            KindArg::AtLeastDegree => GraphKind::AtLeastDegree {
                min: require(self.kind, "--min-degree", self.min_degree)?,
            },
            KindArg::BetweenDegree => GraphKind::BetweenDegree {
                min: require(self.kind, "--min-degree", self.min_degree)?,
                max: require(self.kind, "--max-degree", self.max_degree)?,
            },
            KindArg::AverageDegree => GraphKind::AverageDegree {
                average: require(self.kind, "--average", self.average)?,
            },
            KindArg::Complete => GraphKind::Complete,
        };
        Ok(kind)
    }
}

fn require<T>(kind: KindArg, flag: &'static str, value: Option<T>) -> Result<T, CliError> {
    value.ok_or(CliError::MissingParameter { kind, flag })
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The selected graph kind needs a flag that was not supplied.
    #[error("--kind {kind:?} requires {flag}")]
    MissingParameter {
        /// Kind that was selected.
        kind: KindArg,
        /// Flag that is missing.
        flag: &'static str,
    },
    /// Only one of `--weight-min` and `--weight-max` was supplied.
    #[error("--weight-min and --weight-max must be given together")]
    IncompleteWeights,
    /// Some requests produced no graph.
    #[error("no graph was produced for request ids {ids:?}")]
    MissingResults {
        /// Ids of the requests that were dropped during generation.
        ids: Vec<u32>,
    },
    /// The generation service rejected the configuration or a request.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Graphs produced by one CLI invocation, ordered by request id.
#[derive(Debug)]
pub struct GenerationSummary {
    /// Format the graphs should be rendered in.
    pub format: OutputFormat,
    /// Generated graphs in ascending id order.
    pub results: Vec<GraphResult>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the flags are inconsistent, the service rejects
/// its configuration or a request, or a request fails during generation.
///
/// # Examples
/// ```
/// use clap::Parser;
/// use graphgen_cli::cli::{Cli, run_cli};
/// use graphgen_core::Graph;
///
/// let cli = Cli::try_parse_from([
///     "graphgen", "generate", "--kind", "complete", "--nodes", "3", "--seed", "255",
/// ])?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.results.len(), 1);
/// assert_eq!(summary.results[0].graph.edge_count(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty, workers = cli.service.workers),
)]
pub fn run_cli(cli: Cli) -> Result<GenerationSummary, CliError> {
    match cli.command {
        Command::Generate(generate) => {
            Span::current().record("command", field::display("generate"));
            run_generate(&cli.service, &generate)
        }
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(settings, command),
    fields(kind = ?command.kind, nodes = command.nodes, count = command.count),
)]
pub(super) fn run_generate(
    settings: &ServiceArgs,
    command: &GenerateCommand,
) -> Result<GenerationSummary, CliError> {
    let requests = command.requests()?;
    let requested: Vec<u32> = requests.iter().map(|request| request.id).collect();

    let service = GenerationService::new(settings.config()?);
    service.start()?;
    let pushed = service.push_batch(requests);
    // Stop drains whatever was queued before the push failed.
    service.stop()?;
    pushed?;

    let mut results: Vec<GraphResult> = service.results().try_iter().collect();
    results.sort_by_key(|result| result.id);
    let pending = missing_ids(requested, &results);
    if !pending.is_empty() {
        warn!(missing = pending.len(), "some requests produced no graph");
        return Err(CliError::MissingResults { ids: pending });
    }

    info!(graphs = results.len(), "generation completed");
    Ok(GenerationSummary {
        format: command.format,
        results,
    })
}

/// Returns the ids in `requested` with no entry in `results`, which must be
/// sorted by id.
pub(super) fn missing_ids(mut requested: Vec<u32>, results: &[GraphResult]) -> Vec<u32> {
    requested.retain(|id| results.binary_search_by_key(id, |result| result.id).is_err());
    requested
}
