//! Benchmark parameter types rendered into Criterion benchmark ids.

use std::fmt;

/// Parameters for a degree-constrained generator run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GeneratorBenchParams {
    /// Number of nodes in the graph.
    pub nodes: usize,
    /// Degree, or lower degree bound, passed to the generator.
    pub degree: usize,
    /// Whether the generator must produce a connected graph.
    pub connected: bool,
}

impl fmt::Display for GeneratorBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},d={}", self.nodes, self.degree)?;
        if self.connected {
            f.write_str(",connected")?;
        }
        Ok(())
    }
}

/// Parameters for a batch pushed through the generation service.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ServiceBenchParams {
    /// Worker threads in the pool.
    pub workers: usize,
    /// Requests per batch.
    pub batch: usize,
}

impl fmt::Display for ServiceBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "workers={},batch={}", self.workers, self.batch)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(GeneratorBenchParams { nodes: 50, degree: 4, connected: false }, "n=50,d=4")]
    #[case(GeneratorBenchParams { nodes: 80, degree: 3, connected: true }, "n=80,d=3,connected")]
    fn generator_params_render_compactly(
        #[case] params: GeneratorBenchParams,
        #[case] expected: &str,
    ) {
        assert_eq!(params.to_string(), expected);
    }

    #[test]
    fn service_params_name_workers_and_batch() {
        let params = ServiceBenchParams { workers: 4, batch: 50 };
        assert_eq!(params.to_string(), "workers=4,batch=50");
    }
}
