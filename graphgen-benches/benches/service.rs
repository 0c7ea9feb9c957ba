//! Generation service throughput benchmarks.
//!
//! Pushes a full batch through a running pool and waits for every result, so
//! the measurement covers queueing, dispatch and generation together.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use graphgen_benches::{error::BenchSetupError, params::ServiceBenchParams};
use graphgen_core::{GenerationService, GraphKind, GraphRequest, ServiceBuilder};

const WORKER_COUNTS: &[usize] = &[1, 2, 4];
const BATCH: usize = 50;
const NODES: usize = 60;

fn batch() -> Vec<GraphRequest> {
    (0_u32..)
        .take(BATCH)
        .map(|id| {
            GraphRequest::new(id, GraphKind::ExactDegree { degree: 4 }, NODES, u64::from(id))
                .with_connected(true)
        })
        .collect()
}

fn run_batch(service: &GenerationService) -> Result<(), BenchSetupError> {
    service.push_batch(batch())?;
    let results = service.results();
    let received = results.iter().take(BATCH).count();
    if received == BATCH {
        Ok(())
    } else {
        Err(BenchSetupError::MissingResults {
            expected: BATCH,
            received,
        })
    }
}

fn service_batch_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("service_batch");
    group.sample_size(20);
    group.throughput(Throughput::Elements(BATCH as u64));

    for &workers in WORKER_COUNTS {
        let params = ServiceBenchParams {
            workers,
            batch: BATCH,
        };
        let config = ServiceBuilder::new()
            .with_workers(workers)
            .with_max_batch_size(BATCH)
            .build()?;
        let service = GenerationService::new(config);
        service.start()?;
        run_batch(&service)?;

        group.bench_with_input(BenchmarkId::from_parameter(params), &service, |b, service| {
            b.iter(|| run_batch(service));
        });
        service.stop()?;
    }

    group.finish();
    Ok(())
}

fn service_batch(c: &mut Criterion) {
    if let Err(err) = service_batch_impl(c) {
        panic!("service_batch benchmark setup failed: {err}");
    }
}

criterion_group!(benches, service_batch);
criterion_main!(benches);
