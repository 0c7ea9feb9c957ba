//! Order-statistic tree benchmarks.
//!
//! Measures draining a tree by repeatedly selecting a uniformly random unit
//! and removing it, which is the inner loop of every generator.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use graphgen_benches::error::BenchSetupError;
use graphgen_core::OrderStatisticTree;
use rand::{Rng, SeedableRng, rngs::SmallRng};

const SEED: u64 = 42;

/// Point counts to benchmark.
const POINT_COUNTS: &[usize] = &[100, 1_000, 10_000];

/// Units held by every point.
const WIDTH: usize = 8;

fn drain(tree: &mut OrderStatisticTree, rng: &mut SmallRng) -> Result<usize, BenchSetupError> {
    let mut removed = 0;
    while !tree.is_empty() {
        let point = tree.select(rng.gen_range(0..tree.len()))?;
        tree.remove(point)?;
        removed += 1;
    }
    Ok(removed)
}

fn order_stats_drain_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("order_stats_drain");

    for &points in POINT_COUNTS {
        let widths = vec![WIDTH; points];
        // Surface setup failures once, outside the timed loop.
        drain(&mut OrderStatisticTree::new(&widths), &mut SmallRng::seed_from_u64(SEED))?;

        group.bench_with_input(BenchmarkId::from_parameter(points), &widths, |b, widths| {
            b.iter(|| {
                let mut rng = SmallRng::seed_from_u64(SEED);
                let mut tree = OrderStatisticTree::new(widths);
                drain(&mut tree, &mut rng)
            });
        });
    }

    group.finish();
    Ok(())
}

fn order_stats_drain(c: &mut Criterion) {
    if let Err(err) = order_stats_drain_impl(c) {
        panic!("order_stats_drain benchmark setup failed: {err}");
    }
}

criterion_group!(benches, order_stats_drain);
criterion_main!(benches);
