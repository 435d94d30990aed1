//! Benchmarks for the path optimizer and full estimation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lasertime_core::{Movement, Point};
use lasertime_estimator::{CuttingTimeEstimator, CuttingTimeOptions, PathOptimizer};

/// A grid of closed squares emitted in a scattered order.
fn scattered_squares(n: usize) -> Vec<Movement> {
    let mut moves = Vec::with_capacity(n * 4);
    for i in 0..n {
        let j = (i * 7919) % n;
        let x = (j % 20) as f64 * 15.0;
        let y = (j / 20) as f64 * 15.0;
        let corners = [
            Point::new(x, y),
            Point::new(x + 10.0, y),
            Point::new(x + 10.0, y + 10.0),
            Point::new(x, y + 10.0),
        ];
        for k in 0..4 {
            moves.push(Movement::cut(corners[k], corners[(k + 1) % 4]));
        }
    }
    moves
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_optimizer");
    let optimizer = PathOptimizer::default();

    for &n in &[10, 100, 400] {
        let moves = scattered_squares(n);
        group.bench_with_input(BenchmarkId::new("squares", n), &moves, |b, m| {
            b.iter(|| black_box(optimizer.optimize(black_box(m))))
        });
    }
    group.finish();
}

fn bench_estimate(c: &mut Criterion) {
    let estimator = CuttingTimeEstimator::default();
    let moves = scattered_squares(200);
    let opts = CuttingTimeOptions::new(3.0).with_optimize(true);
    c.bench_function("estimate_200_squares", |b| {
        b.iter(|| black_box(estimator.estimate(black_box(&moves), &opts)))
    });
}

criterion_group!(benches, bench_optimize, bench_estimate);
criterion_main!(benches);
