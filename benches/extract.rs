//! Benchmarks for fitness history extraction.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use evosweep::schema::{Individual, OptimizerState, TaskType};
use evosweep::sweep::{quality_sequence, run_history};

fn synthetic_state(generations: usize, population: usize) -> OptimizerState {
    let make_population = |offset: f64| {
        (0..population)
            .map(|i| Individual::vector(vec![-(0.5 + offset + i as f64 * 1e-4), i as f64]))
            .collect::<Vec<_>>()
    };

    OptimizerState {
        individuals: (0..generations)
            .map(|g| make_population(g as f64 * 1e-3))
            .collect(),
        archive_history: (0..generations)
            .map(|g| make_population(g as f64 * 1e-3 + 0.1))
            .collect(),
    }
}

fn bench_quality_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("quality_sequence");

    for size in [100, 1_000, 10_000] {
        let population: Vec<Individual> = (0..size)
            .map(|i| Individual::vector(vec![-(0.5 + i as f64 * 1e-5), 2.0]))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| quality_sequence(black_box(&population), TaskType::Classification));
        });
    }

    group.finish();
}

fn bench_run_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_history");

    for (generations, population) in [(30, 20), (100, 50), (200, 100)] {
        let state = synthetic_state(generations, population);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", generations, population)),
            &generations,
            |b, _| {
                b.iter(|| run_history(black_box(&state), TaskType::Classification, true));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_quality_sequence, bench_run_history);
criterion_main!(benches);
