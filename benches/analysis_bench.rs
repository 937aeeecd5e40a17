use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use vterm::analysis::{compute_deviation_summary, estimate_terminal_velocity};
use vterm::config::PhysicsParams;
use vterm::run::SimulationRun;
use vterm::simulate::{simulate, LaunchConditions};

fn setup_runs(params: &PhysicsParams) -> Vec<SimulationRun> {
    let launch = LaunchConditions::default();
    [10, 20, 50, 100, 200, 500, 1000, 10_000]
        .iter()
        .map(|&n| simulate(&launch, params, n, false).expect("Failed to simulate run"))
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let params = PhysicsParams::default();
    let runs = setup_runs(&params);

    c.bench_function("deviation_summary (8 runs, 12k samples)", |b| {
        b.iter(|| {
            compute_deviation_summary(
                black_box(&runs),
                params.mass,
                params.gravity,
                params.duration,
            )
        })
    });

    let long = &runs[runs.len() - 1];
    c.bench_function("terminal_velocity (10k steps)", |b| {
        b.iter(|| estimate_terminal_velocity(black_box(long), &params))
    });

    let launch = LaunchConditions::default();
    c.bench_function("rk4 simulate (1k steps)", |b| {
        b.iter(|| simulate(&launch, &params, black_box(1000), false))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
