//! Benchmarks for headless frame advancement.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use driftglow::prelude::*;

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");

    for count in [80usize, 800, 8000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut sim: Simulation = Simulation::new(1920.0, 1080.0)
                .unwrap()
                .with_particle_count(count)
                .with_seed(1);
            sim.seed();
            b.iter(|| {
                sim.advance(black_box(&mut NullSurface));
            })
        });
    }

    group.finish();
}

fn bench_seed(c: &mut Criterion) {
    c.bench_function("seed_80", |b| {
        let mut sim: Simulation = Simulation::new(1920.0, 1080.0).unwrap().with_seed(1);
        b.iter(|| {
            sim.seed();
            black_box(sim.particles().len())
        })
    });
}

criterion_group!(benches, bench_advance, bench_seed);
criterion_main!(benches);
