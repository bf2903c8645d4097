//! Criterion benchmarks for the colony engine.
//!
//! Uses seeded random instances so every variant is measured on the same
//! cities.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_aco::instance::random_cities;
use u_aco::local_search::two_opt;
use u_aco::{AcoConfig, AcoVariant, ColonyRunner, DistanceModel};

fn bench_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("colony_variants");
    group.sample_size(10);

    for &n in &[20usize, 50, 100] {
        let cities = random_cities(n, 1000.0, 1000.0, Some(42)).unwrap();
        for variant in AcoVariant::ALL {
            let config = AcoConfig::default()
                .with_variant(variant)
                .with_ants(20)
                .with_iterations(30)
                .with_seed(42);
            group.bench_with_input(
                BenchmarkId::new(variant.code(), n),
                &(cities.clone(), config),
                |b, (cities, config)| {
                    b.iter(|| {
                        let result = ColonyRunner::solve(black_box(cities), config.clone());
                        black_box(result)
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_two_opt(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_opt");
    group.sample_size(20);

    for &n in &[50usize, 100, 200] {
        let cities = random_cities(n, 1000.0, 1000.0, Some(7)).unwrap();
        let model = DistanceModel::new(&cities).unwrap();
        // Identity order over random points is a poor starting tour.
        let start: Vec<usize> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, model| {
            b.iter(|| {
                let mut tour = start.clone();
                black_box(two_opt(&mut tour, black_box(model)))
            })
        });
    }
    group.finish();
}

#[cfg(feature = "parallel")]
fn bench_parallel_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_construction");
    group.sample_size(10);

    let cities = random_cities(100, 1000.0, 1000.0, Some(42)).unwrap();
    for parallel in [false, true] {
        let config = AcoConfig::default()
            .with_variant(AcoVariant::MaxMin)
            .with_ants(50)
            .with_iterations(10)
            .with_parallel(parallel)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(if parallel { "rayon" } else { "serial" }),
            &config,
            |b, config| b.iter(|| black_box(ColonyRunner::solve(&cities, config.clone()))),
        );
    }
    group.finish();
}

#[cfg(not(feature = "parallel"))]
criterion_group!(benches, bench_variants, bench_two_opt);
#[cfg(feature = "parallel")]
criterion_group!(benches, bench_variants, bench_two_opt, bench_parallel_construction);
criterion_main!(benches);
