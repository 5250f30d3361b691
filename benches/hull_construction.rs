//! Benchmarks for hull construction and Voronoi derivation.
//!
//! 1. **Incremental vs divide and conquer**: facade construction of lifted
//!    random sites with each method
//! 2. **Base-case threshold**: divide and conquer across thresholds
//! 3. **Voronoi segments**: derivation and projection of a finished hull

#![allow(missing_docs)] // Criterion macros generate undocumented functions

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::OnceLock;
use voronoi_hull::prelude::*;

/// Get the deterministic seed for random site generation.
/// Reads `VORONOI_HULL_BENCH_SEED` (decimal or 0x-hex). Defaults to 0xC0DE.
/// Prints the resolved seed once on first use if `PRINT_BENCH_SEED` is set.
fn get_benchmark_seed() -> u64 {
    static SEED: OnceLock<u64> = OnceLock::new();
    *SEED.get_or_init(|| {
        let seed = std::env::var("VORONOI_HULL_BENCH_SEED")
            .ok()
            .and_then(|s| {
                let s = s.trim();
                s.strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .map_or_else(|| s.parse().ok(), |hex| u64::from_str_radix(hex, 16).ok())
            })
            .unwrap_or(0xC0DE);
        if std::env::var("PRINT_BENCH_SEED").is_ok() {
            eprintln!("Benchmark seed: 0x{seed:X} ({seed})");
        }
        seed
    })
}

fn sites(n: usize) -> Vec<Site> {
    generate_random_sites(n, (0, 4000), (0, 4000), get_benchmark_seed())
        .expect("site generation should succeed")
}

fn config(threshold: usize, force_incremental: bool) -> HullConfig {
    HullConfigBuilder::default()
        .base_case_threshold(threshold)
        .force_incremental(force_incremental)
        .validate(false)
        .build()
        .expect("valid config")
}

fn benchmark_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("hull_methods");
    for &n in &[100usize, 500, 2000] {
        let input = sites(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("incremental", n), &input, |b, input| {
            let config = config(DEFAULT_BASE_CASE_THRESHOLD, true);
            b.iter(|| black_box(Polyhedron::from_sites(input, &config).expect("hull")));
        });
        group.bench_with_input(
            BenchmarkId::new("divide_and_conquer", n),
            &input,
            |b, input| {
                let config = config(DEFAULT_BASE_CASE_THRESHOLD, false);
                b.iter(|| black_box(Polyhedron::from_sites(input, &config).expect("hull")));
            },
        );
    }
    group.finish();
}

fn benchmark_thresholds(c: &mut Criterion) {
    let mut group = c.benchmark_group("base_case_threshold");
    let input = sites(2000);
    for &threshold in &[8usize, 16, 30, 64, 128] {
        group.bench_with_input(
            BenchmarkId::from_parameter(threshold),
            &threshold,
            |b, &threshold| {
                let config = config(threshold, false);
                b.iter(|| black_box(Polyhedron::from_sites(&input, &config).expect("hull")));
            },
        );
    }
    group.finish();
}

fn benchmark_voronoi(c: &mut Criterion) {
    let input = sites(1000);
    let hull = Polyhedron::from_sites(&input, &config(DEFAULT_BASE_CASE_THRESHOLD, false))
        .expect("hull");
    c.bench_function("voronoi_segments_1000", |b| {
        b.iter(|| {
            let diagram = VoronoiDiagram::from_polyhedron(black_box(&hull)).expect("diagram");
            black_box(diagram.segments(10_000.0, |p| Site::new(p.x / 4, 1000 - p.y / 4)))
        });
    });
}

criterion_group!(
    benches,
    benchmark_methods,
    benchmark_thresholds,
    benchmark_voronoi
);
criterion_main!(benches);
