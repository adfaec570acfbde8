//! Distance-field benchmarks
//!
//! Benchmarks the CPU-heavy paths:
//! - Full volumetric field build, serial and parallel
//! - Ground occupancy rasterization
//! - Per-tick sampling (distance, gradient, force)
//!
//! Run with: `cargo bench`
//! View HTML reports in: `target/criterion/`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use nalgebra::Point3;

use raksha_nav::{
    build_distance_field, generate_city, ForceConfig, ForceField, GridConfig, OccupancyConfig,
    OccupancyGrid, ObstacleRegistry, SceneConfig,
};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Full-size seeded city, the same scale the demo flies.
fn benchmark_city() -> ObstacleRegistry {
    generate_city(&SceneConfig::default()).expect("city generation")
}

fn benchmark_grid_config(threads: usize) -> GridConfig {
    GridConfig {
        world_half_extent: 180.0,
        cell_size: 4.0,
        min_y: 0.0,
        max_y: 80.0,
        influence_radius: 20.0,
        build_threads: threads,
    }
}

// ============================================================================
// Field Build Benchmarks
// ============================================================================

fn bench_field_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_build");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.warm_up_time(Duration::from_secs(1));

    let registry = benchmark_city();

    group.bench_function("serial/city", |b| {
        let cfg = benchmark_grid_config(1);
        b.iter(|| build_distance_field(black_box(&registry), black_box(&cfg)))
    });

    group.bench_function("threads_4/city", |b| {
        let cfg = benchmark_grid_config(4);
        b.iter(|| build_distance_field(black_box(&registry), black_box(&cfg)))
    });

    group.finish();
}

fn bench_occupancy(c: &mut Criterion) {
    let mut group = c.benchmark_group("occupancy");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(5));

    let registry = benchmark_city();
    let cfg = OccupancyConfig::default();

    group.bench_function("rasterize/city", |b| {
        b.iter(|| OccupancyGrid::rasterize(black_box(&registry), black_box(&cfg)))
    });

    group.bench_function("boundary_edges/city", |b| {
        let grid = OccupancyGrid::rasterize(&registry, &cfg);
        b.iter(|| black_box(&grid).boundary_edges())
    });

    group.finish();
}

// ============================================================================
// Sampling Benchmarks (per-tick hot path)
// ============================================================================

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(3));

    let registry = benchmark_city();
    let grid = build_distance_field(&registry, &benchmark_grid_config(1)).expect("field build");
    let force_cfg = ForceConfig::default();
    let field = ForceField::new(&grid, &registry, &force_cfg);

    // Probe ring at flight altitude across the city.
    let probes: Vec<Point3<f32>> = (0..64)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / 64.0;
            Point3::new(120.0 * angle.cos(), 25.0, 120.0 * angle.sin())
        })
        .collect();

    group.bench_function("distance/64_probes", |b| {
        b.iter(|| {
            for p in &probes {
                black_box(grid.sample_distance(black_box(p)));
            }
        })
    });

    group.bench_function("gradient/64_probes", |b| {
        b.iter(|| {
            for p in &probes {
                black_box(grid.sample_gradient(black_box(p)));
            }
        })
    });

    group.bench_function("force/64_probes", |b| {
        b.iter(|| {
            for p in &probes {
                black_box(field.force_at(black_box(p)));
            }
        })
    });

    group.finish();
}

// ============================================================================
// Main
// ============================================================================

criterion_group!(benches, bench_field_build, bench_occupancy, bench_sampling);

criterion_main!(benches);
