//! Simulation benchmarks for tw_core.
//!
//! Run with: `cargo bench -p tw_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tw_core::prelude::*;
use tw_core::update::{update_supply, update_visibility};
use tw_test_utils::fixtures::{skirmish, walled_field};

/// A large open map with many owned bases and a unit on every third tile.
fn crowded(width: usize, height: usize) -> World {
    let mut world = World::new(width, height);
    for x in (0..width as i32).step_by(8) {
        for y in (0..height as i32).step_by(8) {
            if let Some(tile) = world.tile_mut(Coord::new(x, y)) {
                tile.terrain = Terrain::Base;
                tile.owner = ((x + y) % 2 + 1) as PlayerId;
            }
        }
    }
    for x in 0..width as i32 {
        for y in 0..height as i32 {
            if (x + y) % 3 == 0 {
                let player = if x < width as i32 / 2 { 1 } else { 2 };
                world.spawn_unit(Coord::new(x, y), player, UnitKind::Soldier);
            }
        }
    }
    world
}

pub fn tick_benchmark(c: &mut Criterion) {
    c.bench_function("tick_skirmish", |b| {
        b.iter_batched(
            || Engine::with_seed(skirmish(1), 1),
            |mut engine| {
                for _ in 0..30 {
                    black_box(engine.tick());
                }
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("tick_crowded_64x48", |b| {
        b.iter_batched(
            || Engine::with_seed(crowded(64, 48), 1),
            |mut engine| black_box(engine.tick()),
            BatchSize::LargeInput,
        );
    });

    let mut world = crowded(64, 48);
    c.bench_function("supply_diffusion_64x48", |b| {
        b.iter(|| update_supply(black_box(&mut world)));
    });
    c.bench_function("visibility_diffusion_64x48", |b| {
        b.iter(|| update_visibility(black_box(&mut world)));
    });
}

pub fn pathfinding_benchmark(c: &mut Criterion) {
    let walled = walled_field();
    c.bench_function("find_path_walled_tank", |b| {
        b.iter(|| {
            find_path(
                black_box(&walled),
                UnitKind::Tank,
                Coord::new(0, 0),
                Coord::new(2, 0),
            )
        });
    });

    let open = World::new(64, 64);
    c.bench_function("find_path_open_64x64", |b| {
        b.iter(|| {
            find_path(
                black_box(&open),
                UnitKind::Soldier,
                Coord::new(0, 0),
                Coord::new(63, 63),
            )
        });
    });
}

pub fn censor_benchmark(c: &mut Criterion) {
    let mut engine = Engine::with_seed(crowded(64, 48), 1);
    engine.tick();
    c.bench_function("censorship_64x48", |b| {
        b.iter(|| censorship(black_box(engine.world()), 1));
    });
}

criterion_group!(benches, tick_benchmark, pathfinding_benchmark, censor_benchmark);
criterion_main!(benches);
