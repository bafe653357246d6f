//! # Store Performance Benchmark
//!
//! Frame-path costs of the sparse-set store:
//! - entity churn with index recycling
//! - pool insert/remove with swap-and-pop
//! - two-component views driven by the smaller pool
//!
//! Run with: `cargo bench --package wikigolf_core --bench store_benchmark`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wikigolf_core::{Component, Entity, World};

/// Entity count used by the steady-state benchmarks (16-bit index space).
const ENTITY_COUNT: usize = 60_000;

#[derive(Clone, Copy)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}
impl Component for Position {}

#[derive(Clone, Copy)]
struct Velocity {
    x: f32,
    y: f32,
    z: f32,
}
impl Component for Velocity {}

fn populated_world(moving_every: usize) -> (World, Vec<Entity>) {
    let mut world = World::new();
    let mut entities = Vec::with_capacity(ENTITY_COUNT);
    for i in 0..ENTITY_COUNT {
        let e = world.create_entity();
        let f = i as f32;
        world.add(e, Position { x: f, y: f, z: f });
        if i % moving_every == 0 {
            world.add(e, Velocity { x: 0.1, y: 0.2, z: 0.3 });
        }
        entities.push(e);
    }
    (world, entities)
}

/// Benchmark: Create and destroy entities, reusing freed indices.
fn bench_entity_churn(c: &mut Criterion) {
    let mut world = World::new();
    let mut ids: Vec<Entity> = (0..ENTITY_COUNT / 2).map(|_| world.create_entity()).collect();

    c.bench_function("entity_churn_10K", |b| {
        b.iter(|| {
            for id in ids.iter().take(10_000) {
                world.destroy_entity(*id);
            }
            for id in ids.iter_mut().take(10_000) {
                *id = world.create_entity();
            }
            black_box(world.active_entities())
        });
    });
}

/// Benchmark: Attach and detach a component across the whole pool.
fn bench_pool_add_remove(c: &mut Criterion) {
    let (mut world, entities) = populated_world(1);

    c.bench_function("pool_add_remove_60K", |b| {
        b.iter(|| {
            for &e in &entities {
                world.remove::<Velocity>(e);
            }
            for &e in &entities {
                world.add(e, Velocity { x: 1.0, y: 0.0, z: 0.0 });
            }
            black_box(world.component_count::<Velocity>())
        });
    });
}

/// Benchmark: Position+Velocity view at different overlap ratios.
fn bench_view_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_position_velocity");

    for moving_every in [1, 10, 100] {
        let (world, _) = populated_world(moving_every);
        group.bench_with_input(
            BenchmarkId::from_parameter(moving_every),
            &world,
            |b, world| {
                b.iter(|| {
                    let mut sum = 0.0_f32;
                    world
                        .query::<(Position, Velocity)>()
                        .for_each(|_, (p, v)| sum += p.x * v.x + p.y * v.y + p.z * v.z);
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: Single-pool mutation.
fn bench_each_mut(c: &mut Criterion) {
    let (mut world, _) = populated_world(1);

    c.bench_function("each_mut_positions_60K", |b| {
        b.iter(|| {
            world.each_mut::<Position>(|_, p| p.x += 0.001);
            black_box(world.component_count::<Position>())
        });
    });
}

criterion_group!(
    benches,
    bench_entity_churn,
    bench_pool_add_remove,
    bench_view_iteration,
    bench_each_mut,
);

criterion_main!(benches);
