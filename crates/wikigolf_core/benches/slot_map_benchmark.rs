//! # Slot-Map Performance Benchmark
//!
//! Handle resolution and reuse in the address-stable resource slot-map.
//!
//! Run with: `cargo bench --package wikigolf_core --bench slot_map_benchmark`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wikigolf_core::{Handle, SlotMap};

const RESOURCE_COUNT: usize = 10_000;

/// Benchmark: Resolve every live handle.
fn bench_get(c: &mut Criterion) {
    let mut map: SlotMap<[f32; 16]> = SlotMap::new();
    let handles: Vec<Handle> = (0..RESOURCE_COUNT).map(|i| map.add([i as f32; 16])).collect();

    c.bench_function("slot_map_get_10K", |b| {
        b.iter(|| {
            let mut sum = 0.0_f32;
            for &h in &handles {
                sum += map.get(h)[0];
            }
            black_box(sum)
        });
    });
}

/// Benchmark: Remove and re-add through the free list.
fn bench_recycle(c: &mut Criterion) {
    let mut map: SlotMap<Vec<u8>> = SlotMap::new();
    let mut handles: Vec<Handle> = (0..RESOURCE_COUNT).map(|_| map.add(Vec::new())).collect();

    c.bench_function("slot_map_recycle_10K", |b| {
        b.iter(|| {
            for h in &handles {
                map.remove(*h);
            }
            for h in &mut handles {
                *h = map.add(Vec::new());
            }
            black_box(map.len())
        });
    });
}

criterion_group!(benches, bench_get, bench_recycle);
criterion_main!(benches);
