//! Aggregation benchmarks.
//!
//! Run with: cargo bench -p lotmap-core

use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lotmap_core::{AggregatingOrderMap, LotSize, Price};

fn seeded_map(symbols: u32, levels: i64) -> AggregatingOrderMap<u32> {
    let map = AggregatingOrderMap::new();
    for s in 0..symbols {
        for p in 0..levels {
            map.insert(s, LotSize::new(100), Price(p));
        }
    }
    map
}

/// Benchmark aggregating into a bucket that already exists.
fn bench_insert_existing(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_existing");
    group.throughput(Throughput::Elements(1));

    group.bench_function("same_bucket", |b| {
        let map = seeded_map(1, 1);
        b.iter(|| map.insert(black_box(0), LotSize::new(1), black_box(Price(0))))
    });

    group.finish();
}

/// Benchmark creating fresh price levels.
fn bench_insert_new_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_new_level");
    group.throughput(Throughput::Elements(1));

    group.bench_function("fresh_price", |b| {
        let map: AggregatingOrderMap<u32> = AggregatingOrderMap::new();
        let mut price = 0i64;
        b.iter(|| {
            price += 1;
            map.insert(black_box(0), LotSize::new(1), Price(price))
        })
    });

    group.finish();
}

/// Benchmark full snapshots at increasing book sizes.
fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for symbols in [10u32, 100, 1000] {
        let map = seeded_map(symbols, 10);
        group.throughput(Throughput::Elements(symbols as u64 * 10));
        group.bench_with_input(BenchmarkId::from_parameter(symbols), &map, |b, map| {
            b.iter(|| black_box(map.snapshot()))
        });
    }

    group.finish();
}

/// Benchmark inserts from several threads into a shared map.
fn bench_contended_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_insert");
    let per_thread = 10_000u64;

    for threads in [1u32, 2, 4, 8] {
        group.throughput(Throughput::Elements(per_thread * threads as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let map = Arc::new(seeded_map(threads, 16));
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let map = Arc::clone(&map);
                        thread::spawn(move || {
                            for i in 0..per_thread {
                                map.insert(t, LotSize::new(1), Price((i % 16) as i64));
                            }
                        })
                    })
                    .collect();
                for h in handles {
                    h.join().unwrap();
                }
                black_box(map.symbol_count())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_existing,
    bench_insert_new_level,
    bench_snapshot,
    bench_contended_insert,
);
criterion_main!(benches);
