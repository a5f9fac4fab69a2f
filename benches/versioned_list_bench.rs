//! Benchmark for VersionedList vs standard VecDeque.
//!
//! Compares appends, positional inserts and full traversals of old and
//! current versions.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fatnode::versioned::VersionedList;
use std::collections::VecDeque;
use std::hint::black_box;

// =============================================================================
// add Benchmark
// =============================================================================

fn benchmark_add(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("list_add");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("VersionedList", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut list = VersionedList::new();
                    for index in 0..size {
                        list.add(black_box(index));
                    }
                    black_box(list)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("VecDeque", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut deque = VecDeque::new();
                for index in 0..size {
                    deque.push_back(black_box(index));
                }
                black_box(deque)
            });
        });
    }

    group.finish();
}

// =============================================================================
// insert Benchmark (Middle)
// =============================================================================

fn benchmark_insert_middle(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("list_insert_middle");

    for size in [100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("VersionedList", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut list = VersionedList::new();
                    for index in 0..size {
                        let _ = list.insert(list.len() / 2, black_box(index));
                    }
                    black_box(list)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// iter_at Benchmark
// =============================================================================

fn benchmark_iter_at(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("list_iter_at");

    for size in [100, 1000, 10000] {
        let mut list: VersionedList<i32> = (0..size).collect();
        for index in 0..size / 2 {
            let _ = list.set(index as usize, -index);
        }

        group.bench_with_input(BenchmarkId::new("seed", size), &list, |bencher, list| {
            bencher.iter(|| {
                list.iter_at(0)
                    .map(|elements| elements.copied().sum::<i32>())
                    .unwrap_or_default()
            });
        });

        group.bench_with_input(BenchmarkId::new("current", size), &list, |bencher, list| {
            bencher.iter(|| black_box(list.iter().copied().sum::<i32>()));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_add, benchmark_insert_middle, benchmark_iter_at);

criterion_main!(benches);
