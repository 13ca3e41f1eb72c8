//! Free-list allocator benchmarks
//!
//! Measures the hot paths against the system allocator baseline.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use ember_memory::allocator::{FreeListAllocator, FreeListConfig};
use std::alloc::Layout;
use std::hint::black_box;

/// Benchmark single allocation/deallocation cycle
fn bench_single_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_allocation");

    group.bench_function("freelist_64b", |b| {
        let mut pool = FreeListAllocator::with_config(1024 * 1024, FreeListConfig::production());

        b.iter(|| {
            let ptr = pool.allocate(64).unwrap();
            unsafe { pool.deallocate(ptr.as_ptr()) };
            black_box(ptr);
        });
    });

    // System allocator (baseline)
    group.bench_function("system_64b", |b| {
        let layout = Layout::from_size_align(64, 8).unwrap();

        b.iter(|| unsafe {
            let ptr = std::alloc::alloc(layout);
            std::alloc::dealloc(ptr, layout);
            black_box(ptr);
        });
    });

    group.finish();
}

/// Benchmark a churn workload: batch allocate, free every other block to
/// fragment the pool, then refill the holes. Exercises splitting, the
/// left-coalesce scan, and first-fit over a longer free list.
fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.throughput(Throughput::Elements(100));

    group.bench_function("freelist_100x64b", |b| {
        let mut pool = FreeListAllocator::with_config(1024 * 1024, FreeListConfig::production());

        b.iter(|| {
            let mut ptrs = Vec::with_capacity(100);
            for _ in 0..100 {
                ptrs.push(pool.allocate(64).unwrap());
            }
            for ptr in ptrs.iter().step_by(2) {
                unsafe { pool.deallocate(ptr.as_ptr()) };
            }
            for slot in ptrs.iter_mut().step_by(2) {
                *slot = pool.allocate(64).unwrap();
            }
            for ptr in ptrs {
                unsafe { pool.deallocate(ptr.as_ptr()) };
            }
        });
    });

    group.finish();
}

/// Benchmark the diagnostic snapshot over a fragmented pool
fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    group.bench_function("free_list_fragmented", |b| {
        let mut pool = FreeListAllocator::with_config(1024 * 1024, FreeListConfig::production());
        let ptrs: Vec<_> = (0..200).map(|_| pool.allocate(64).unwrap()).collect();
        for ptr in ptrs.iter().step_by(2) {
            unsafe { pool.deallocate(ptr.as_ptr()) };
        }

        b.iter(|| black_box(pool.free_list()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_allocation,
    bench_churn,
    bench_snapshot
);
criterion_main!(benches);
