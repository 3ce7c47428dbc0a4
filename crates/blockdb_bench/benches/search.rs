//! Binary search benchmarks.

use blockdb_bench::{even_key_blocks, sorted_key_blocks};
use blockdb_core::Store;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tempfile::TempDir;

/// Benchmark key hits across store sizes.
fn bench_search_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_hit");

    for count in [64i64, 1024, 16384].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let mut store = Store::in_memory(8).unwrap();
            store.append(&sorted_key_blocks(count)).unwrap();

            let mut probe = 0i64;
            b.iter(|| {
                // Probe keys in pseudo-random order; every one is present.
                let key = (probe * 7) % count;
                let result = store.search_by_key(black_box(key)).unwrap();
                probe = (probe + 1) % count;
                black_box(result);
            });
        });
    }

    group.finish();
}

/// Benchmark key misses, which always walk the full probe depth.
fn bench_search_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_miss");

    for count in [64i64, 1024, 16384].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let mut store = Store::in_memory(8).unwrap();
            store.append(&even_key_blocks(count)).unwrap();

            let mut probe = 0i64;
            b.iter(|| {
                // Odd keys fall between the stored even keys.
                let key = ((probe * 7) % count) * 2 + 1;
                let result = store.search_by_key(black_box(key)).unwrap();
                probe = (probe + 1) % count;
                black_box(result);
            });
        });
    }

    group.finish();
}

/// Benchmark searches against a file-backed store, where every probe
/// is a positional read syscall.
fn bench_file_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_file");
    group.sample_size(50);

    for count in [1024i64, 16384].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("bench.bin");

            let mut store = Store::create(&path, 8).unwrap();
            store.append(&sorted_key_blocks(count)).unwrap();

            let mut probe = 0i64;
            b.iter(|| {
                let key = (probe * 7) % count;
                let result = store.search_by_key(black_box(key)).unwrap();
                probe = (probe + 1) % count;
                black_box(result);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_search_hit, bench_search_miss, bench_file_search);

criterion_main!(benches);
