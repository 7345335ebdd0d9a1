//! Subsequence search benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rawbuf_bench::utils::{haystack_with_trailing_needle, SIZES};
use rawbuf_core::{find, SearchOptions};

const NEEDLE: &[u8] = b"abcabd";

/// Benchmark a forward scan that only matches at the end.
fn bench_find_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_forward");

    for size in SIZES.iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let haystack = haystack_with_trailing_needle(size, NEEDLE);
            b.iter(|| black_box(find(black_box(&haystack), NEEDLE, SearchOptions::new())));
        });
    }

    group.finish();
}

/// Benchmark a backward scan that matches immediately, and an anchored scan
/// that gives up immediately.
fn bench_find_short_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_short_circuit");
    let size = 1024 * 1024;
    let haystack = haystack_with_trailing_needle(size, NEEDLE);

    group.bench_function("backward", |b| {
        let options = SearchOptions::new().backwards(true);
        b.iter(|| black_box(find(black_box(&haystack), NEEDLE, options)));
    });
    group.bench_function("anchored_miss", |b| {
        let options = SearchOptions::new().anchored(true);
        b.iter(|| black_box(find(black_box(&haystack), b"zzz", options)));
    });

    group.finish();
}

criterion_group!(benches, bench_find_forward, bench_find_short_circuit);
criterion_main!(benches);
