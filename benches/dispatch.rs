//! Criterion benchmarks comparing inline and pooled dispatch.
//!
//! Run with:
//!   cargo bench --bench dispatch
//!
//! Each format is measured at every accepted level, once on the calling
//! thread and once through the worker pool (submit + wait), so the
//! difference is the scheduling overhead per call.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use deflate_dispatch::{CompressOptions, Dispatcher, Format, PoolConfig};

/// Deterministic prose-like payload that deflate shrinks by roughly 3x.
fn payload(len: usize) -> Vec<u8> {
    const WORDS: &[&[u8]] = &[
        b"lorem", b"ipsum", b"dolor", b"sit", b"amet", b"consectetur", b"adipiscing", b"elit",
        b"sed", b"do", b"eiusmod", b"tempor", b"incididunt", b"labore", b"magna", b"aliqua",
    ];
    let mut state: u32 = 0x2545_F491;
    let mut out = Vec::with_capacity(len + 16);
    while out.len() < len {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        out.extend_from_slice(WORDS[(state % WORDS.len() as u32) as usize]);
        out.push(b' ');
    }
    out.truncate(len);
    out
}

fn bench_compress(c: &mut Criterion) {
    let dispatcher = Dispatcher::with_config(&PoolConfig::default()).unwrap();
    let mut group = c.benchmark_group("compress");

    for &size in &[16_384usize, 1_048_576] {
        let data = payload(size);
        group.throughput(Throughput::Bytes(size as u64));

        for format in Format::ALL {
            for level in [0, 1, 3] {
                let options = CompressOptions::with_level(level);

                // ── inline ──────────────────────────────────────────────────
                group.bench_with_input(
                    BenchmarkId::new(format!("{format}_l{level}_sync"), size),
                    &data,
                    |b, data| b.iter(|| dispatcher.compress(format, data, options).unwrap()),
                );

                // ── pooled ──────────────────────────────────────────────────
                group.bench_with_input(
                    BenchmarkId::new(format!("{format}_l{level}_async"), size),
                    &data,
                    |b, data| {
                        b.iter(|| dispatcher.compress_async(format, data, options).wait().unwrap())
                    },
                );
            }
        }
    }

    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let dispatcher = Dispatcher::with_config(&PoolConfig::default()).unwrap();
    let mut group = c.benchmark_group("decompress");

    for &size in &[16_384usize, 1_048_576] {
        let data = payload(size);
        // Throughput measured in decompressed bytes.
        group.throughput(Throughput::Bytes(size as u64));

        for format in Format::ALL {
            let packed = dispatcher.compress(format, &data, CompressOptions::default()).unwrap();

            group.bench_with_input(
                BenchmarkId::new(format!("{format}_sync"), size),
                &packed,
                |b, packed| b.iter(|| dispatcher.decompress(format, packed).unwrap()),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("{format}_async"), size),
                &packed,
                |b, packed| b.iter(|| dispatcher.decompress_async(format, packed).wait().unwrap()),
            );
        }
    }

    group.finish();
}

/// Many concurrent submissions awaited together, the pool's intended use.
fn bench_fan_out(c: &mut Criterion) {
    let dispatcher = Dispatcher::with_config(&PoolConfig::default()).unwrap();
    let data = payload(65_536);
    let mut group = c.benchmark_group("fan_out");

    for &jobs in &[4usize, 32] {
        group.throughput(Throughput::Bytes((data.len() * jobs) as u64));
        group.bench_with_input(BenchmarkId::new("gzip_async", jobs), &jobs, |b, &jobs| {
            b.iter(|| {
                let pending: Vec<_> = (0..jobs)
                    .map(|_| dispatcher.compress_async(Format::Gzip, &data, CompressOptions::default()))
                    .collect();
                futures::executor::block_on(futures::future::join_all(pending))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress, bench_fan_out);
criterion_main!(benches);
