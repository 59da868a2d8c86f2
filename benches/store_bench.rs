//! Benchmarks for ferrolog store operations

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use ferrolog::{Store, SyncPolicy};
use tempfile::TempDir;

const VALUE: &[u8] = &[0x42; 256];

fn append_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    group.throughput(Throughput::Bytes(VALUE.len() as u64));

    // OsFlush isolates the store's own overhead from fsync latency
    group.bench_function("os_flush_256b", |b| {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open(temp_dir.path().join("store.bin"), SyncPolicy::OsFlush).unwrap();
        b.iter(|| store.append(VALUE).unwrap());
    });

    group.bench_function("fsync_256b", |b| {
        let temp_dir = TempDir::new().unwrap();
        let store =
            Store::open(temp_dir.path().join("store.bin"), SyncPolicy::EveryAppend).unwrap();
        b.iter(|| store.append(VALUE).unwrap());
    });

    group.finish();
}

fn read_benchmark(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open(temp_dir.path().join("store.bin"), SyncPolicy::OsFlush).unwrap();
    for _ in 0..1024 {
        store.append(VALUE).unwrap();
    }

    let mut group = c.benchmark_group("read");
    group.throughput(Throughput::Bytes(VALUE.len() as u64));

    group.bench_function("sequential_256b", |b| {
        let mut offset = 0u64;
        b.iter(|| {
            let record = store.read(offset % 1024).unwrap();
            offset += 1;
            record
        });
    });

    group.finish();
}

criterion_group!(benches, append_benchmark, read_benchmark);
criterion_main!(benches);
