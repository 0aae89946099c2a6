//! Byte-keyed map benchmarks.
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hellotap_utils::MapBuilder;

fn bench_bytemap(c: &mut Criterion) {
    let mut group = c.benchmark_group("bytemap");

    for count in [100usize, 1_000, 10_000] {
        let keys: Vec<Vec<u8>> = (0..count)
            .map(|i| format!("cipher-suite-{i}").into_bytes())
            .collect();

        group.bench_with_input(BenchmarkId::new("build", count), &count, |bench, _| {
            bench.iter(|| {
                let mut builder = MapBuilder::new().unwrap();
                for key in &keys {
                    builder.insert(key, key).unwrap();
                }
                builder.freeze()
            });
        });

        let mut builder = MapBuilder::new().unwrap();
        for key in &keys {
            builder.insert(key, key).unwrap();
        }
        let map = builder.freeze();

        group.bench_with_input(BenchmarkId::new("lookup", count), &count, |bench, _| {
            bench.iter(|| {
                for key in &keys {
                    assert!(map.lookup(key).is_some());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bytemap);
criterion_main!(benches);
