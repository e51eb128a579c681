//! Materializer throughput under each growth policy

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dataset_index::{GrowthPolicy, LineReader, Materializer, RecordLayout, SpaceTracker, TrimMode};

fn synthetic_dataset(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            let n = i % 7;
            let values: Vec<String> = (0..n).map(|j| format!("{}.{}", i, j)).collect();
            let keys: Vec<String> = (0..n).map(|j| format!("{:016x}", i * 7 + j)).collect();
            format!("id{} s t {} {} {}\n", i, n, values.join(" "), keys.join(" "))
        })
        .collect()
}

fn benchmark_materialize(c: &mut Criterion) {
    let input = synthetic_dataset(20_000);
    let rows: usize = (0..20_000).map(|i| i % 7).sum();

    let mut group = c.benchmark_group("materialize");
    for (name, policy) in [
        ("amortized", GrowthPolicy::Amortized),
        ("preallocated", GrowthPolicy::preallocated(rows)),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &policy, |b, &policy| {
            let materializer = Materializer::new(RecordLayout::default(), policy);
            b.iter(|| {
                let reader = LineReader::new(Cursor::new(input.as_bytes()), ' ', TrimMode::Terminator);
                let mut tracker = SpaceTracker::new(false);
                black_box(materializer.materialize(reader, &mut tracker).unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_materialize);
criterion_main!(benches);
