use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ndaccess::{create, HyperslabIndex, Indexer, SliceHandle, StrideIndex};

fn bench_strided_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("strided_get");
    for size in [64usize, 256, 1024] {
        let elements = size * size;
        group.throughput(Throughput::Elements(elements as u64));

        let mut data: Vec<f64> = (0..elements).map(|v| v as f64).collect();
        let ix = Indexer::<f64, _, _>::over_slice(
            &mut data,
            StrideIndex::new([size as i64, size as i64]),
        );

        group.bench_with_input(BenchmarkId::new("rank2", size), &size, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0;
                for i in 0..n as i64 {
                    for j in 0..n as i64 {
                        acc += ix.get((i, j));
                    }
                }
                black_box(acc)
            })
        });
    }
    group.finish();
}

fn bench_hyperslab_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("hyperslab_get");
    for size in [64usize, 256, 1024] {
        let mut data: Vec<f64> = (0..size * size).map(|v| v as f64).collect();
        let index = HyperslabIndex::new(
            [(size * size) as i64],
            [1],
            [4],
            [(size * size / 8) as i64],
            [2],
        )
        .unwrap();
        let selected = index.counts()[0] * index.blocks()[0];
        group.throughput(Throughput::Elements(selected as u64));
        let ix = Indexer::<f64, _, _>::over_slice(&mut data, index);

        group.bench_with_input(BenchmarkId::new("blocked", size), &selected, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0;
                for i in 0..n {
                    acc += ix.get(i);
                }
                black_box(acc)
            })
        });
    }
    group.finish();
}

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("backends");
    let elements = 4096usize;
    group.throughput(Throughput::Elements(elements as u64));

    for (name, direct) in [("direct", true), ("copied", false)] {
        let mut data: Vec<i64> = (0..elements as i64).collect();
        let handle = SliceHandle::full(&mut data);
        let ix = create::<i64, _, _>(handle, StrideIndex::new([elements as i64]), direct);

        group.bench_function(BenchmarkId::new(name, elements), |b| {
            b.iter(|| {
                let mut acc = 0i64;
                for i in 0..elements as i64 {
                    acc = acc.wrapping_add(ix.get(i));
                }
                black_box(acc)
            })
        });
    }
    group.finish();
}

fn bench_bulk_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_copy");
    let elements = 4096usize;
    group.throughput(Throughput::Elements(elements as u64));

    let mut data: Vec<f32> = (0..elements).map(|v| v as f32).collect();
    let ix = Indexer::<f32, _, _>::over_slice(&mut data, StrideIndex::new([elements as i64]));
    let mut dst = vec![0f32; elements];

    group.bench_function("get_slice", |b| {
        b.iter(|| {
            ix.get_slice(0, &mut dst);
            black_box(dst[elements - 1])
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_strided_get,
    bench_hyperslab_get,
    bench_backends,
    bench_bulk_copy
);
criterion_main!(benches);
