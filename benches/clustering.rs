use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use symnmf::{normalize, Kmeans, PointSet, SymNmf};

fn synthetic_points(n: usize, d: usize) -> PointSet {
    let mut rng = StdRng::seed_from_u64(42);
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..d).map(|_| rng.random::<f64>()).collect())
        .collect();
    PointSet::new(rows).unwrap()
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");
    let points = synthetic_points(1000, 16);

    group.bench_function("fit_n1000_d16_k10", |b| {
        b.iter(|| {
            let model = Kmeans::new(10).with_max_iter(10);
            model.fit(black_box(&points)).unwrap();
        })
    });

    group.finish();
}

fn bench_symnmf(c: &mut Criterion) {
    let mut group = c.benchmark_group("symnmf");
    let points = synthetic_points(300, 4);

    group.bench_function("normalize_n300_d4", |b| {
        b.iter(|| normalize(black_box(&points)).unwrap())
    });

    let a = normalize(&points).unwrap();
    group.bench_function("fit_normalized_n300_k5", |b| {
        b.iter(|| {
            let model = SymNmf::new(5).with_max_iter(50);
            model.fit_normalized(black_box(&a)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmeans, bench_symnmf);
criterion_main!(benches);
