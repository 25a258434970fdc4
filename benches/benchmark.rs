use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fncmaps::{
    fnc_trend_stats, normalize, reorder_with_table, vec2mat, vec2mat_batch, IcnTable, Vec2MatOptions, ICN_COUNT,
};
use ndarray::{Array, Array1, Array2};

const FNC_LEN: usize = ICN_COUNT * (ICN_COUNT - 1) / 2;

fn fnc_vector() -> Array1<f64> {
    Array::linspace(-1.0, 1.0, FNC_LEN)
}

fn reversed_table() -> IcnTable {
    IcnTable {
        indices: (1..=ICN_COUNT).collect(),
        labels: vec![String::from("Visual network"); ICN_COUNT],
        new_order: (1..=ICN_COUNT).rev().map(|v| v as f64).collect(),
    }
}

fn bench_transform(c: &mut Criterion) {
    let vec = fnc_vector();
    let batch = Array2::from_shape_fn((50, FNC_LEN), |(p, k)| ((p + k) % 200) as f64 / 100.0 - 1.0);
    let table = reversed_table();
    let mat = vec2mat(vec.view(), &Vec2MatOptions::full()).unwrap();
    let cohort_a = Array2::from_shape_fn((40, 20), |(s, w)| ((s * 7 + w) % 13) as f64 / 13.0);
    let cohort_b = Array2::from_shape_fn((40, 20), |(s, w)| ((s * 5 + w) % 11) as f64 / 11.0);

    c.bench_function("vec2mat", |b| {
        b.iter(|| vec2mat(black_box(vec.view()), &Vec2MatOptions::full()).unwrap())
    });
    c.bench_function("vec2mat_batch", |b| {
        b.iter(|| vec2mat_batch(black_box(batch.view()), &Vec2MatOptions::full()).unwrap())
    });
    c.bench_function("reorder_with_table", |b| {
        b.iter(|| reorder_with_table(black_box(mat.view()), &table).unwrap())
    });
    c.bench_function("normalize", |b| {
        b.iter(|| normalize(black_box(&vec)).unwrap())
    });
    c.bench_function("fnc_trend_stats", |b| {
        b.iter(|| fnc_trend_stats(black_box(cohort_a.view()), cohort_b.view()).unwrap())
    });
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
