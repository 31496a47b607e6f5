//! Criterion benchmarks for selectivity cache rebuilds and lookups.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use otolith_selectivity::{CacheDomain, DoubleNormal, Logistic, Selectivity};

fn domain() -> CacheDomain {
    CacheDomain::ages(1, 60).with_length_bins((0..100).map(|i| 2.5 + 5.0 * i as f64).collect())
}

fn bench_rebuild_logistic(c: &mut Criterion) {
    let domain = domain();
    let mut sel = Logistic::new("logistic", 5.0, 3.0);
    c.bench_function("rebuild_logistic", |b| {
        b.iter(|| {
            sel.rebuild_cache(black_box(&domain));
        });
    });
}

fn bench_rebuild_double_normal(c: &mut Criterion) {
    let domain = domain();
    let mut sel = DoubleNormal::new("dn", 8.0, 3.0, 10.0);
    c.bench_function("rebuild_double_normal", |b| {
        b.iter(|| {
            sel.rebuild_cache(black_box(&domain));
        });
    });
}

fn bench_age_lookups(c: &mut Criterion) {
    let domain = domain();
    let mut sel = Logistic::new("logistic", 5.0, 3.0);
    sel.rebuild_cache(&domain);
    c.bench_function("age_lookups_60", |b| {
        b.iter(|| {
            let total: f64 = (1..=60).map(|age| sel.age_result(black_box(age))).sum();
            black_box(total);
        });
    });
}

criterion_group!(
    benches,
    bench_rebuild_logistic,
    bench_rebuild_double_normal,
    bench_age_lookups
);
criterion_main!(benches);
