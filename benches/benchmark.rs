use criterion::{black_box, criterion_group, criterion_main, Criterion};

use metrics_facade::{Metrics, MetricsService};

pub fn benchmark_lookup(c: &mut Criterion) {
    c.bench_function("count-new-name", |b| {
        let metrics = Metrics::new();
        let mut names = (0u64..).map(|i| format!("bench_new_{i}"));
        b.iter(|| metrics.count(&names.next().unwrap(), None, 1, &[]))
    });
    c.bench_function("count-existing-name", |b| {
        let metrics = Metrics::new();
        metrics.incr("bench_existing").unwrap();
        b.iter(|| metrics.count(black_box("bench_existing"), None, 1, &[]));
    });
}

pub fn benchmark_counter(c: &mut Criterion) {
    let metrics = Metrics::new();
    c.bench_function("count-1-label", |b| {
        b.iter(|| metrics.count("bench_one_label", None, 1, &[("tag", "one")]));
    });
    c.bench_function("count-8-labels", |b| {
        b.iter(|| {
            metrics.count(
                "bench_eight_labels",
                None,
                1,
                &[
                    ("one", "1"),
                    ("two", "2"),
                    ("three", "3"),
                    ("four", "4"),
                    ("five", "5"),
                    ("six", "6"),
                    ("seven", "7"),
                    ("eight", "8"),
                ],
            )
        });
    });
}

pub fn benchmark_gauge(c: &mut Criterion) {
    let metrics = Metrics::new();
    c.bench_function("gauge-set-1-label", |b| {
        b.iter(|| metrics.gauge("bench_gauge", None, black_box(42.0), &[("tag", "one")]));
    });
}

pub fn benchmark_histogram(c: &mut Criterion) {
    let metrics = Metrics::new();
    c.bench_function("histogram-timer-1-label", |b| {
        b.iter(|| drop(metrics.histogram("bench_histogram", None, &[("tag", "one")])));
    });
}

criterion_group!(
    benches,
    benchmark_lookup,
    benchmark_counter,
    benchmark_gauge,
    benchmark_histogram
);
criterion_main!(benches);
