//! Window transform benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::{FeatureExtractor, WindowedSignalAnalyzer};

fn synthetic_sample(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 1000.0 * (i as f64 * 0.07).sin() + ((i * 31) % 17) as f64)
        .collect()
}

fn bench_transforms(c: &mut Criterion) {
    let sample = synthetic_sample(4800);
    let analyzer = WindowedSignalAnalyzer::new(&sample, 300);

    c.bench_function("moving_average_30ms", |b| {
        b.iter(|| analyzer.moving_average(black_box(30)))
    });
    c.bench_function("energy_30ms", |b| b.iter(|| analyzer.energy(black_box(30))));
    c.bench_function("zero_crossing_rate_30ms", |b| {
        b.iter(|| analyzer.zero_crossing_rate(black_box(30)))
    });
}

fn bench_extract_all(c: &mut Criterion) {
    let samples: Vec<Vec<f64>> = (0..50).map(|_| synthetic_sample(4800)).collect();
    let extractor = FeatureExtractor::default();

    c.bench_function("extract_all_50", |b| {
        b.iter(|| extractor.extract_all(black_box(&samples)))
    });
}

criterion_group!(benches, bench_transforms, bench_extract_all);
criterion_main!(benches);
