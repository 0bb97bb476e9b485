//! Criterion benchmarks for the cross-validation loop.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sylva_cv::{CrossValidation, FeatureTable, TrainId, Treatment};

fn make_table(n_features: usize, n_samples: usize, seed: u64) -> (FeatureTable, Treatment) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let treated: Vec<bool> = (0..n_samples).map(|i| i % 2 == 0).collect();
    let values = (0..n_features)
        .map(|f| {
            treated
                .iter()
                .map(|&t| {
                    let shift = if f < 5 && t { 10.0 } else { 0.0 };
                    shift + rng.r#gen::<f64>() * 50.0
                })
                .collect()
        })
        .collect();
    let features = (0..n_features).map(|f| format!("otu{f}")).collect();
    let samples = (0..n_samples).map(|s| format!("s{s}")).collect();
    (
        FeatureTable::new(features, samples, values).unwrap(),
        Treatment::new(treated),
    )
}

fn bench_cv_evaluate(c: &mut Criterion) {
    let (table, treatment) = make_table(100, 60, 42);
    let train_id = TrainId::Mask((0..60).map(|i| i < 40).collect());
    let cv = CrossValidation::new(10).unwrap().with_n_tree(100);

    c.bench_function("cv_10forests_100trees_100x60", |b| {
        b.iter(|| cv.evaluate(&table, &treatment, &train_id).unwrap());
    });
}

criterion_group!(benches, bench_cv_evaluate);
criterion_main!(benches);
