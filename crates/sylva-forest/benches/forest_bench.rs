//! Criterion benchmarks for sylva-forest: training, prediction, importance.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sylva_forest::ForestConfig;

fn make_abundance(
    n_samples: usize,
    n_features: usize,
    seed: u64,
) -> (Vec<Vec<f64>>, Vec<usize>, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut features = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let class = i % 2;
        labels.push(class);
        let row: Vec<f64> = (0..n_features)
            .map(|f| {
                let shift = if f < 5 { class as f64 * 20.0 } else { 0.0 };
                shift + rng.r#gen::<f64>() * 100.0
            })
            .collect();
        features.push(row);
    }
    let names: Vec<String> = (0..n_features).map(|f| format!("otu{f}")).collect();
    (features, labels, names)
}

fn bench_forest_train(c: &mut Criterion) {
    let (features, labels, names) = make_abundance(100, 200, 42);
    let cfg = ForestConfig::new(500).unwrap().with_seed(Some(42));

    c.bench_function("forest_train_100x200_500trees", |b| {
        b.iter(|| cfg.fit(&features, &labels, &names).unwrap());
    });
}

fn bench_forest_predict_batch(c: &mut Criterion) {
    let (features, labels, names) = make_abundance(100, 200, 42);
    let forest = ForestConfig::new(500)
        .unwrap()
        .with_seed(Some(42))
        .fit(&features, &labels, &names)
        .unwrap();

    c.bench_function("forest_predict_batch_100x200_500trees", |b| {
        b.iter(|| forest.predict_batch(&features).unwrap());
    });
}

fn bench_forest_importance(c: &mut Criterion) {
    let (features, labels, names) = make_abundance(100, 200, 42);
    let forest = ForestConfig::new(500)
        .unwrap()
        .with_seed(Some(42))
        .fit(&features, &labels, &names)
        .unwrap();

    c.bench_function("forest_importance_200features_500trees", |b| {
        b.iter(|| forest.importance());
    });
}

criterion_group!(
    benches,
    bench_forest_train,
    bench_forest_predict_batch,
    bench_forest_importance
);
criterion_main!(benches);
