//! End-to-end cross-validation scenarios on deterministic synthetic tables.

use std::io;
use std::sync::{Arc, Mutex};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sylva_cv::{CrossValidation, CvError, FeatureTable, Metric, Split, TrainId, Treatment};

/// 10 features × 20 samples; treatment alternates true/false.
///
/// Features 0-1 shift by +5 for treated samples, the rest are noise in [0, 1).
fn make_table(seed: u64) -> (FeatureTable, Treatment) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n_samples = 20;
    let n_features = 10;
    let treated: Vec<bool> = (0..n_samples).map(|i| i % 2 == 0).collect();

    let values: Vec<Vec<f64>> = (0..n_features)
        .map(|f| {
            treated
                .iter()
                .map(|&t| {
                    let shift = if f < 2 && t { 5.0 } else { 0.0 };
                    shift + rng.r#gen::<f64>()
                })
                .collect()
        })
        .collect();
    let features = (0..n_features).map(|f| format!("otu{f}")).collect();
    let samples = (0..n_samples).map(|s| format!("sample{s:02}")).collect();
    let table = FeatureTable::new(features, samples, values).unwrap();
    (table, Treatment::new(treated))
}

fn first_n_mask(n: usize, total: usize) -> TrainId {
    TrainId::Mask((0..total).map(|i| i < n).collect())
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber that records WARN-and-above events.
fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    (out, text)
}

#[test]
fn single_forest_scenario() {
    let (table, treatment) = make_table(42);
    let train_id = first_n_mask(12, 20);

    let split = Split::resolve(table.sample_names(), &train_id).unwrap();
    assert_eq!(split.train().len(), 12);
    assert_eq!(split.test().len(), 8);

    let report = CrossValidation::new(1)
        .unwrap()
        .with_seed(Some(42))
        .evaluate(&table, &treatment, &train_id)
        .unwrap();

    assert_eq!(report.confusion.len(), 1);
    assert_eq!(report.importance.len(), 1);
    assert_eq!(report.importance[0].len(), 10);
    assert_eq!(report.confusion[0].counts().total(), 8);
    assert!(report.importance[0].iter().all(|(_, v)| v >= 0.0));
}

#[test]
fn fixed_seed_single_forest_is_idempotent() {
    let (table, treatment) = make_table(42);
    let train_id = first_n_mask(12, 20);
    let cv = CrossValidation::new(1).unwrap().with_n_tree(100).with_seed(Some(42));

    let a = cv.evaluate(&table, &treatment, &train_id).unwrap();
    let b = cv.evaluate(&table, &treatment, &train_id).unwrap();
    assert_eq!(a.confusion, b.confusion);
    assert_eq!(a.importance, b.importance);
}

#[test]
fn run_invariants_hold_over_many_forests() {
    let (table, treatment) = make_table(7);
    let train_id = TrainId::pattern("sample(0|1[0-3])").unwrap();
    let split = Split::resolve(table.sample_names(), &train_id).unwrap();
    let n_test = split.test().len();
    assert_eq!(split.train().len() + n_test, 20);

    let report = CrossValidation::new(5)
        .unwrap()
        .with_n_tree(50)
        .evaluate(&table, &treatment, &train_id)
        .unwrap();

    assert_eq!(report.n_forest(), 5);
    assert_eq!(report.importance.len(), 5);
    for row in &report.confusion {
        assert_eq!(row.tp + row.tn + row.fp + row.fn_, n_test);
        let expected = (row.fp + row.fn_) as f64 / n_test as f64;
        assert!((row.error - expected).abs() < 1e-12);
    }
    for m in Metric::RUN_ORDER {
        let values: Vec<f64> = report.confusion.iter().map(|r| r.get(m)).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let got = report.summary.mean.get(m);
        assert!(
            (got - mean).abs() < 1e-9 || (got.is_nan() && mean.is_nan()),
            "{m}: {got} vs {mean}"
        );
    }
}

#[test]
fn separable_signal_is_learned() {
    let (table, treatment) = make_table(3);
    let report = CrossValidation::new(3)
        .unwrap()
        .with_n_tree(100)
        .with_mtry(Some(5))
        .evaluate(&table, &treatment, &first_n_mask(12, 20))
        .unwrap();
    assert!(
        report.summary.mean.error < 0.2,
        "mean error {}",
        report.summary.mean.error
    );
    for record in &report.importance {
        let signal = record.get("otu0").unwrap() + record.get("otu1").unwrap();
        let noise: f64 = (2..10).map(|f| record.get(&format!("otu{f}")).unwrap()).sum();
        assert!(signal > noise, "signal {signal} <= noise {noise}");
    }
}

#[test]
fn one_training_sample_warns_but_succeeds() {
    let (table, treatment) = make_table(42);
    let (result, logs) = capture_warnings(|| {
        CrossValidation::new(1)
            .unwrap()
            .with_n_tree(10)
            .with_seed(Some(1))
            .evaluate(&table, &treatment, &first_n_mask(1, 20))
    });
    let report = result.unwrap();
    assert_eq!(report.confusion[0].counts().total(), 19);
    assert!(logs.contains("only one sample"), "logs: {logs}");
}

#[test]
fn zero_matches_fail_before_training() {
    let (table, treatment) = make_table(42);
    let err = CrossValidation::new(2)
        .unwrap()
        .evaluate(&table, &treatment, &TrainId::pattern("^control").unwrap())
        .unwrap_err();
    assert!(matches!(err, CvError::NoTrainingSamples));
    assert_eq!(err.to_string(), "train.id does not match sample names");
}

#[test]
fn non_boolean_treatment_rejected() {
    let tokens: Vec<String> = (0..20).map(|i| (i % 2).to_string()).collect();
    let err = Treatment::parse(&tokens).unwrap_err();
    assert!(matches!(err, CvError::NonBooleanTreatment { index: 0, .. }));
}

#[test]
fn mtry_above_feature_count_propagates() {
    let (table, treatment) = make_table(42);
    let err = CrossValidation::new(1)
        .unwrap()
        .with_mtry(Some(11))
        .evaluate(&table, &treatment, &first_n_mask(12, 20))
        .unwrap_err();
    assert!(matches!(err, CvError::Forest(_)));
}

#[test]
fn report_serialises_nan_as_null() {
    let (table, treatment) = make_table(42);
    let report = CrossValidation::new(1)
        .unwrap()
        .with_n_tree(10)
        .with_seed(Some(5))
        .evaluate(&table, &treatment, &first_n_mask(12, 20))
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert!(json["summary"]["sd"]["error"].is_null());
    assert_eq!(json["confusion"].as_array().unwrap().len(), 1);
    assert!(json["importance"][0]["otu3"].is_number());
    let keys: Vec<&String> = json["summary"]["mean"].as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 7);
}
