//! Per-run results, the mean/sd summary and the assembled report.

use std::fmt;

use serde::Serialize;
use sylva_forest::ImportanceRecord;

use crate::confusion::ConfusionCounts;

/// One of the seven per-run metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    TruePositive,
    TrueNegative,
    FalsePositive,
    FalseNegative,
    Error,
    Sensitivity,
    Precision,
}

impl Metric {
    /// Column order of the run table.
    pub const RUN_ORDER: [Metric; 7] = [
        Metric::TruePositive,
        Metric::TrueNegative,
        Metric::FalsePositive,
        Metric::FalseNegative,
        Metric::Error,
        Metric::Sensitivity,
        Metric::Precision,
    ];

    /// Column order of the summary table.
    pub const SUMMARY_ORDER: [Metric; 7] = [
        Metric::TrueNegative,
        Metric::TruePositive,
        Metric::FalseNegative,
        Metric::FalsePositive,
        Metric::Error,
        Metric::Sensitivity,
        Metric::Precision,
    ];

    /// Column header.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Metric::TruePositive => "TP",
            Metric::TrueNegative => "TN",
            Metric::FalsePositive => "FP",
            Metric::FalseNegative => "FN",
            Metric::Error => "error",
            Metric::Sensitivity => "sensitivity",
            Metric::Precision => "precision",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Metrics of one forest on the test set.
///
/// Rates are NaN when their denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunResult {
    #[serde(rename = "TP")]
    pub tp: usize,
    #[serde(rename = "TN")]
    pub tn: usize,
    #[serde(rename = "FP")]
    pub fp: usize,
    #[serde(rename = "FN")]
    pub fn_: usize,
    pub error: f64,
    pub sensitivity: f64,
    pub precision: f64,
}

impl RunResult {
    /// Derive error, sensitivity and precision from raw counts.
    #[must_use]
    pub fn from_counts(counts: ConfusionCounts) -> Self {
        let ConfusionCounts { tp, tn, fp, fn_ } = counts;
        // 0/0 is NaN in IEEE arithmetic.
        let ratio = |num: usize, den: usize| num as f64 / den as f64;
        Self {
            tp,
            tn,
            fp,
            fn_,
            error: ratio(counts.mismatches(), counts.total()),
            sensitivity: ratio(tp, tp + fn_),
            precision: ratio(tp, tp + fp),
        }
    }

    /// Return the confusion counts this result was derived from.
    #[must_use]
    pub fn counts(&self) -> ConfusionCounts {
        ConfusionCounts {
            tp: self.tp,
            tn: self.tn,
            fp: self.fp,
            fn_: self.fn_,
        }
    }

    /// Value of `metric`, with counts widened to `f64`.
    #[must_use]
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TruePositive => self.tp as f64,
            Metric::TrueNegative => self.tn as f64,
            Metric::FalsePositive => self.fp as f64,
            Metric::FalseNegative => self.fn_ as f64,
            Metric::Error => self.error,
            Metric::Sensitivity => self.sensitivity,
            Metric::Precision => self.precision,
        }
    }
}

/// One summary row; fields are declared in summary column order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricRow {
    #[serde(rename = "TN")]
    pub tn: f64,
    #[serde(rename = "TP")]
    pub tp: f64,
    #[serde(rename = "FN")]
    pub fn_: f64,
    #[serde(rename = "FP")]
    pub fp: f64,
    pub error: f64,
    pub sensitivity: f64,
    pub precision: f64,
}

impl MetricRow {
    fn from_fn(mut value: impl FnMut(Metric) -> f64) -> Self {
        Self {
            tn: value(Metric::TrueNegative),
            tp: value(Metric::TruePositive),
            fn_: value(Metric::FalseNegative),
            fp: value(Metric::FalsePositive),
            error: value(Metric::Error),
            sensitivity: value(Metric::Sensitivity),
            precision: value(Metric::Precision),
        }
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TruePositive => self.tp,
            Metric::TrueNegative => self.tn,
            Metric::FalsePositive => self.fp,
            Metric::FalseNegative => self.fn_,
            Metric::Error => self.error,
            Metric::Sensitivity => self.sensitivity,
            Metric::Precision => self.precision,
        }
    }
}

/// Column-wise mean and sample standard deviation of the run table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: MetricRow,
    pub sd: MetricRow,
}

impl Summary {
    /// Summarise a run table.
    ///
    /// The standard deviation uses the `n - 1` denominator, so it is NaN for
    /// a single run. Any NaN in a column propagates to that column's stats.
    #[must_use]
    pub fn from_runs(runs: &[RunResult]) -> Self {
        let column = |m: Metric| runs.iter().map(move |r| r.get(m));
        Self {
            mean: MetricRow::from_fn(|m| mean(column(m))),
            sd: MetricRow::from_fn(|m| sample_sd(column(m))),
        }
    }

    /// Rows in fixed `[mean, sd]` order, labelled.
    #[must_use]
    pub fn rows(&self) -> [(&'static str, &MetricRow); 2] {
        [("mean", &self.mean), ("sd", &self.sd)]
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    sum / n as f64
}

fn sample_sd(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let m = mean(values.clone());
    let (ss, n) = values.fold((0.0, 0usize), |(s, n), v| (s + (v - m).powi(2), n + 1));
    if n < 2 {
        return f64::NAN;
    }
    (ss / (n - 1) as f64).sqrt()
}

/// Full cross-validation output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: Summary,
    /// One row per forest, in run order.
    pub confusion: Vec<RunResult>,
    /// One record per forest, in run order.
    pub importance: Vec<ImportanceRecord>,
}

impl Report {
    /// Assemble a report, computing the summary from `runs`.
    #[must_use]
    pub fn new(runs: Vec<RunResult>, importance: Vec<ImportanceRecord>) -> Self {
        Self {
            summary: Summary::from_runs(&runs),
            confusion: runs,
            importance,
        }
    }

    #[must_use]
    pub fn n_forest(&self) -> usize {
        self.confusion.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tp: usize, tn: usize, fp: usize, fn_: usize) -> RunResult {
        RunResult::from_counts(ConfusionCounts { tp, tn, fp, fn_ })
    }

    #[test]
    fn derived_rates() {
        let r = run(3, 4, 1, 2);
        assert!((r.error - 0.3).abs() < 1e-12);
        assert!((r.sensitivity - 0.6).abs() < 1e-12);
        assert!((r.precision - 0.75).abs() < 1e-12);
        assert_eq!(r.counts().total(), 10);
    }

    #[test]
    fn zero_denominators_are_nan() {
        let r = run(0, 5, 0, 0);
        assert_eq!(r.error, 0.0);
        assert!(r.sensitivity.is_nan());
        assert!(r.precision.is_nan());

        let empty = run(0, 0, 0, 0);
        assert!(empty.error.is_nan());
    }

    #[test]
    fn summary_mean_and_sample_sd() {
        let runs = vec![run(2, 2, 0, 0), run(4, 0, 0, 0)];
        let summary = Summary::from_runs(&runs);
        assert_eq!(summary.mean.tp, 3.0);
        assert_eq!(summary.mean.tn, 1.0);
        // values 2 and 4: sd = sqrt(2)
        assert!((summary.sd.tp - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(summary.sd.fp, 0.0);
    }

    #[test]
    fn single_run_sd_is_nan() {
        let summary = Summary::from_runs(&[run(1, 1, 1, 1)]);
        assert_eq!(summary.mean.error, 0.5);
        assert!(Metric::RUN_ORDER.iter().all(|&m| summary.sd.get(m).is_nan()));
    }

    #[test]
    fn summary_columns_match_run_columns() {
        let mut run_cols: Vec<&str> = Metric::RUN_ORDER.iter().map(|m| m.name()).collect();
        let mut summary_cols: Vec<&str> = Metric::SUMMARY_ORDER.iter().map(|m| m.name()).collect();
        assert_eq!(summary_cols[..4], ["TN", "TP", "FN", "FP"]);
        run_cols.sort_unstable();
        summary_cols.sort_unstable();
        assert_eq!(run_cols, summary_cols);
    }

    #[test]
    fn values_keep_their_labels_across_orders() {
        let r = run(7, 5, 3, 1);
        let summary = Summary::from_runs(&[r, r]);
        for m in Metric::SUMMARY_ORDER {
            assert_eq!(summary.mean.get(m), r.get(m), "{m}");
        }
        assert_eq!(summary.rows()[0].0, "mean");
        assert_eq!(summary.rows()[1].0, "sd");
    }

    #[test]
    fn report_counts_runs() {
        let report = Report::new(vec![run(1, 1, 0, 0); 3], vec![ImportanceRecord::default(); 3]);
        assert_eq!(report.n_forest(), 3);
        assert_eq!(report.importance.len(), 3);
    }
}
