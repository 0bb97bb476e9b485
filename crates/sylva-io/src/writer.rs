//! JSON and CSV writers for cross-validation reports.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sylva_cv::{ImportanceRecord, Metric, Report, RunResult, Summary};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes a [`Report`] under one experiment name.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are `{experiment}_report.json`, `{experiment}_confusion.csv`
/// and `{experiment}_importance.csv`.
pub struct ReportWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ReportWriter {
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    fn path_for(&self, suffix: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{suffix}", self.experiment.as_str()))
    }

    /// Write every artifact and return their paths.
    ///
    /// # Errors
    ///
    /// Propagates the first failure from the individual writers.
    pub fn write_all(&self, report: &Report) -> Result<Vec<PathBuf>, IoError> {
        Ok(vec![
            self.write_report(report)?,
            self.write_confusion(&report.confusion)?,
            self.write_importance(&report.importance)?,
        ])
    }

    /// Write the full report to `{experiment}_report.json`.
    ///
    /// Undefined metrics (NaN) become `null`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] or [`IoError::WriteFile`].
    #[instrument(skip_all)]
    pub fn write_report(&self, report: &Report) -> Result<PathBuf, IoError> {
        let path = self.path_for("report.json");
        let artifact = ReportArtifact {
            experiment: self.experiment.as_str(),
            n_forest: report.n_forest(),
            summary: &report.summary,
            confusion: &report.confusion,
            importance: &report.importance,
        };

        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "report written");
        Ok(path)
    }

    /// Write the run table to `{experiment}_confusion.csv`, one row per forest.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::CsvWrite`] or [`IoError::WriteFile`].
    #[instrument(skip_all, fields(n_runs = runs.len()))]
    pub fn write_confusion(&self, runs: &[RunResult]) -> Result<PathBuf, IoError> {
        let path = self.path_for("confusion.csv");
        let mut header = vec!["forest".to_string()];
        header.extend(Metric::RUN_ORDER.iter().map(|m| m.name().to_string()));

        let rows = runs.iter().enumerate().map(|(i, run)| {
            let mut row = vec![(i + 1).to_string()];
            row.extend(Metric::RUN_ORDER.iter().map(|&m| format_metric(m, run.get(m))));
            row
        });
        self.write_csv(&path, header, rows)?;

        info!(path = %path.display(), "confusion table written");
        Ok(path)
    }

    /// Write importance to `{experiment}_importance.csv`: one row per
    /// feature, one column per forest.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::CsvWrite`] or [`IoError::WriteFile`].
    #[instrument(skip_all, fields(n_runs = records.len()))]
    pub fn write_importance(&self, records: &[ImportanceRecord]) -> Result<PathBuf, IoError> {
        let path = self.path_for("importance.csv");
        let mut header = vec!["feature".to_string()];
        header.extend((1..=records.len()).map(|i| format!("forest_{i}")));

        // Every record of one report shares the same feature order.
        let features: Vec<&str> = records
            .first()
            .map(|r| r.iter().map(|(name, _)| name).collect())
            .unwrap_or_default();
        let rows = features.into_iter().map(|name| {
            let mut row = vec![name.to_string()];
            row.extend(
                records
                    .iter()
                    .map(|r| r.get(name).map_or_else(String::new, |v| v.to_string())),
            );
            row
        });
        self.write_csv(&path, header, rows)?;

        info!(path = %path.display(), "importance table written");
        Ok(path)
    }

    fn write_csv(
        &self,
        path: &Path,
        header: Vec<String>,
        rows: impl Iterator<Item = Vec<String>>,
    ) -> Result<(), IoError> {
        let csv_err = |e: csv::Error| IoError::CsvWrite {
            path: path.to_path_buf(),
            source: e,
        };
        let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;
        wtr.write_record(&header).map_err(csv_err)?;
        for row in rows {
            wtr.write_record(&row).map_err(csv_err)?;
        }
        wtr.flush().map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Counts print as integers, rates as floats, NaN as `NA`.
fn format_metric(metric: Metric, value: f64) -> String {
    match metric {
        Metric::TruePositive
        | Metric::TrueNegative
        | Metric::FalsePositive
        | Metric::FalseNegative => format!("{value:.0}"),
        _ if value.is_nan() => "NA".to_string(),
        _ => value.to_string(),
    }
}

#[derive(Serialize)]
struct ReportArtifact<'a> {
    experiment: &'a str,
    n_forest: usize,
    summary: &'a Summary,
    confusion: &'a [RunResult],
    importance: &'a [ImportanceRecord],
}
