//! Feature table reader (features as rows, samples as columns).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use sylva_cv::FeatureTable;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::delimiter_for;

/// Reads an abundance-style feature table from delimited text.
///
/// Expected format:
/// - Header row required: `feature,<sample_1>,...,<sample_n>`. The first
///   header cell is a label for the name column and is ignored.
/// - One row per feature: `name,value_1,...,value_n`.
/// - Comma-delimited, or tab-delimited for `.tsv`/`.txt` files.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed record |
/// | [`IoError::NoSampleColumns`] | Header has only the name column |
/// | [`IoError::DuplicateSample`] | Same sample name twice in the header |
/// | [`IoError::EmptyDataset`] | Zero feature rows after the header |
/// | [`IoError::InconsistentRowLength`] | Row has a different column count than the header |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf or unparseable |
/// | [`IoError::DuplicateFeature`] | Same feature name on two rows |
pub struct FeatureTableReader {
    path: PathBuf,
}

impl FeatureTableReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the file, returning a [`FeatureTable`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<FeatureTable, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so short rows reach our own length check.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter_for(&self.path))
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.parse_error(e))?;
        let expected_cols = header.len();
        if expected_cols < 2 {
            return Err(IoError::NoSampleColumns {
                path: self.path.clone(),
            });
        }

        let sample_names: Vec<String> = header.iter().skip(1).map(|s| s.trim().to_string()).collect();
        let mut seen_samples = HashSet::with_capacity(sample_names.len());
        for name in &sample_names {
            if !seen_samples.insert(name.as_str()) {
                return Err(IoError::DuplicateSample {
                    path: self.path.clone(),
                    sample: name.clone(),
                });
            }
        }
        debug!(n_samples = sample_names.len(), "read table header");

        let mut feature_names = Vec::new();
        let mut values = Vec::new();
        let mut seen_features: HashMap<String, usize> = HashMap::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.parse_error(e))?;
            let name = record.get(0).unwrap_or("").trim().to_string();

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    key: name,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            if let Some(&first_row) = seen_features.get(&name) {
                return Err(IoError::DuplicateFeature {
                    path: self.path.clone(),
                    feature: name,
                    first_row,
                    second_row: row_index,
                });
            }
            seen_features.insert(name.clone(), row_index);

            let row = record
                .iter()
                .skip(1)
                .enumerate()
                .map(|(col_index, raw)| self.parse_cell(raw, row_index, col_index))
                .collect::<Result<Vec<f64>, IoError>>()?;

            feature_names.push(name);
            values.push(row);
        }

        if feature_names.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_features = feature_names.len(),
            n_samples = sample_names.len(),
            "feature table loaded"
        );

        FeatureTable::new(feature_names, sample_names, values).map_err(|e| IoError::Table {
            path: self.path.clone(),
            source: e,
        })
    }

    fn parse_cell(&self, raw: &str, row_index: usize, col_index: usize) -> Result<f64, IoError> {
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(IoError::NonFiniteValue {
                path: self.path.clone(),
                row_index,
                col_index,
                raw: raw.to_string(),
            }),
        }
    }

    fn parse_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
