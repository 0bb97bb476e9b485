//! Two-column treatment file reader.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::IoError;
use crate::domain::{TreatmentDataset, delimiter_for};

/// Reads per-sample treatment tokens.
///
/// Expected format: a header row, then `sample,treat` rows. The treatment
/// cell is stored verbatim; whether it is boolean is decided later.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed record |
/// | [`IoError::InconsistentRowLength`] | Row is not exactly two columns |
/// | [`IoError::DuplicateSample`] | Same sample listed twice |
/// | [`IoError::EmptyDataset`] | No data rows |
pub struct TreatmentReader {
    path: PathBuf,
}

impl TreatmentReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<TreatmentDataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter_for(&self.path))
            .from_reader(file);

        let mut samples = Vec::new();
        let mut tokens = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;
            let sample = record.get(0).unwrap_or("").trim().to_string();

            if record.len() != 2 {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    key: sample,
                    expected: 2,
                    got: record.len(),
                });
            }
            if seen.insert(sample.clone(), row_index).is_some() {
                return Err(IoError::DuplicateSample {
                    path: self.path.clone(),
                    sample,
                });
            }

            tokens.push(record.get(1).unwrap_or("").to_string());
            samples.push(sample);
        }

        if samples.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(n_samples = samples.len(), "treatments loaded");
        Ok(TreatmentDataset::new(&self.path, samples, tokens))
    }
}
