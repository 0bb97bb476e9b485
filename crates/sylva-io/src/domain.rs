//! Domain types for sylva-io.

use std::path::{Path, PathBuf};

use crate::IoError;

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw treatment tokens keyed by sample, in file order.
///
/// Tokens are kept unparsed so the boolean check happens in one place,
/// [`sylva_cv::Treatment::parse`].
#[derive(Debug, Clone)]
pub struct TreatmentDataset {
    pub(crate) path: PathBuf,
    pub(crate) samples: Vec<String>,
    pub(crate) tokens: Vec<String>,
}

impl TreatmentDataset {
    pub(crate) fn new(path: &Path, samples: Vec<String>, tokens: Vec<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            samples,
            tokens,
        }
    }

    #[must_use]
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Column delimiter for a path: tab for `.tsv` and `.txt`, comma otherwise.
pub(crate) fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("txt") => b'\t',
        _ => b',',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experiment_name_valid() {
        let name = ExperimentName::new("gut-16S_run01".to_string()).unwrap();
        assert_eq!(name.as_str(), "gut-16S_run01");
        assert_eq!(name.to_string(), "gut-16S_run01");
    }

    #[test]
    fn experiment_name_rejects_empty() {
        let name = ExperimentName::new(String::new());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn experiment_name_rejects_path_separators() {
        let name = ExperimentName::new("../escape".to_string());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn delimiter_by_extension() {
        assert_eq!(delimiter_for(Path::new("otu.tsv")), b'\t');
        assert_eq!(delimiter_for(Path::new("otu.TXT")), b'\t');
        assert_eq!(delimiter_for(Path::new("otu.csv")), b',');
        assert_eq!(delimiter_for(Path::new("otu")), b',');
    }
}
