use crate::error::CvError;

/// Numeric matrix with named feature rows and named sample columns.
///
/// Stored feature-major, the way abundance tables are laid out on disk;
/// [`FeatureTable::sample_rows`] performs the transpose the classifier needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    feature_names: Vec<String>,
    sample_names: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl FeatureTable {
    /// Build a table from `values[feature][sample]`.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`CvError::EmptyTable`] | no feature or no sample |
    /// | [`CvError::TableShapeMismatch`] | row count differs from `feature_names`, or a row is not one value per sample |
    pub fn new(
        feature_names: Vec<String>,
        sample_names: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> Result<Self, CvError> {
        if feature_names.is_empty() || sample_names.is_empty() {
            return Err(CvError::EmptyTable {
                n_features: feature_names.len(),
                n_samples: sample_names.len(),
            });
        }
        if values.len() != feature_names.len() {
            return Err(CvError::TableShapeMismatch {
                feature: "<rows>".to_string(),
                expected: feature_names.len(),
                got: values.len(),
            });
        }
        for (name, row) in feature_names.iter().zip(&values) {
            if row.len() != sample_names.len() {
                return Err(CvError::TableShapeMismatch {
                    feature: name.clone(),
                    expected: sample_names.len(),
                    got: row.len(),
                });
            }
        }
        Ok(Self {
            feature_names,
            sample_names,
            values,
        })
    }

    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[must_use]
    pub fn sample_names(&self) -> &[String] {
        &self.sample_names
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.sample_names.len()
    }

    /// Value of `feature` in `sample`, if both indices are in range.
    #[must_use]
    pub fn get(&self, feature: usize, sample: usize) -> Option<f64> {
        self.values.get(feature)?.get(sample).copied()
    }

    /// Transpose the selected sample columns into row-major feature vectors.
    ///
    /// Rows come out in the order of `sample_indices`.
    #[must_use]
    pub fn sample_rows(&self, sample_indices: &[usize]) -> Vec<Vec<f64>> {
        sample_indices
            .iter()
            .map(|&s| self.values.iter().map(|row| row[s]).collect())
            .collect()
    }
}
