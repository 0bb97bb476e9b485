use sylva_forest::ForestError;

/// Errors from table construction, split resolution and cross-validation.
#[derive(Debug, thiserror::Error)]
pub enum CvError {
    /// Returned when n_forest is zero.
    #[error("n_forest must be at least 1, got {n_forest}")]
    InvalidForestCount {
        /// The invalid n_forest value provided.
        n_forest: usize,
    },

    /// Returned when the treatment vector is not aligned with the table's samples.
    #[error("treatment has {treatment} entries but the table has {samples} samples")]
    TreatmentLengthMismatch {
        /// Number of treatment entries.
        treatment: usize,
        /// Number of sample columns in the feature table.
        samples: usize,
    },

    /// Returned when a treatment token is not a logical literal.
    #[error("treatment must be boolean, found {value:?} at position {index}")]
    NonBooleanTreatment {
        /// Zero-based position of the offending entry.
        index: usize,
        /// The raw token.
        value: String,
    },

    /// Returned when a boolean training mask does not cover every sample.
    #[error("train mask has {mask} entries but the table has {samples} samples")]
    MaskLengthMismatch {
        /// Length of the mask.
        mask: usize,
        /// Number of samples.
        samples: usize,
    },

    /// Returned when a training pattern is not a valid regular expression.
    #[error("invalid train pattern {pattern:?}")]
    InvalidPattern {
        /// The pattern as supplied.
        pattern: String,
        /// The underlying regex compile error.
        #[source]
        source: regex::Error,
    },

    /// Returned when the training selector matches no sample.
    #[error("train.id does not match sample names")]
    NoTrainingSamples,

    /// Returned when the feature table has no features or no samples.
    #[error("feature table is empty: {n_features} features, {n_samples} samples")]
    EmptyTable {
        /// Number of feature rows.
        n_features: usize,
        /// Number of sample columns.
        n_samples: usize,
    },

    /// Returned when a feature row does not have one value per sample.
    #[error("feature {feature:?} has {got} values, expected {expected}")]
    TableShapeMismatch {
        /// Name of the offending feature.
        feature: String,
        /// Number of samples.
        expected: usize,
        /// Number of values found.
        got: usize,
    },

    /// Propagated from the forest library.
    #[error(transparent)]
    Forest(#[from] ForestError),
}
