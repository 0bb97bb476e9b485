//! I/O error types for sylva-io.

use std::path::PathBuf;

use sylva_cv::CvError;

/// Errors from reading input tables and writing reports.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the file.
        path: PathBuf,
    },

    /// Returned when the feature table header names no sample column.
    #[error("no sample columns in {path}")]
    NoSampleColumns {
        /// Path to the file.
        path: PathBuf,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} ({key}) has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// First cell of the offending row.
        key: String,
        /// Expected number of columns.
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a cell is NaN, infinite or not a number.
    #[error("non-finite value in {path}: row {row_index}, column {col_index}, raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path to the file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Zero-based column index (excluding the name column).
        col_index: usize,
        /// The raw cell text.
        raw: String,
    },

    /// Returned when a feature name appears on more than one row.
    #[error("duplicate feature \"{feature}\" in {path}: first at row {first_row}, again at row {second_row}")]
    DuplicateFeature {
        /// Path to the file.
        path: PathBuf,
        /// The duplicated name.
        feature: String,
        /// Zero-based row index of the first occurrence.
        first_row: usize,
        /// Zero-based row index of the second occurrence.
        second_row: usize,
    },

    /// Returned when a sample name appears more than once.
    #[error("duplicate sample \"{sample}\" in {path}")]
    DuplicateSample {
        /// Path to the file.
        path: PathBuf,
        /// The duplicated name.
        sample: String,
    },

    /// Returned when a table sample has no treatment entry.
    #[error("sample \"{sample}\" has no treatment in {path}")]
    MissingTreatment {
        /// Path to the treatment file.
        path: PathBuf,
        /// The sample without a treatment.
        sample: String,
    },

    /// Returned when the assembled table is rejected by the core.
    #[error("invalid feature table in {path}")]
    Table {
        /// Path to the table file.
        path: PathBuf,
        /// Underlying validation error.
        source: CvError,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a CSV result file cannot be written.
    #[error("cannot write CSV {path}")]
    CsvWrite {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the JSON report cannot be serialised.
    #[error("cannot serialise report for {path}")]
    Serialize {
        /// Destination path.
        path: PathBuf,
        /// Underlying serde_json error.
        source: serde_json::Error,
    },
}
