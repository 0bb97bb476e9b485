//! Fixed-split repeated cross-validation of a random forest classifier.
//!
//! A [`FeatureTable`] (features × samples) and a boolean [`Treatment`] per
//! sample are partitioned once by a [`TrainId`] selector. The
//! [`CrossValidation`] loop then grows `n_forest` forests on the training
//! samples, scores each on the test samples and returns a [`Report`] with
//! per-run confusion metrics, their mean/sd summary and per-run feature
//! importance.

mod confusion;
mod error;
mod eval;
mod label;
mod report;
mod split;
mod table;

pub use confusion::ConfusionCounts;
pub use error::CvError;
pub use eval::CrossValidation;
pub use label::{Label, Treatment};
pub use report::{Metric, MetricRow, Report, RunResult, Summary};
pub use split::{Split, TrainId};
pub use sylva_forest::ImportanceRecord;
pub use table::FeatureTable;
