//! File I/O, validation and serialization for the sylva pipeline.

mod align;
mod domain;
mod error;
mod table_reader;
mod treatment_reader;
mod writer;

pub use domain::{ExperimentName, TreatmentDataset};
pub use error::IoError;
pub use table_reader::FeatureTableReader;
pub use treatment_reader::TreatmentReader;
pub use writer::ReportWriter;
