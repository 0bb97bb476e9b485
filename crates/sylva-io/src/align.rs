//! Alignment of treatment tokens with the feature table's sample order.

use std::collections::HashMap;

use tracing::{info, instrument, warn};

use crate::IoError;
use crate::domain::TreatmentDataset;

impl TreatmentDataset {
    /// Order treatment tokens by `sample_names`.
    ///
    /// Treatment rows for samples absent from the table are dropped with a
    /// warning. A table sample without a treatment row is a hard error.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingTreatment`] naming the first unmatched sample.
    #[instrument(skip_all, fields(n_samples = sample_names.len(), n_treatments = self.len()))]
    pub fn align(&self, sample_names: &[String]) -> Result<Vec<String>, IoError> {
        let lookup: HashMap<&str, &str> = self
            .samples
            .iter()
            .zip(&self.tokens)
            .map(|(s, t)| (s.as_str(), t.as_str()))
            .collect();

        let aligned = sample_names
            .iter()
            .map(|name| {
                lookup
                    .get(name.as_str())
                    .map(|t| (*t).to_string())
                    .ok_or_else(|| IoError::MissingTreatment {
                        path: self.path.clone(),
                        sample: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let n_dropped = self.len().saturating_sub(aligned.len());
        if n_dropped > 0 {
            warn!(n_dropped, "dropped treatment rows for samples not in the table");
        }
        info!(n_aligned = aligned.len(), "treatments aligned");
        Ok(aligned)
    }
}
