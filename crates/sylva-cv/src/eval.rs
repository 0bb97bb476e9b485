//! Repeated forest fits over one fixed train/test partition.

use sylva_forest::ForestConfig;
use tracing::{debug, info, instrument, warn};

use crate::confusion::ConfusionCounts;
use crate::error::CvError;
use crate::label::{Label, Treatment};
use crate::report::{Report, RunResult};
use crate::split::{Split, TrainId};
use crate::table::FeatureTable;

/// Cross-validation configuration.
///
/// Construct via [`CrossValidation::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter  | Default                          |
/// |------------|----------------------------------|
/// | `n_forest` | 10 (via [`Default`])             |
/// | `n_tree`   | 500                              |
/// | `mtry`     | `None` (forest library default)  |
/// | `seed`     | `None`                           |
#[derive(Debug, Clone)]
pub struct CrossValidation {
    n_forest: usize,
    n_tree: usize,
    mtry: Option<usize>,
    seed: Option<u64>,
}

impl CrossValidation {
    /// Create a config that grows `n_forest` forests.
    ///
    /// # Errors
    ///
    /// Returns [`CvError::InvalidForestCount`] if `n_forest` is zero.
    pub fn new(n_forest: usize) -> Result<Self, CvError> {
        if n_forest == 0 {
            return Err(CvError::InvalidForestCount { n_forest });
        }
        Ok(Self {
            n_forest,
            n_tree: 500,
            mtry: None,
            seed: None,
        })
    }

    /// Set the number of trees per forest. Zero is rejected at evaluation.
    #[must_use]
    pub fn with_n_tree(mut self, n_tree: usize) -> Self {
        self.n_tree = n_tree;
        self
    }

    /// Set the candidate feature count per split. `None` uses the library default.
    #[must_use]
    pub fn with_mtry(mut self, mtry: Option<usize>) -> Self {
        self.mtry = mtry;
        self
    }

    /// Set the forest seed. Only honoured when a single forest is grown.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn n_forest(&self) -> usize {
        self.n_forest
    }

    #[must_use]
    pub fn n_tree(&self) -> usize {
        self.n_tree
    }

    /// Seed actually passed to each fit: the configured seed for a single
    /// forest, otherwise `None` so every fit draws fresh entropy.
    #[must_use]
    pub fn effective_seed(&self) -> Option<u64> {
        if self.n_forest == 1 { self.seed } else { None }
    }

    /// Grow `n_forest` forests on the training partition and score each on
    /// the test partition.
    ///
    /// The partition is resolved once and reused for every run. Runs execute
    /// in order; each forest parallelises its own tree growth.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`CvError::TreatmentLengthMismatch`] | treatment not aligned with samples |
    /// | [`CvError::MaskLengthMismatch`] | mask not aligned with samples |
    /// | [`CvError::NoTrainingSamples`] | selector matched nothing |
    /// | [`CvError::Forest`] | any training or prediction failure, e.g. bad `mtry` |
    #[instrument(skip_all, fields(n_forest = self.n_forest, n_tree = self.n_tree))]
    pub fn evaluate(
        &self,
        table: &FeatureTable,
        treatment: &Treatment,
        train_id: &TrainId,
    ) -> Result<Report, CvError> {
        if treatment.len() != table.n_samples() {
            return Err(CvError::TreatmentLengthMismatch {
                treatment: treatment.len(),
                samples: table.n_samples(),
            });
        }

        let split = Split::resolve(table.sample_names(), train_id)?;

        let seed = self.effective_seed();
        if self.seed.is_some() && seed.is_none() {
            debug!(n_forest = self.n_forest, "seed ignored for more than one forest");
        }
        let forest_config = ForestConfig::new(self.n_tree)?
            .with_mtry(self.mtry)
            .with_seed(seed);

        let train_x = table.sample_rows(split.train());
        let train_y: Vec<usize> = treatment
            .labels_at(split.train())
            .into_iter()
            .map(Label::class)
            .collect();
        let test_x = table.sample_rows(split.test());
        let test_truth = treatment.labels_at(split.test());

        if test_x.is_empty() {
            warn!("test set is empty; every metric will be NaN");
        }

        info!("growing {} forests", self.n_forest);

        let mut runs = Vec::with_capacity(self.n_forest);
        let mut importance = Vec::with_capacity(self.n_forest);
        for run in 0..self.n_forest {
            let forest = forest_config.fit(&train_x, &train_y, table.feature_names())?;
            let predicted: Vec<Label> = forest
                .predict_batch(&test_x)?
                .into_iter()
                .map(Label::from_class)
                .collect();

            let counts = ConfusionCounts::tally(&test_truth, &predicted);
            let result = RunResult::from_counts(counts);
            debug!(run, error = result.error, "forest evaluated");

            runs.push(result);
            importance.push(forest.importance());
        }

        info!("done");
        Ok(Report::new(runs, importance))
    }
}

impl Default for CrossValidation {
    fn default() -> Self {
        Self {
            n_forest: 10,
            n_tree: 500,
            mtry: None,
            seed: None,
        }
    }
}
