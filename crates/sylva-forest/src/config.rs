//! Configuration builder for forest training.

use crate::error::ForestError;
use crate::forest::RandomForest;
use crate::split::SplitCriterion;

/// Configuration for random forest training.
///
/// Construct via [`ForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default                              |
/// |---------------------|--------------------------------------|
/// | `mtry`              | `None` (`max(1, floor(sqrt(p)))`)    |
/// | `seed`              | `None` (fresh entropy on every fit)  |
/// | `criterion`         | `Gini`                               |
/// | `max_depth`         | `None`                               |
/// | `min_samples_split` | 2                                    |
/// | `min_samples_leaf`  | 1                                    |
#[derive(Debug, Clone)]
pub struct ForestConfig {
    pub(crate) n_tree: usize,
    pub(crate) mtry: Option<usize>,
    pub(crate) seed: Option<u64>,
    pub(crate) criterion: SplitCriterion,
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
}

impl ForestConfig {
    /// Create a new config growing `n_tree` trees.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::InvalidTreeCount`] if `n_tree` is zero.
    pub fn new(n_tree: usize) -> Result<Self, ForestError> {
        if n_tree == 0 {
            return Err(ForestError::InvalidTreeCount { n_tree });
        }
        Ok(Self {
            n_tree,
            mtry: None,
            seed: None,
            criterion: SplitCriterion::Gini,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        })
    }

    /// Set the number of candidate features per split. `None` uses the default.
    #[must_use]
    pub fn with_mtry(mut self, mtry: Option<usize>) -> Self {
        self.mtry = mtry;
        self
    }

    /// Fix the master seed. `None` draws a fresh seed on every fit.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Set the split quality criterion.
    #[must_use]
    pub fn with_criterion(mut self, criterion: SplitCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the maximum tree depth. `None` means unlimited.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples required to attempt a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the minimum number of samples required in each leaf.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Return the number of trees.
    #[must_use]
    pub fn n_tree(&self) -> usize {
        self.n_tree
    }

    /// Return the requested mtry, if any.
    #[must_use]
    pub fn mtry(&self) -> Option<usize> {
        self.mtry
    }

    /// Return the fixed seed, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Resolve mtry against a feature count.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::InvalidMtry`] when the value is zero or exceeds
    /// `n_features`.
    pub fn resolve_mtry(&self, n_features: usize) -> Result<usize, ForestError> {
        let mtry = self
            .mtry
            .unwrap_or_else(|| ((n_features as f64).sqrt().floor() as usize).max(1));
        if mtry == 0 || mtry > n_features {
            return Err(ForestError::InvalidMtry { mtry, n_features });
        }
        Ok(mtry)
    }

    /// Train a forest.
    ///
    /// `features[sample][feature]` is row-major, `labels[sample]` holds
    /// zero-based classes, and `feature_names` names each column.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`ForestError::EmptyDataset`] | `features` is empty |
    /// | [`ForestError::ZeroFeatures`] | rows have zero columns |
    /// | [`ForestError::FeatureCountMismatch`] | rows have inconsistent lengths |
    /// | [`ForestError::LabelCountMismatch`] | labels not aligned with rows |
    /// | [`ForestError::FeatureNameCountMismatch`] | names not aligned with columns |
    /// | [`ForestError::NonFiniteValue`] | any value is NaN or infinite |
    /// | [`ForestError::InvalidMtry`] | mtry outside `[1, n_features]` |
    /// | [`ForestError::InvalidMaxDepth`] and friends | invalid tree limits |
    pub fn fit(
        &self,
        features: &[Vec<f64>],
        labels: &[usize],
        feature_names: &[String],
    ) -> Result<RandomForest, ForestError> {
        crate::forest::train(self, features, labels, feature_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_trees_rejected() {
        assert!(matches!(
            ForestConfig::new(0),
            Err(ForestError::InvalidTreeCount { n_tree: 0 })
        ));
    }

    #[test]
    fn default_mtry_is_floor_sqrt() {
        let config = ForestConfig::new(1).unwrap();
        assert_eq!(config.resolve_mtry(10).unwrap(), 3);
        assert_eq!(config.resolve_mtry(16).unwrap(), 4);
        assert_eq!(config.resolve_mtry(1).unwrap(), 1);
    }

    #[test]
    fn explicit_mtry_bounds() {
        let config = ForestConfig::new(1).unwrap().with_mtry(Some(11));
        assert!(matches!(
            config.resolve_mtry(10),
            Err(ForestError::InvalidMtry { mtry: 11, n_features: 10 })
        ));
        let config = ForestConfig::new(1).unwrap().with_mtry(Some(0));
        assert!(config.resolve_mtry(10).is_err());
        let config = ForestConfig::new(1).unwrap().with_mtry(Some(10));
        assert_eq!(config.resolve_mtry(10).unwrap(), 10);
    }

    #[test]
    fn setters_round_trip() {
        let config = ForestConfig::new(25)
            .unwrap()
            .with_mtry(Some(2))
            .with_seed(Some(9));
        assert_eq!(config.n_tree(), 25);
        assert_eq!(config.mtry(), Some(2));
        assert_eq!(config.seed(), Some(9));
    }
}
