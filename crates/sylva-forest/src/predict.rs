//! Ensemble prediction.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::ForestError;
use crate::forest::RandomForest;

/// Averaged class probabilities for one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDistribution {
    probs: Vec<f64>,
}

impl ClassDistribution {
    pub(crate) fn new(probs: Vec<f64>) -> Self {
        Self { probs }
    }

    /// Return the most probable class. Ties go to the lowest class index.
    #[must_use]
    pub fn predicted_class(&self) -> usize {
        let mut best = 0;
        for (class, &p) in self.probs.iter().enumerate().skip(1) {
            if p > self.probs[best] {
                best = class;
            }
        }
        best
    }

    /// Return the probability of `class`, or 0 for an unknown class.
    #[must_use]
    pub fn probability(&self, class: usize) -> f64 {
        self.probs.get(class).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }
}

impl RandomForest {
    /// Predict the class of a single sample.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<usize, ForestError> {
        Ok(self.predict_proba(sample)?.predicted_class())
    }

    /// Average the leaf distributions reached by `sample` in every tree.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict_proba(&self, sample: &[f64]) -> Result<ClassDistribution, ForestError> {
        if sample.len() != self.n_features {
            return Err(ForestError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }

        let mut avg = vec![0.0f64; self.n_classes];
        for tree in &self.trees {
            for (slot, p) in avg.iter_mut().zip(tree.predict_proba(sample)?) {
                *slot += p;
            }
        }
        let n = self.trees.len() as f64;
        avg.iter_mut().for_each(|v| *v /= n);

        Ok(ClassDistribution::new(avg))
    }

    /// Predict a batch of samples in parallel, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionFeatureMismatch`] if any sample has the wrong width.
    pub fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, ForestError> {
        features
            .into_par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the candidate feature count used at each split.
    #[must_use]
    pub fn mtry(&self) -> usize {
        self.mtry
    }

    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the fitted trees in growth order.
    #[must_use]
    pub fn trees(&self) -> &[crate::tree::DecisionTree] {
        &self.trees
    }
}

#[cfg(test)]
mod tests {
    use super::ClassDistribution;
    use crate::config::ForestConfig;
    use crate::error::ForestError;

    #[test]
    fn tie_goes_to_lowest_class() {
        let dist = ClassDistribution::new(vec![0.5, 0.5]);
        assert_eq!(dist.predicted_class(), 0);
        let dist = ClassDistribution::new(vec![0.2, 0.4, 0.4]);
        assert_eq!(dist.predicted_class(), 1);
    }

    #[test]
    fn probability_lookup() {
        let dist = ClassDistribution::new(vec![0.25, 0.75]);
        assert!((dist.probability(1) - 0.75).abs() < f64::EPSILON);
        assert_eq!(dist.probability(5), 0.0);
    }

    #[test]
    fn forest_proba_sums_to_one() {
        let features = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]];
        let forest = ForestConfig::new(8)
            .unwrap()
            .with_seed(Some(3))
            .fit(&features, &[0, 0, 1, 1], &["f".to_string()])
            .unwrap();
        let sum: f64 = forest.predict_proba(&[1.5]).unwrap().as_slice().iter().sum();
        assert!((sum - 1.0).abs() < 1e-10);
    }

    #[test]
    fn batch_width_checked() {
        let forest = ForestConfig::new(2)
            .unwrap()
            .with_seed(Some(3))
            .fit(&[vec![0.0, 1.0], vec![1.0, 0.0]], &[0, 1], &["a".into(), "b".into()])
            .unwrap();
        let err = forest.predict_batch(&[vec![0.0, 1.0], vec![2.0]]).unwrap_err();
        assert!(matches!(
            err,
            ForestError::PredictionFeatureMismatch { expected: 2, got: 1 }
        ));
    }
}
