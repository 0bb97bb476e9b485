use rand::Rng;

use crate::node::{FeatureIndex, Impurity};

/// Node impurity measure used to score candidate splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitCriterion {
    /// Gini impurity: 1 - Σ(p_i²)
    #[default]
    Gini,
    /// Information entropy: -Σ(p_i · ln(p_i))
    Entropy,
}

impl SplitCriterion {
    /// Compute the impurity of a node from its class counts.
    ///
    /// An empty node has zero impurity.
    #[must_use]
    pub fn impurity(&self, class_counts: &[usize], n_samples: usize) -> Impurity {
        if n_samples == 0 {
            return Impurity::new(0.0);
        }
        let n = n_samples as f64;
        let proportions = class_counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| c as f64 / n);
        let value = match self {
            SplitCriterion::Gini => 1.0 - proportions.map(|p| p * p).sum::<f64>(),
            SplitCriterion::Entropy => -proportions.map(|p| p * p.ln()).sum::<f64>(),
        };
        Impurity::new(value)
    }
}

/// The winning split of a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitResult {
    pub(crate) feature: FeatureIndex,
    pub(crate) threshold: f64,
    pub(crate) decrease: f64,
    pub(crate) left_indices: Vec<usize>,
    pub(crate) right_indices: Vec<usize>,
}

/// Per-tree split search parameters.
///
/// `columns` is column-major: `columns[feature][sample]`.
#[derive(Debug)]
pub(crate) struct SplitSearch<'a> {
    pub(crate) columns: &'a [Vec<f64>],
    pub(crate) labels: &'a [usize],
    pub(crate) n_classes: usize,
    pub(crate) criterion: SplitCriterion,
    pub(crate) mtry: usize,
    pub(crate) min_samples_leaf: usize,
}

impl SplitSearch<'_> {
    /// Count labels of the given samples.
    pub(crate) fn class_counts(&self, sample_indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &si in sample_indices {
            counts[self.labels[si]] += 1;
        }
        counts
    }

    /// Find the best split of `sample_indices` over `mtry` randomly drawn features.
    ///
    /// Candidate features are drawn without replacement (partial Fisher-Yates).
    /// Thresholds are midpoints between consecutive distinct values. Returns
    /// `None` when every candidate feature is constant on the node or every
    /// boundary violates `min_samples_leaf`.
    pub(crate) fn find_best(
        &self,
        sample_indices: &[usize],
        rng: &mut impl Rng,
    ) -> Option<SplitResult> {
        let n_features = self.columns.len();
        let n_samples = sample_indices.len();
        if n_samples < 2 || n_features == 0 {
            return None;
        }

        let parent_counts = self.class_counts(sample_indices);
        let parent_impurity = self.criterion.impurity(&parent_counts, n_samples).value();

        let mut feature_order: Vec<usize> = (0..n_features).collect();
        let take = self.mtry.min(n_features);
        for i in 0..take {
            let j = rng.gen_range(i..n_features);
            feature_order.swap(i, j);
        }

        let mut best: Option<(usize, f64, f64)> = None;
        let mut sorted: Vec<(f64, usize)> = Vec::with_capacity(n_samples);

        for &feature in &feature_order[..take] {
            let column = &self.columns[feature];
            sorted.clear();
            sorted.extend(sample_indices.iter().map(|&si| (column[si], si)));
            sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_counts = vec![0usize; self.n_classes];
            let mut right_counts = parent_counts.clone();

            for i in 0..n_samples - 1 {
                let (value, si) = sorted[i];
                let class = self.labels[si];
                left_counts[class] += 1;
                right_counts[class] -= 1;

                let next = sorted[i + 1].0;
                if value == next {
                    continue;
                }

                let n_left = i + 1;
                let n_right = n_samples - n_left;
                if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                    continue;
                }

                let left = self.criterion.impurity(&left_counts, n_left).value();
                let right = self.criterion.impurity(&right_counts, n_right).value();
                let decrease = n_samples as f64 * parent_impurity
                    - n_left as f64 * left
                    - n_right as f64 * right;

                if best.is_none_or(|(_, _, d)| decrease > d) {
                    best = Some((feature, (value + next) / 2.0, decrease));
                }
            }
        }

        let (feature, threshold, decrease) = best?;
        let column = &self.columns[feature];
        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = sample_indices
            .iter()
            .partition(|&&si| column[si] <= threshold);

        Some(SplitResult {
            feature: FeatureIndex::new(feature),
            threshold,
            decrease,
            left_indices,
            right_indices,
        })
    }
}
