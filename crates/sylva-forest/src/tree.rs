use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::{
    ForestError,
    node::{Impurity, Node, NodeIndex},
    split::{SplitCriterion, SplitSearch},
};

/// Configuration for a single CART decision tree.
///
/// # Defaults
///
/// | Parameter           | Default               |
/// |---------------------|-----------------------|
/// | `criterion`         | `Gini`                |
/// | `max_depth`         | `None` (unlimited)    |
/// | `min_samples_split` | 2                     |
/// | `min_samples_leaf`  | 1                     |
/// | `mtry`              | `None` (all features) |
/// | `seed`              | 0                     |
#[derive(Debug, Clone)]
pub struct DecisionTreeConfig {
    pub(crate) criterion: SplitCriterion,
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) mtry: Option<usize>,
    pub(crate) seed: u64,
}

impl DecisionTreeConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            criterion: SplitCriterion::Gini,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            mtry: None,
            seed: 0,
        }
    }

    /// Set the split quality criterion.
    #[must_use]
    pub fn with_criterion(mut self, criterion: SplitCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the maximum tree depth (root is depth 0). `None` grows until pure.
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

    /// Set the minimum number of samples required in each leaf after a split.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set the number of candidate features drawn at each split.
    #[must_use]
    pub fn with_mtry(mut self, mtry: Option<usize>) -> Self {
        self.mtry = mtry;
        self
    }

    /// Set the seed of the tree's feature-sampling RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Train a decision tree on a row-major dataset.
    ///
    /// `features[sample][feature]`, `labels[sample]` (zero-based classes).
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`ForestError::EmptyDataset`] | `features` is empty |
    /// | [`ForestError::ZeroFeatures`] | rows have zero columns |
    /// | [`ForestError::FeatureCountMismatch`] | rows have inconsistent lengths |
    /// | [`ForestError::LabelCountMismatch`] | `labels.len() != features.len()` |
    /// | [`ForestError::NonFiniteValue`] | any value is NaN or infinite |
    /// | [`ForestError::InvalidMtry`] | `mtry` outside `[1, n_features]` |
    /// | [`ForestError::InvalidMaxDepth`] | `max_depth` is `Some(0)` |
    /// | [`ForestError::InvalidMinSamplesSplit`] | `min_samples_split < 2` |
    /// | [`ForestError::InvalidMinSamplesLeaf`] | `min_samples_leaf < 1` |
    #[instrument(skip(self, features, labels), fields(n_samples = features.len()))]
    pub fn fit(&self, features: &[Vec<f64>], labels: &[usize]) -> Result<DecisionTree, ForestError> {
        let n_features = validate_rows(features, labels)?;
        self.validate(n_features)?;
        let n_classes = labels.iter().max().copied().unwrap_or(0) + 1;

        let columns: Vec<Vec<f64>> = (0..n_features)
            .map(|f| features.iter().map(|row| row[f]).collect())
            .collect();
        let indices: Vec<usize> = (0..features.len()).collect();
        Ok(self.grow(&columns, labels, &indices, n_classes))
    }

    pub(crate) fn validate(&self, n_features: usize) -> Result<(), ForestError> {
        if self.max_depth == Some(0) {
            return Err(ForestError::InvalidMaxDepth { max_depth: 0 });
        }
        if self.min_samples_split < 2 {
            return Err(ForestError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }
        if self.min_samples_leaf < 1 {
            return Err(ForestError::InvalidMinSamplesLeaf {
                min_samples_leaf: self.min_samples_leaf,
            });
        }
        let mtry = self.mtry.unwrap_or(n_features);
        if mtry == 0 || mtry > n_features {
            return Err(ForestError::InvalidMtry { mtry, n_features });
        }
        Ok(())
    }

    /// Grow a tree over `sample_indices` of pre-validated column-major data.
    ///
    /// Indices may repeat, which is how bootstrap samples are represented.
    pub(crate) fn grow(
        &self,
        columns: &[Vec<f64>],
        labels: &[usize],
        sample_indices: &[usize],
        n_classes: usize,
    ) -> DecisionTree {
        let search = SplitSearch {
            columns,
            labels,
            n_classes,
            criterion: self.criterion,
            mtry: self.mtry.unwrap_or(columns.len()),
            min_samples_leaf: self.min_samples_leaf,
        };
        let mut builder = TreeBuilder {
            config: self,
            search,
            rng: ChaCha8Rng::seed_from_u64(self.seed),
            arena: Vec::new(),
        };
        builder.build(sample_indices, 0);

        debug!(n_nodes = builder.arena.len(), "decision tree grown");

        DecisionTree {
            nodes: builder.arena,
            n_features: columns.len(),
            n_classes,
        }
    }
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a row-major dataset and return its feature count.
pub(crate) fn validate_rows(features: &[Vec<f64>], labels: &[usize]) -> Result<usize, ForestError> {
    let first = features.first().ok_or(ForestError::EmptyDataset)?;
    let n_features = first.len();
    if n_features == 0 {
        return Err(ForestError::ZeroFeatures);
    }
    if labels.len() != features.len() {
        return Err(ForestError::LabelCountMismatch {
            labels: labels.len(),
            samples: features.len(),
        });
    }
    for (sample_index, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(ForestError::FeatureCountMismatch {
                expected: n_features,
                got: row.len(),
                sample_index,
            });
        }
        if let Some(feature_index) = row.iter().position(|v| !v.is_finite()) {
            return Err(ForestError::NonFiniteValue {
                sample_index,
                feature_index,
            });
        }
    }
    Ok(n_features)
}

struct TreeBuilder<'a> {
    config: &'a DecisionTreeConfig,
    search: SplitSearch<'a>,
    rng: ChaCha8Rng,
    arena: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn build(&mut self, sample_indices: &[usize], depth: usize) -> NodeIndex {
        let n_samples = sample_indices.len();
        let counts = self.search.class_counts(sample_indices);
        let impurity = self.config.criterion.impurity(&counts, n_samples);

        let stop = impurity.is_pure()
            || n_samples < self.config.min_samples_split
            || self.config.max_depth.is_some_and(|d| depth >= d);
        if stop {
            return self.push_leaf(&counts, impurity, n_samples);
        }

        let Some(split) = self.search.find_best(sample_indices, &mut self.rng) else {
            return self.push_leaf(&counts, impurity, n_samples);
        };

        // Reserve the parent slot so children get higher indices.
        let idx = self.arena.len();
        self.arena.push(Node::Leaf {
            prediction: 0,
            distribution: Vec::new(),
            impurity,
            n_samples,
        });
        let left = self.build(&split.left_indices, depth + 1);
        let right = self.build(&split.right_indices, depth + 1);
        self.arena[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            n_samples,
            decrease: split.decrease,
        };
        NodeIndex::new(idx)
    }

    fn push_leaf(&mut self, counts: &[usize], impurity: Impurity, n_samples: usize) -> NodeIndex {
        let total = n_samples.max(1) as f64;
        let distribution = counts.iter().map(|&c| c as f64 / total).collect();
        let prediction = counts
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
            .map_or(0, |(class, _)| class);
        let idx = self.arena.len();
        self.arena.push(Node::Leaf {
            prediction,
            distribution,
            impurity,
            n_samples,
        });
        NodeIndex::new(idx)
    }
}

/// A fitted CART decision tree stored as a node arena.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) n_features: usize,
    pub(crate) n_classes: usize,
}

impl DecisionTree {
    /// Predict the class of a single sample.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<usize, ForestError> {
        self.leaf(sample).map(|(prediction, _)| prediction)
    }

    /// Return the class distribution of the leaf reached by `sample`.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict_proba(&self, sample: &[f64]) -> Result<&[f64], ForestError> {
        self.leaf(sample).map(|(_, distribution)| distribution)
    }

    /// Sum of split impurity decreases per feature, length `n_features`.
    ///
    /// All zeros when the tree is a single leaf.
    #[must_use]
    pub fn impurity_decreases(&self) -> Vec<f64> {
        let mut totals = vec![0.0f64; self.n_features];
        for node in &self.nodes {
            if let Node::Split { feature, decrease, .. } = node {
                totals[feature.index()] += decrease;
            }
        }
        totals
    }

    /// Return the node arena; the root is at index 0.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the number of classes the tree distinguishes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Return the maximum depth; a lone root leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, d)) = stack.pop() {
            match &self.nodes[idx] {
                Node::Leaf { .. } => max_depth = max_depth.max(d),
                Node::Split { left, right, .. } => {
                    stack.push((left.index(), d + 1));
                    stack.push((right.index(), d + 1));
                }
            }
        }
        max_depth
    }

    /// Descend from the root to the leaf reached by `sample`.
    fn leaf(&self, sample: &[f64]) -> Result<(usize, &[f64]), ForestError> {
        if sample.len() != self.n_features {
            return Err(ForestError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf {
                    prediction,
                    distribution,
                    ..
                } => return Ok((*prediction, distribution.as_slice())),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if sample[feature.index()] <= *threshold {
                        left.index()
                    } else {
                        right.index()
                    };
                }
            }
        }
    }
}
