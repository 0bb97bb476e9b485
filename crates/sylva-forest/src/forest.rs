//! Forest training with parallel tree construction.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, instrument};

use crate::config::ForestConfig;
use crate::error::ForestError;
use crate::tree::{DecisionTree, DecisionTreeConfig, validate_rows};

/// A fitted random forest classifier.
#[derive(Debug, Clone)]
pub struct RandomForest {
    pub(crate) trees: Vec<DecisionTree>,
    pub(crate) n_features: usize,
    pub(crate) n_classes: usize,
    pub(crate) mtry: usize,
    pub(crate) feature_names: Vec<String>,
}

/// Draw `n_samples` indices with replacement.
fn bootstrap_sample(n_samples: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
}

#[instrument(skip_all, fields(n_tree = config.n_tree, n_samples = features.len()))]
pub(crate) fn train(
    config: &ForestConfig,
    features: &[Vec<f64>],
    labels: &[usize],
    feature_names: &[String],
) -> Result<RandomForest, ForestError> {
    let n_features = validate_rows(features, labels)?;
    if feature_names.len() != n_features {
        return Err(ForestError::FeatureNameCountMismatch {
            names: feature_names.len(),
            n_features,
        });
    }
    let mtry = config.resolve_mtry(n_features)?;

    let tree_config = DecisionTreeConfig::new()
        .with_criterion(config.criterion)
        .with_max_depth(config.max_depth)
        .with_min_samples_split(config.min_samples_split)
        .with_min_samples_leaf(config.min_samples_leaf)
        .with_mtry(Some(mtry));
    tree_config.validate(n_features)?;

    let n_samples = features.len();
    let n_classes = labels.iter().max().copied().unwrap_or(0) + 1;
    let columns: Vec<Vec<f64>> = (0..n_features)
        .map(|f| features.iter().map(|row| row[f]).collect())
        .collect();

    let master_seed = config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
    let mut master_rng = ChaCha8Rng::seed_from_u64(master_seed);
    let tree_seeds: Vec<u64> = (0..config.n_tree).map(|_| master_rng.r#gen()).collect();

    debug!(
        n_samples,
        n_features,
        n_classes,
        mtry,
        seeded = config.seed.is_some(),
        "growing trees"
    );

    // collect() on an indexed parallel iterator keeps seed order.
    let trees: Vec<DecisionTree> = tree_seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let in_bag = bootstrap_sample(n_samples, &mut rng);
            tree_config
                .clone()
                .with_seed(rng.r#gen())
                .grow(&columns, labels, &in_bag, n_classes)
        })
        .collect();

    debug!(n_trees = trees.len(), "forest grown");

    Ok(RandomForest {
        trees,
        n_features,
        n_classes,
        mtry,
        feature_names: feature_names.to_vec(),
    })
}
