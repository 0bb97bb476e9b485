//! Random forest classification: train, predict, rank features.
//!
//! A bootstrapped CART ensemble with Gini/Entropy split criteria, per-node
//! feature subsampling (`mtry`), parallel tree growth via rayon and
//! mean-decrease-in-impurity feature importance.

mod config;
mod error;
mod forest;
mod importance;
mod node;
mod predict;
mod split;
mod tree;

pub use config::ForestConfig;
pub use error::ForestError;
pub use forest::RandomForest;
pub use importance::ImportanceRecord;
pub use node::{FeatureIndex, Impurity, Node, NodeIndex};
pub use predict::ClassDistribution;
pub use split::SplitCriterion;
pub use tree::{DecisionTree, DecisionTreeConfig};
