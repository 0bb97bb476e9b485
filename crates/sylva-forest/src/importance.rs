//! Mean decrease in impurity, aggregated across trees.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::forest::RandomForest;

/// Per-feature impurity importance of one fitted forest, in feature order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportanceRecord {
    entries: Vec<(String, f64)>,
}

impl ImportanceRecord {
    /// Build a record from parallel name and score slices.
    ///
    /// Extra entries on either side are ignored.
    #[must_use]
    pub fn new(names: &[String], scores: &[f64]) -> Self {
        Self {
            entries: names.iter().cloned().zip(scores.iter().copied()).collect(),
        }
    }

    /// Look up a feature's score by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, score)` pairs in feature order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Return the feature with the highest score; ties keep the earliest feature.
    #[must_use]
    pub fn top(&self) -> Option<(&str, f64)> {
        self.iter()
            .fold(None, |best: Option<(&str, f64)>, (name, v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((name, v)),
            })
    }
}

// Serialised as a JSON object keyed by feature name, keys in feature order.
impl Serialize for ImportanceRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl RandomForest {
    /// Mean decrease in impurity per feature.
    ///
    /// Each tree contributes the sum of count-weighted decreases of its
    /// splits on a feature; the forest score is the mean over trees. Scores
    /// are not normalised.
    #[must_use]
    pub fn importance(&self) -> ImportanceRecord {
        let mut totals = vec![0.0f64; self.n_features];
        for tree in &self.trees {
            for (slot, d) in totals.iter_mut().zip(tree.impurity_decreases()) {
                *slot += d;
            }
        }
        let n = self.trees.len().max(1) as f64;
        totals.iter_mut().for_each(|v| *v /= n);
        ImportanceRecord::new(&self.feature_names, &totals)
    }
}

#[cfg(test)]
mod tests {
    use super::ImportanceRecord;
    use crate::config::ForestConfig;

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn lookup_and_order() {
        let record = ImportanceRecord::new(&names(&["b", "a"]), &[1.5, 0.5]);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(0.5));
        assert_eq!(record.get("zzz"), None);
        let order: Vec<&str> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn top_prefers_earliest_on_tie() {
        let record = ImportanceRecord::new(&names(&["x", "y", "z"]), &[1.0, 2.0, 2.0]);
        assert_eq!(record.top(), Some(("y", 2.0)));
        assert_eq!(ImportanceRecord::default().top(), None);
    }

    #[test]
    fn informative_feature_dominates() {
        let features: Vec<Vec<f64>> = (0..30)
            .map(|i| vec![i as f64, ((i * 7) % 5) as f64])
            .collect();
        let labels: Vec<usize> = (0..30).map(|i| usize::from(i >= 15)).collect();
        let forest = ForestConfig::new(20)
            .unwrap()
            .with_mtry(Some(2))
            .with_seed(Some(5))
            .fit(&features, &labels, &names(&["signal", "noise"]))
            .unwrap();
        let record = forest.importance();
        assert_eq!(record.len(), 2);
        assert_eq!(record.top().map(|(n, _)| n), Some("signal"));
        assert!(record.iter().all(|(_, v)| v >= 0.0));
    }
}
