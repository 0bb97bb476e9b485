//! Training selector and the fixed train/test partition it resolves to.

use std::collections::HashSet;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::CvError;

/// Which samples form the training set.
#[derive(Debug, Clone)]
pub enum TrainId {
    /// Every sample whose name contains a match of the pattern.
    Pattern(Regex),
    /// One flag per sample; `true` selects it for training.
    Mask(Vec<bool>),
    /// Samples whose name appears in the list.
    Names(Vec<String>),
}

impl TrainId {
    /// Compile a name pattern.
    ///
    /// # Errors
    ///
    /// Returns [`CvError::InvalidPattern`] when `pattern` is not a valid regex.
    pub fn pattern(pattern: &str) -> Result<Self, CvError> {
        Regex::new(pattern)
            .map(TrainId::Pattern)
            .map_err(|source| CvError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }
}

/// Disjoint train/test sample indices covering every sample, each ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    train: Vec<usize>,
    test: Vec<usize>,
}

impl Split {
    /// Resolve `train_id` against the table's sample names.
    ///
    /// The test set is the complement of the training set. A training set of
    /// exactly one sample is allowed but logged as a warning.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`CvError::MaskLengthMismatch`] | mask length differs from the sample count |
    /// | [`CvError::NoTrainingSamples`] | nothing was selected |
    pub fn resolve(sample_names: &[String], train_id: &TrainId) -> Result<Self, CvError> {
        let selected: Vec<bool> = match train_id {
            TrainId::Pattern(re) => sample_names.iter().map(|n| re.is_match(n)).collect(),
            TrainId::Mask(mask) => {
                if mask.len() != sample_names.len() {
                    return Err(CvError::MaskLengthMismatch {
                        mask: mask.len(),
                        samples: sample_names.len(),
                    });
                }
                mask.clone()
            }
            TrainId::Names(names) => {
                let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
                let known: HashSet<&str> = sample_names.iter().map(String::as_str).collect();
                let unknown = wanted.difference(&known).count();
                if unknown > 0 {
                    debug!(unknown, "train names not found among samples");
                }
                sample_names
                    .iter()
                    .map(|n| wanted.contains(n.as_str()))
                    .collect()
            }
        };

        let (train, test): (Vec<usize>, Vec<usize>) =
            (0..sample_names.len()).partition(|&i| selected[i]);

        match train.len() {
            0 => return Err(CvError::NoTrainingSamples),
            1 => warn!(sample = %sample_names[train[0]], "training set has only one sample"),
            _ => {}
        }
        debug!(n_train = train.len(), n_test = test.len(), "split resolved");

        Ok(Self { train, test })
    }

    #[must_use]
    pub fn train(&self) -> &[usize] {
        &self.train
    }

    #[must_use]
    pub fn test(&self) -> &[usize] {
        &self.test
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<String> {
        ["ctrl_1", "ctrl_2", "case_1", "case_2", "case_3"]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }

    #[test]
    fn pattern_matches_substring() {
        let split = Split::resolve(&samples(), &TrainId::pattern("case").unwrap()).unwrap();
        assert_eq!(split.train(), &[2, 3, 4]);
        assert_eq!(split.test(), &[0, 1]);
    }

    #[test]
    fn anchored_pattern() {
        let split = Split::resolve(&samples(), &TrainId::pattern("_[12]$").unwrap()).unwrap();
        assert_eq!(split.train(), &[0, 1, 2, 3]);
        assert_eq!(split.test(), &[4]);
    }

    #[test]
    fn mask_selects_true_positions() {
        let mask = TrainId::Mask(vec![true, false, true, false, false]);
        let split = Split::resolve(&samples(), &mask).unwrap();
        assert_eq!(split.train(), &[0, 2]);
        assert_eq!(split.test(), &[1, 3, 4]);
    }

    #[test]
    fn names_select_in_table_order() {
        let names = TrainId::Names(vec!["case_3".into(), "ctrl_1".into(), "missing".into()]);
        let split = Split::resolve(&samples(), &names).unwrap();
        assert_eq!(split.train(), &[0, 4]);
        assert_eq!(split.test(), &[1, 2, 3]);
    }

    #[test]
    fn no_match_is_fatal() {
        let err = Split::resolve(&samples(), &TrainId::pattern("^zzz").unwrap()).unwrap_err();
        assert!(matches!(err, CvError::NoTrainingSamples));
        let err = Split::resolve(&samples(), &TrainId::Mask(vec![false; 5])).unwrap_err();
        assert!(matches!(err, CvError::NoTrainingSamples));
    }

    #[test]
    fn mask_length_checked() {
        let err = Split::resolve(&samples(), &TrainId::Mask(vec![true; 4])).unwrap_err();
        assert!(matches!(err, CvError::MaskLengthMismatch { mask: 4, samples: 5 }));
    }

    #[test]
    fn bad_pattern_rejected() {
        assert!(matches!(
            TrainId::pattern("case_("),
            Err(CvError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn partition_covers_all_samples() {
        let split = Split::resolve(&samples(), &TrainId::pattern("1").unwrap()).unwrap();
        let mut all: Vec<usize> = split.train().iter().chain(split.test()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3, 4]);
    }
}
