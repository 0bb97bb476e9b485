//! Binary confusion counts with `positive` as the reference class.

use std::fmt;

use crate::label::Label;

/// TP/TN/FP/FN over one test set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionCounts {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
}

impl ConfusionCounts {
    /// Tally paired truth and prediction labels.
    ///
    /// Only the common prefix is counted if the slices differ in length.
    #[must_use]
    pub fn tally(truth: &[Label], predicted: &[Label]) -> Self {
        debug_assert_eq!(truth.len(), predicted.len());
        let mut counts = Self::default();
        for (&t, &p) in truth.iter().zip(predicted) {
            match (t, p) {
                (Label::Positive, Label::Positive) => counts.tp += 1,
                (Label::Negative, Label::Negative) => counts.tn += 1,
                (Label::Negative, Label::Positive) => counts.fp += 1,
                (Label::Positive, Label::Negative) => counts.fn_ += 1,
            }
        }
        counts
    }

    /// Number of evaluated samples.
    #[must_use]
    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// Number of misclassified samples.
    #[must_use]
    pub fn mismatches(&self) -> usize {
        self.fp + self.fn_
    }
}

impl fmt::Display for ConfusionCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>10} {:>9} {:>9}", "", "positive", "negative")?;
        writeln!(f, "{:>10} {:>9} {:>9}", "positive", self.tp, self.fp)?;
        write!(f, "{:>10} {:>9} {:>9}", "negative", self.fn_, self.tn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Label::{Negative as N, Positive as P};

    #[test]
    fn every_cell_counted() {
        let truth = [P, P, P, N, N, N, N];
        let predicted = [P, P, N, N, N, P, N];
        let counts = ConfusionCounts::tally(&truth, &predicted);
        assert_eq!(
            counts,
            ConfusionCounts { tp: 2, tn: 3, fp: 1, fn_: 1 }
        );
        assert_eq!(counts.total(), 7);
        assert_eq!(counts.mismatches(), 2);
    }

    #[test]
    fn missing_cells_are_zero() {
        let counts = ConfusionCounts::tally(&[N, N], &[N, N]);
        assert_eq!(counts, ConfusionCounts { tp: 0, tn: 2, fp: 0, fn_: 0 });
    }

    #[test]
    fn empty_test_set() {
        assert_eq!(ConfusionCounts::tally(&[], &[]).total(), 0);
    }

    #[test]
    fn display_has_prediction_rows() {
        let text = ConfusionCounts { tp: 4, tn: 3, fp: 2, fn_: 1 }.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].trim_start().starts_with("positive"));
        assert!(lines[1].ends_with('2'));
        assert!(lines[2].ends_with('3'));
    }
}
