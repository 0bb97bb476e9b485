use std::fmt;

use serde::Serialize;

use crate::error::CvError;

/// Two-level prediction target. `Positive` is the reference class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    /// Class index handed to the forest: `Positive` is 0, `Negative` is 1.
    #[must_use]
    pub fn class(self) -> usize {
        match self {
            Label::Positive => 0,
            Label::Negative => 1,
        }
    }

    /// Inverse of [`Label::class`]; any non-zero class is `Negative`.
    #[must_use]
    pub fn from_class(class: usize) -> Self {
        if class == 0 {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

impl From<bool> for Label {
    fn from(treated: bool) -> Self {
        if treated {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Positive => f.write_str("positive"),
            Label::Negative => f.write_str("negative"),
        }
    }
}

/// One boolean treatment flag per sample, aligned with the table's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Treatment(Vec<bool>);

impl Treatment {
    #[must_use]
    pub fn new(flags: Vec<bool>) -> Self {
        Self(flags)
    }

    /// Parse raw tokens, accepting only logical literals.
    ///
    /// Accepted: `TRUE`, `FALSE`, `True`, `False`, `true`, `false`, `T`, `F`.
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CvError::NonBooleanTreatment`] for the first token that is
    /// anything else, including numbers and empty cells.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, CvError> {
        tokens
            .iter()
            .enumerate()
            .map(|(index, token)| match token.as_ref().trim() {
                "TRUE" | "True" | "true" | "T" => Ok(true),
                "FALSE" | "False" | "false" | "F" => Ok(false),
                other => Err(CvError::NonBooleanTreatment {
                    index,
                    value: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Label of the sample at `index`.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<Label> {
        self.0.get(index).map(|&t| Label::from(t))
    }

    /// Labels of the samples at `indices`, in that order.
    pub(crate) fn labels_at(&self, indices: &[usize]) -> Vec<Label> {
        indices.iter().map(|&i| Label::from(self.0[i])).collect()
    }
}
