// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Binary label pairs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::AcquisitionError;

/// Two candidate labels; relevance is the probability of `primary`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPair {
    primary: String,
    alternative: String,
}

impl LabelPair {
    /// Build from a label list, keeping the first two
    ///
    /// Fewer than two non-blank labels, or two identical ones, is a
    /// configuration error.
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Result<Self, AcquisitionError> {
        let labels: Vec<&str> = labels
            .iter()
            .map(|l| l.as_ref().trim())
            .filter(|l| !l.is_empty())
            .collect();

        if labels.len() < 2 {
            return Err(AcquisitionError::Configuration(format!(
                "at least two labels are required, got {}",
                labels.len()
            )));
        }
        if labels[0] == labels[1] {
            return Err(AcquisitionError::Configuration(format!(
                "labels must be distinct, got \"{}\" twice",
                labels[0]
            )));
        }

        Ok(Self {
            primary: labels[0].to_string(),
            alternative: labels[1].to_string(),
        })
    }

    /// Parse user input: comma-separated when a comma is present, otherwise
    /// whitespace-separated (`"Bullish Bearish"`)
    pub fn parse(input: &str) -> Result<Self, AcquisitionError> {
        if input.contains(',') {
            Self::new(&input.split(',').collect::<Vec<_>>())
        } else {
            Self::new(&input.split_whitespace().collect::<Vec<_>>())
        }
    }

    /// The label whose probability is reported as relevance
    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn alternative(&self) -> &str {
        &self.alternative
    }

    /// Both labels in order, as handed to the classifier
    pub fn labels(&self) -> [String; 2] {
        [self.primary.clone(), self.alternative.clone()]
    }
}

impl fmt::Display for LabelPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.primary, self.alternative)
    }
}
