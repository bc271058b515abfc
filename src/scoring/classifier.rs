// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Zero-shot classification oracle

use serde::{Deserialize, Serialize};

use crate::errors::AcquisitionError;

/// Probability distribution over candidate labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScores {
    pub labels: Vec<String>,
    pub scores: Vec<f32>,
}

impl LabelScores {
    /// Probability assigned to `label`, if it was scored
    pub fn score_for(&self, label: &str) -> Option<f32> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|i| self.scores.get(i).copied())
    }
}

/// Scores arbitrary text against arbitrary labels
///
/// Blocking; the scorer drives it from the blocking thread pool.
pub trait ZeroShotClassifier: Send + Sync {
    fn classify(&self, text: &str, labels: &[String]) -> Result<LabelScores, AcquisitionError>;

    fn name(&self) -> &str;
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
