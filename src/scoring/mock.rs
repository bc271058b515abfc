// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Deterministic classifier for tests and offline runs

use std::sync::atomic::{AtomicUsize, Ordering};

use super::classifier::{LabelScores, ZeroShotClassifier};
use crate::errors::AcquisitionError;

/// Assigns a fixed probability to the first label and splits the remainder
/// evenly over the others
#[derive(Debug)]
pub struct MockClassifier {
    primary_probability: f32,
    fail: bool,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn new(primary_probability: f32) -> Self {
        Self {
            primary_probability,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// A classifier whose every invocation fails
    pub fn failing() -> Self {
        Self {
            primary_probability: 0.0,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `classify` invocations so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new(0.75)
    }
}

impl ZeroShotClassifier for MockClassifier {
    fn classify(&self, _text: &str, labels: &[String]) -> Result<LabelScores, AcquisitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AcquisitionError::Inference("mock inference failure".to_string()));
        }
        if labels.is_empty() {
            return Err(AcquisitionError::Inference("no labels to score".to_string()));
        }

        let rest = if labels.len() > 1 {
            (1.0 - self.primary_probability) / (labels.len() - 1) as f32
        } else {
            0.0
        };
        let scores = (0..labels.len())
            .map(|i| if i == 0 { self.primary_probability } else { rest })
            .collect();

        Ok(LabelScores {
            labels: labels.to_vec(),
            scores,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
