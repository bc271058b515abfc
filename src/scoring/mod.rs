// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Relevance scoring
//!
//! A [`RelevanceScorer`] asks a [`ZeroShotClassifier`] for a distribution over
//! a [`LabelPair`] and reports the probability of the primary label.
//! [`OnnxZeroShotClassifier`] is the production oracle; [`MockClassifier`]
//! returns fixed distributions.

pub mod classifier;
pub mod config;
pub mod labels;
pub mod mock;
pub mod onnx;
pub mod scorer;

pub use classifier::{softmax, LabelScores, ZeroShotClassifier};
pub use config::{ScoringConfig, DEFAULT_MODEL_REPO};
pub use labels::LabelPair;
pub use mock::MockClassifier;
pub use onnx::OnnxZeroShotClassifier;
pub use scorer::RelevanceScorer;
