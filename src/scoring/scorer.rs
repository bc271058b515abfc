// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Relevance scoring over a zero-shot classifier

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

use super::classifier::ZeroShotClassifier;
use super::labels::LabelPair;
use crate::errors::AcquisitionError;

/// Projects the classifier's distribution onto the primary label
///
/// Classifier access is limited to `max_concurrent` in-flight calls.
#[derive(Clone)]
pub struct RelevanceScorer {
    classifier: Arc<dyn ZeroShotClassifier>,
    permits: Arc<Semaphore>,
}

impl RelevanceScorer {
    pub fn new(classifier: Arc<dyn ZeroShotClassifier>, max_concurrent: usize) -> Self {
        Self {
            classifier,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Probability in `[0, 1]` that `text` matches `labels.primary()`
    ///
    /// Blank text scores 0.0 without invoking the classifier.
    pub async fn score(&self, text: &str, labels: &LabelPair) -> Result<f64, AcquisitionError> {
        if text.trim().is_empty() {
            return Ok(0.0);
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AcquisitionError::Inference(format!("scorer closed: {}", e)))?;

        let classifier = Arc::clone(&self.classifier);
        let text = text.to_string();
        let candidates = labels.labels().to_vec();
        let scores = tokio::task::spawn_blocking(move || classifier.classify(&text, &candidates))
            .await
            .map_err(|e| AcquisitionError::Inference(format!("inference task failed: {}", e)))??;

        let probability = scores.score_for(labels.primary()).ok_or_else(|| {
            AcquisitionError::Inference(format!(
                "classifier returned no score for \"{}\"",
                labels.primary()
            ))
        })?;
        if probability.is_nan() {
            return Err(AcquisitionError::Inference(
                "classifier returned NaN".to_string(),
            ));
        }

        let score = f64::from(probability).clamp(0.0, 1.0);
        debug!("Relevance for \"{}\": {:.4}", labels.primary(), score);
        Ok(score)
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }
}
