// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for relevance scoring

use std::env;
use std::path::PathBuf;

/// Hugging Face repository used when no local model is configured
pub const DEFAULT_MODEL_REPO: &str = "Xenova/bart-large-mnli";

/// Configuration for the zero-shot classifier and scorer
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Local ONNX model file; downloaded from `model_repo` when unset
    pub model_path: Option<PathBuf>,
    /// Local tokenizer.json; downloaded from `model_repo` when unset
    pub tokenizer_path: Option<PathBuf>,
    /// Hugging Face repository with `onnx/model.onnx` and `tokenizer.json`
    pub model_repo: String,
    /// Hypothesis built per label; `{}` is replaced by the label
    pub hypothesis_template: String,
    /// Index of the entailment logit in the NLI head output
    pub entailment_index: usize,
    /// Token budget per premise/hypothesis pair (premise is truncated)
    pub max_tokens: usize,
    /// Concurrent classifier invocations (default: 1)
    pub max_concurrent: usize,
}

impl ScoringConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model_path: env::var("NLI_MODEL_PATH").ok().map(PathBuf::from),
            tokenizer_path: env::var("NLI_TOKENIZER_PATH").ok().map(PathBuf::from),
            model_repo: env::var("NLI_MODEL_REPO").unwrap_or(defaults.model_repo),
            hypothesis_template: env::var("NLI_HYPOTHESIS_TEMPLATE")
                .unwrap_or(defaults.hypothesis_template),
            entailment_index: env::var("NLI_ENTAILMENT_INDEX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.entailment_index),
            max_tokens: env::var("NLI_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
            max_concurrent: env::var("SCORING_MAX_CONCURRENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_concurrent),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !self.hypothesis_template.contains("{}") {
            return Err("hypothesis_template must contain a {} placeholder".to_string());
        }
        if self.max_tokens < 16 {
            return Err("max_tokens must be at least 16".to_string());
        }
        if self.max_concurrent == 0 {
            return Err("max_concurrent must be at least 1".to_string());
        }
        if self.model_path.is_some() != self.tokenizer_path.is_some() {
            return Err("model_path and tokenizer_path must be set together".to_string());
        }
        Ok(())
    }

    pub fn hypothesis(&self, label: &str) -> String {
        self.hypothesis_template.replace("{}", label)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            tokenizer_path: None,
            model_repo: DEFAULT_MODEL_REPO.to_string(),
            hypothesis_template: "This example is {}.".to_string(),
            entailment_index: 2,
            max_tokens: 1024,
            max_concurrent: 1,
        }
    }
}
