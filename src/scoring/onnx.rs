// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX NLI zero-shot classifier
//!
//! Runs an MNLI cross-encoder (bart-large-mnli by default) through ONNX
//! Runtime. Each label becomes a hypothesis ("This example is {label}.")
//! paired with the text as premise; the entailment logits of all pairs are
//! soft-maxed across labels, giving a distribution that sums to 1.
//!
//! Loading the model is the expensive step and happens once, at
//! construction. Inference holds the session lock for one pair at a time.

use anyhow::{Context, Result};
use ndarray::Array2;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams, TruncationStrategy};
use tracing::{debug, info};

use super::classifier::{softmax, LabelScores, ZeroShotClassifier};
use super::config::ScoringConfig;
use crate::errors::AcquisitionError;

/// Zero-shot classifier over an ONNX NLI model
#[derive(Clone)]
pub struct OnnxZeroShotClassifier {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    config: ScoringConfig,
    uses_token_type_ids: bool,
}

impl std::fmt::Debug for OnnxZeroShotClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxZeroShotClassifier")
            .field("model_name", &self.model_name)
            .field("hypothesis_template", &self.config.hypothesis_template)
            .field("entailment_index", &self.config.entailment_index)
            .finish_non_exhaustive()
    }
}

impl OnnxZeroShotClassifier {
    /// Load from local model and tokenizer files
    ///
    /// # Errors
    /// Missing files, an invalid model, or a tokenizer that cannot be
    /// configured for pair truncation.
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        tokenizer_path: P,
        config: &ScoringConfig,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }
        config.validate().map_err(|e| anyhow::anyhow!(e))?;

        info!("Loading NLI model from {}", model_path.display());
        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load ONNX model from {}",
                model_path.display()
            ))?;

        let uses_token_type_ids = session
            .inputs
            .iter()
            .any(|input| input.name == "token_type_ids");

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_tokens,
                strategy: TruncationStrategy::OnlyFirst,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;
        tokenizer.with_padding(None);

        let model_name = model_path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "nli".to_string());

        info!("NLI model ready: {}", model_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            config: config.clone(),
            uses_token_type_ids,
        })
    }

    /// Load from configured paths, downloading from the Hub when none are set
    ///
    /// Blocking: downloads and model initialization happen inline.
    pub fn from_config(config: &ScoringConfig) -> Result<Self> {
        match (&config.model_path, &config.tokenizer_path) {
            (Some(model), Some(tokenizer)) => Self::new(model, tokenizer, config),
            _ => {
                let (model, tokenizer) = download_model(&config.model_repo)?;
                Self::new(&model, &tokenizer, config)
            }
        }
    }

    /// [`from_config`](Self::from_config) on the blocking thread pool
    pub async fn load(config: ScoringConfig) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::from_config(&config))
            .await
            .context("Model loading task failed")?
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Entailment logit for one premise/hypothesis pair
    fn entailment_logit(&self, premise: &str, hypothesis: &str) -> Result<f32> {
        let encoding = self
            .tokenizer
            .encode((premise, hypothesis), true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let len = encoding.get_ids().len();
        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        let input_ids_array = Array2::from_shape_vec((1, len), input_ids)
            .context("Failed to create input_ids array")?;
        let attention_mask_array = Array2::from_shape_vec((1, len), attention_mask)
            .context("Failed to create attention_mask array")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("NLI session lock poisoned"))?;

        let outputs = if self.uses_token_type_ids {
            let type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&t| t as i64).collect();
            let token_type_ids_array = Array2::from_shape_vec((1, len), type_ids)
                .context("Failed to create token_type_ids array")?;
            session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids_array)?,
                "attention_mask" => Value::from_array(attention_mask_array)?,
                "token_type_ids" => Value::from_array(token_type_ids_array)?
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids_array)?,
                "attention_mask" => Value::from_array(attention_mask_array)?
            ])?
        };

        // logits: [1, num_nli_classes]
        let logits = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract logits")?;
        let row: Vec<f32> = logits.iter().copied().collect();

        row.get(self.config.entailment_index).copied().ok_or_else(|| {
            anyhow::anyhow!(
                "Entailment index {} out of range for {} logits",
                self.config.entailment_index,
                row.len()
            )
        })
    }
}

impl ZeroShotClassifier for OnnxZeroShotClassifier {
    fn classify(&self, text: &str, labels: &[String]) -> Result<LabelScores, AcquisitionError> {
        if labels.is_empty() {
            return Err(AcquisitionError::Inference("no labels to score".to_string()));
        }

        let logits = labels
            .iter()
            .map(|label| self.entailment_logit(text, &self.config.hypothesis(label)))
            .collect::<Result<Vec<f32>>>()
            .map_err(|e| AcquisitionError::Inference(format!("{:#}", e)))?;

        let scores = softmax(&logits);
        debug!("Zero-shot logits {:?} -> {:?}", logits, scores);

        Ok(LabelScores {
            labels: labels.to_vec(),
            scores,
        })
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// Fetch `onnx/model.onnx` and `tokenizer.json` into the local Hub cache
fn download_model(repo_id: &str) -> Result<(PathBuf, PathBuf)> {
    use hf_hub::api::sync::Api;

    info!("Resolving NLI model from Hugging Face Hub: {}", repo_id);
    let api = Api::new().context("Failed to initialize Hugging Face API")?;
    let repo = api.model(repo_id.to_string());

    let model = repo
        .get("onnx/model.onnx")
        .or_else(|_| repo.get("model.onnx"))
        .with_context(|| format!("Failed to download model.onnx from {}", repo_id))?;
    let tokenizer = repo
        .get("tokenizer.json")
        .with_context(|| format!("Failed to download tokenizer.json from {}", repo_id))?;

    Ok((model, tokenizer))
}
