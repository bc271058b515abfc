// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Acquisition pipeline: gate → fetch + extract → score → record
//!
//! Gate and fetch run for up to `concurrency` hits at once; results are
//! consumed in input order and scored one at a time, so the output is a
//! stable filter of the input.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::sync::Arc;
use tracing::{info, warn};

use super::config::PipelineConfig;
use super::courtesy::DomainCourtesy;
use super::record::{PipelineReport, ResultRecord, SkipReason, SkippedHit};
use crate::content::ContentSource;
use crate::crawl::CrawlPolicy;
use crate::errors::AcquisitionError;
use crate::scoring::{LabelPair, RelevanceScorer};
use crate::search::SearchHit;

/// Outcome of gating and fetching one hit
enum Acquired {
    Text(SearchHit, String),
    Skipped(SkippedHit),
}

impl Acquired {
    fn skipped(hit: &SearchHit, reason: SkipReason) -> Self {
        Self::Skipped(SkippedHit {
            url: hit.url.clone(),
            reason,
        })
    }
}

pub struct AcquisitionPipeline {
    policy: Arc<dyn CrawlPolicy>,
    source: Arc<dyn ContentSource>,
    scorer: RelevanceScorer,
    courtesy: DomainCourtesy,
    config: PipelineConfig,
    progress: Option<ProgressBar>,
}

impl AcquisitionPipeline {
    pub fn new(
        policy: Arc<dyn CrawlPolicy>,
        source: Arc<dyn ContentSource>,
        scorer: RelevanceScorer,
        config: PipelineConfig,
    ) -> Result<Self, AcquisitionError> {
        config.validate().map_err(AcquisitionError::Configuration)?;
        Ok(Self {
            policy,
            source,
            scorer,
            courtesy: DomainCourtesy::new(config.domain_rate_per_minute),
            config,
            progress: None,
        })
    }

    /// Advance `progress` once per processed hit
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Records for every hit that is allowed, yields text and scores
    pub async fn run(&self, hits: &[SearchHit], labels: &LabelPair) -> Vec<ResultRecord> {
        self.run_with_report(hits, labels).await.records
    }

    /// Like [`run`](Self::run), also reporting why each dropped hit was dropped
    pub async fn run_with_report(&self, hits: &[SearchHit], labels: &LabelPair) -> PipelineReport {
        let started_at = Utc::now();
        info!(
            "Processing {} hits against {} (concurrency {})",
            hits.len(),
            labels,
            self.config.concurrency
        );

        let mut records = Vec::new();
        let mut skipped = Vec::new();

        let mut acquisitions = stream::iter(hits.iter().cloned())
            .map(|hit| self.acquire(hit))
            .buffered(self.config.concurrency);

        while let Some(acquired) = acquisitions.next().await {
            match acquired {
                Acquired::Text(hit, text) => match self.scorer.score(&text, labels).await {
                    Ok(score) => {
                        info!("Scored {:.4}: {}", score, hit.url);
                        records.push(ResultRecord::from_hit(hit, text, score));
                    }
                    Err(e) => {
                        warn!("Skipping {}: scoring failed: {}", hit.url, e);
                        skipped.push(SkippedHit {
                            url: hit.url,
                            reason: SkipReason::ScoringFailed,
                        });
                    }
                },
                Acquired::Skipped(skip) => skipped.push(skip),
            }
            if let Some(progress) = &self.progress {
                progress.inc(1);
            }
        }

        info!(
            "Pipeline finished: {} records, {} skipped",
            records.len(),
            skipped.len()
        );

        PipelineReport {
            records,
            skipped,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn acquire(&self, hit: SearchHit) -> Acquired {
        if !self.policy.is_allowed(&hit.url).await {
            info!("Skipping {}: disallowed by crawl policy", hit.url);
            return Acquired::skipped(&hit, SkipReason::Disallowed);
        }

        let content = {
            let _permit = self.courtesy.acquire(&hit.url).await;
            self.source.fetch(&hit.url, self.config.fetch_timeout()).await
        };

        if content.is_empty() {
            info!("Skipping {}: no content extracted", hit.url);
            return Acquired::skipped(&hit, SkipReason::EmptyContent);
        }
        Acquired::Text(hit, content.text)
    }
}
