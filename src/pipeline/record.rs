// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pipeline output types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::search::SearchHit;

/// One surviving hit with its extracted text and relevance
///
/// Only built for non-empty `full_text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub full_text: String,
    pub relevance_score: f64,
}

impl ResultRecord {
    pub fn from_hit(hit: SearchHit, full_text: String, relevance_score: f64) -> Self {
        Self {
            title: hit.title,
            link: hit.url,
            snippet: hit.snippet,
            full_text,
            relevance_score,
        }
    }
}

/// Why a hit produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The domain's crawl policy denies the URL
    Disallowed,
    /// Fetching or extraction yielded no text
    EmptyContent,
    /// The classifier failed for this text
    ScoringFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedHit {
    pub url: String,
    pub reason: SkipReason,
}

/// Records in input order plus a diagnostic for every dropped hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub records: Vec<ResultRecord>,
    pub skipped: Vec<SkippedHit>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineReport {
    pub fn total_hits(&self) -> usize {
        self.records.len() + self.skipped.len()
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
