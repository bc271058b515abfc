// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Acquisition pipeline
//!
//! ```text
//! SearchHit ─▶ CrawlPolicy ─(allowed)─▶ ContentSource ─(text)─▶ RelevanceScorer ─▶ ResultRecord
//!                  │                         │                        │
//!              Disallowed               EmptyContent            ScoringFailed
//! ```

pub mod acquisition;
pub mod config;
pub mod courtesy;
pub mod output;
pub mod record;

pub use acquisition::AcquisitionPipeline;
pub use config::PipelineConfig;
pub use courtesy::{CourtesyPermit, DomainCourtesy};
pub use output::{read_results, write_results, DEFAULT_OUTPUT_FILE};
pub use record::{PipelineReport, ResultRecord, SkipReason, SkippedHit};
