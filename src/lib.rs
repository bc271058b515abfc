// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod content;
pub mod crawl;
pub mod errors;
pub mod pipeline;
pub mod scoring;
pub mod search;

// Re-export main types
pub use content::{ContentFetcher, ContentFormat, ContentSource, ExtractedContent, TextExtractors};
pub use crawl::{AllowAll, CrawlPermissionGate, CrawlPolicy};
pub use errors::{AcquisitionError, Result};
pub use pipeline::{AcquisitionPipeline, PipelineReport, ResultRecord};
pub use scoring::{LabelPair, RelevanceScorer, ZeroShotClassifier};
pub use search::{SearchHit, SearchProvider};
