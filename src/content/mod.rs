// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Content acquisition: fetch, classify, extract
//!
//! ## Architecture
//!
//! ```text
//! URL → ContentFetcher → ContentFormat::classify ─┬─ HTML  → html extractor
//!                                                 ├─ PDF   → text layer ─(blank)→ rasterize + OCR
//!                                                 ├─ IMAGE → decode + OCR
//!                                                 └─ UNKNOWN → empty
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let extractors = TextExtractors::with_system_tools(OcrConfig::from_env());
//! let fetcher = ContentFetcher::new(FetchConfig::from_env(), extractors)?;
//! let text = fetcher.fetch_text("https://example.com/paper.pdf").await;
//! ```

pub mod config;
pub mod extract;
pub mod fetcher;
pub mod format;
pub mod ocr;

pub use config::{FetchConfig, OcrConfig};
pub use extract::{normalize_whitespace, Body, TextExtractors};
pub use fetcher::{ContentFetcher, ContentSource, ExtractedContent};
pub use format::ContentFormat;
pub use ocr::{OcrEngine, OcrError, PageRasterizer, PopplerRasterizer, TesseractOcr};
