// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text extraction strategies, one per [`ContentFormat`]
//!
//! Extractors never fail: malformed input yields an empty string and a
//! diagnostic.

pub mod html;
pub mod image;
pub mod pdf;

use std::sync::Arc;
use tracing::warn;

use super::config::OcrConfig;
use super::ocr::{OcrEngine, PageRasterizer, PopplerRasterizer, TesseractOcr};
use super::ContentFormat;

pub use self::html::extract_html_text;
pub use self::image::{decode_image_bytes, extract_image_text, ImageError};
pub use self::pdf::{extract_pdf, extract_pdf_ocr, extract_pdf_text_layer};

/// Collapse every whitespace run to a single space and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Response body as handed to an extractor
#[derive(Debug, Clone)]
pub enum Body {
    /// Charset-decoded text (HTML)
    Text(String),
    /// Raw bytes (PDF, images)
    Bytes(Vec<u8>),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The set of extraction strategies with their OCR backends
///
/// Construction wires the OCR toolchain once; `extract` is the per-call path.
#[derive(Clone)]
pub struct TextExtractors {
    ocr: Arc<dyn OcrEngine>,
    rasterizer: Arc<dyn PageRasterizer>,
    config: OcrConfig,
}

impl std::fmt::Debug for TextExtractors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextExtractors")
            .field("ocr", &self.ocr.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TextExtractors {
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        rasterizer: Arc<dyn PageRasterizer>,
        config: OcrConfig,
    ) -> Self {
        Self {
            ocr,
            rasterizer,
            config,
        }
    }

    /// Tesseract + poppler backends configured from `config`
    pub fn with_system_tools(config: OcrConfig) -> Self {
        Self::new(
            Arc::new(TesseractOcr::from_config(&config)),
            Arc::new(PopplerRasterizer::from_config(&config)),
            config,
        )
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Run the extraction strategy for `format` over `body`
    ///
    /// CPU-heavy for PDF and images; call from a blocking context.
    pub fn extract(&self, format: ContentFormat, body: &Body) -> String {
        match format {
            ContentFormat::Html => match body {
                Body::Text(text) => extract_html_text(text),
                Body::Bytes(bytes) => extract_html_text(&String::from_utf8_lossy(bytes)),
            },
            ContentFormat::Pdf => extract_pdf(
                body.as_bytes(),
                self.rasterizer.as_ref(),
                self.ocr.as_ref(),
                &self.config,
            ),
            ContentFormat::Image => extract_image_text(body.as_bytes(), self.ocr.as_ref()),
            ContentFormat::Unknown => {
                warn!("No extraction strategy for unknown content");
                String::new()
            }
        }
    }
}
