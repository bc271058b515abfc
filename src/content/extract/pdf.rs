// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PDF text extraction
//!
//! Two stages, cheapest first:
//! 1. Text layer via `pdf-extract` (exact, fast)
//! 2. OCR over rasterized pages, only when the text layer is blank

use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, info, warn};

use super::normalize_whitespace;
use crate::content::config::OcrConfig;
use crate::content::ocr::{OcrEngine, PageRasterizer};
use crate::content::ContentFormat;
use crate::errors::AcquisitionError;

/// Extract the embedded text layer of a PDF, pages in document order
///
/// Returns the parse failure so callers can log it; `extract_pdf_text_layer`
/// is the non-failing variant.
pub fn try_extract_pdf_text_layer(bytes: &[u8]) -> Result<String, AcquisitionError> {
    // pdf-extract panics on some malformed inputs
    let extracted = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| AcquisitionError::parse(ContentFormat::Pdf, "PDF parser panicked"))?;

    let text = extracted.map_err(|e| AcquisitionError::parse(ContentFormat::Pdf, e))?;
    Ok(normalize_whitespace(&text))
}

/// Extract the embedded text layer, or empty on any parse failure
pub fn extract_pdf_text_layer(bytes: &[u8]) -> String {
    match try_extract_pdf_text_layer(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("PDF text layer extraction failed: {}", e);
            String::new()
        }
    }
}

/// Rasterize every page and OCR it
///
/// Pages whose OCR fails or yields nothing are skipped individually.
pub fn extract_pdf_ocr(
    bytes: &[u8],
    rasterizer: &dyn PageRasterizer,
    ocr: &dyn OcrEngine,
    config: &OcrConfig,
) -> String {
    let pages = match rasterizer.rasterize(bytes, config.dpi, config.max_pages) {
        Ok(pages) => pages,
        Err(e) => {
            warn!("PDF rasterization failed: {}", e);
            return String::new();
        }
    };

    let mut texts = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        match ocr.recognize(page) {
            Ok(text) => {
                let text = normalize_whitespace(&text);
                if !text.is_empty() {
                    texts.push(text);
                }
            }
            Err(e) => warn!("OCR failed on page {} ({}): {}", index + 1, ocr.name(), e),
        }
    }

    debug!("OCR recovered text from {}/{} pages", texts.len(), pages.len());
    normalize_whitespace(&texts.join("\n"))
}

/// Text layer first, falling back to OCR when it is empty or whitespace-only
pub fn extract_pdf(
    bytes: &[u8],
    rasterizer: &dyn PageRasterizer,
    ocr: &dyn OcrEngine,
    config: &OcrConfig,
) -> String {
    let text = extract_pdf_text_layer(bytes);
    if !text.trim().is_empty() {
        return text;
    }

    info!("PDF has no text layer, attempting OCR");
    extract_pdf_ocr(bytes, rasterizer, ocr, config)
}
