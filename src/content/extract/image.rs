// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image decoding and OCR extraction

use image::{DynamicImage, ImageFormat};
use thiserror::Error;
use tracing::warn;

use super::normalize_whitespace;
use crate::content::ocr::OcrEngine;

/// Maximum image size accepted for OCR (20MB)
const MAX_IMAGE_SIZE: usize = 20 * 1024 * 1024;

/// Errors decoding fetched image bytes
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,
}

/// Decode raw image bytes
///
/// The format is sniffed from magic bytes first; unrecognised signatures are
/// left to the image crate's own guesser.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    let decoded = match detect_format(bytes) {
        Some(format) => image::load_from_memory_with_format(bytes, format),
        None => image::load_from_memory(bytes),
    };
    decoded.map_err(|e| ImageError::DecodeFailed(e.to_string()))
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    match bytes {
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(ImageFormat::Png),
        [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some(ImageFormat::WebP),
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Some(ImageFormat::Gif),
        [0x42, 0x4D, ..] => Some(ImageFormat::Bmp),
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Some(ImageFormat::Tiff),
        _ => None,
    }
}

/// Decode an image and run OCR over it
///
/// Returns normalized text, or empty on decode or OCR failure.
pub fn extract_image_text(bytes: &[u8], ocr: &dyn OcrEngine) -> String {
    let image = match decode_image_bytes(bytes) {
        Ok(image) => image,
        Err(e) => {
            warn!("Image decode failed: {}", e);
            return String::new();
        }
    };

    match ocr.recognize(&image) {
        Ok(text) => normalize_whitespace(&text),
        Err(e) => {
            warn!("Image OCR failed ({}): {}", ocr.name(), e);
            String::new()
        }
    }
}
