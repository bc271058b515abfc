// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR and PDF rasterization backends
//!
//! Both capabilities are traits so extraction can be exercised without the
//! external toolchain:
//! - [`TesseractOcr`] shells out to the `tesseract` binary
//! - [`PopplerRasterizer`] shells out to `pdftoppm`
//!
//! Calls are blocking; callers run them on the blocking thread pool.

use image::{DynamicImage, ImageFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, warn};

use super::config::OcrConfig;

/// Errors from the OCR toolchain
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR tool not found: {0}")]
    ToolNotFound(String),

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to prepare OCR input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode or decode page image: {0}")]
    Image(#[from] image::ImageError),
}

/// Optical character recognition over a decoded image
pub trait OcrEngine: Send + Sync {
    /// Recognise text in a single image
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;

    /// Engine name for diagnostics
    fn name(&self) -> &'static str;
}

/// Renders PDF pages to raster images
pub trait PageRasterizer: Send + Sync {
    /// Rasterize pages in document order at the given resolution
    ///
    /// Pages that cannot be decoded are omitted; a failure of the whole
    /// document is an error.
    fn rasterize(&self, pdf: &[u8], dpi: u32, max_pages: usize)
        -> Result<Vec<DynamicImage>, OcrError>;
}

/// Tesseract command-line OCR
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(binary: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(&config.tesseract_bin, &config.language)
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let input = tempfile::Builder::new()
            .prefix("harvest-ocr-")
            .suffix(".png")
            .tempfile()?;
        image.save_with_format(input.path(), ImageFormat::Png)?;

        let path = input.path().to_string_lossy().to_string();
        run_tool(&self.binary, &[&path, "stdout", "-l", &self.language])
    }

    fn name(&self) -> &'static str {
        "tesseract"
    }
}

/// Poppler `pdftoppm` rasterizer
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    binary: String,
}

impl PopplerRasterizer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(&config.pdftoppm_bin)
    }
}

impl PageRasterizer for PopplerRasterizer {
    fn rasterize(
        &self,
        pdf: &[u8],
        dpi: u32,
        max_pages: usize,
    ) -> Result<Vec<DynamicImage>, OcrError> {
        let workdir = tempfile::Builder::new().prefix("harvest-pdf-").tempdir()?;
        let pdf_path = workdir.path().join("input.pdf");
        std::fs::File::create(&pdf_path)?.write_all(pdf)?;

        let prefix = workdir.path().join("page");
        run_tool(
            &self.binary,
            &[
                "-r",
                &dpi.to_string(),
                "-l",
                &max_pages.to_string(),
                "-png",
                &pdf_path.to_string_lossy(),
                &prefix.to_string_lossy(),
            ],
        )?;

        let pages = page_images(workdir.path())?;
        debug!("Rasterized {} PDF pages at {} DPI", pages.len(), dpi);

        let mut images = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            match image::open(page) {
                Ok(img) => images.push(img),
                Err(e) => warn!("Skipping undecodable rasterized page {}: {}", index + 1, e),
            }
        }
        Ok(images)
    }
}

/// Rasterized page files, in page order
///
/// `pdftoppm` zero-pads page numbers to a common width, so lexical order is
/// page order.
fn page_images(dir: &Path) -> Result<Vec<PathBuf>, OcrError> {
    let mut pages: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "png")
                && path
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().starts_with("page"))
        })
        .collect();
    pages.sort();
    Ok(pages)
}

fn run_tool(binary: &str, args: &[&str]) -> Result<String, OcrError> {
    let output = Command::new(binary).args(args).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            OcrError::ToolNotFound(binary.to_string())
        } else {
            OcrError::Io(e)
        }
    })?;

    if !output.status.success() {
        return Err(OcrError::ToolFailed {
            tool: binary.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
