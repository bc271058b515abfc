// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for content fetching and OCR
//!
//! Defines settings for HTTP fetching, body limits, and the OCR toolchain.

use std::env;
use std::time::Duration;

/// Minimum rasterization resolution that keeps OCR usable on scanned pages
pub const MIN_OCR_DPI: u32 = 300;

/// Configuration for content fetching
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    /// User-Agent header sent with every fetch (default: "Mozilla/5.0")
    pub user_agent: String,
    /// Maximum response body size in bytes (default: 50 MiB)
    pub max_body_bytes: usize,
    /// Maximum redirects to follow (default: 10)
    pub max_redirects: usize,
}

impl FetchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            user_agent: env::var("FETCH_USER_AGENT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.user_agent),
            max_body_bytes: env::var("FETCH_MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
            max_redirects: env::var("FETCH_MAX_REDIRECTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_redirects),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".to_string());
        }
        if self.max_body_bytes == 0 {
            return Err("max_body_bytes must be greater than 0".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0".to_string(),
            max_body_bytes: 50 * 1024 * 1024,
            max_redirects: 10,
        }
    }
}

/// Configuration for OCR and PDF rasterization
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Tesseract language model (default: "chi_tra")
    pub language: String,
    /// Rasterization resolution for scanned PDFs (default: 300)
    pub dpi: u32,
    /// Maximum PDF pages rasterized for OCR (default: 50)
    pub max_pages: usize,
    /// Tesseract executable (default: "tesseract")
    pub tesseract_bin: String,
    /// Poppler rasterizer executable (default: "pdftoppm")
    pub pdftoppm_bin: String,
}

impl OcrConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            language: env::var("OCR_LANGUAGE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.language),
            dpi: env::var("OCR_DPI")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.dpi),
            max_pages: env::var("OCR_MAX_PAGES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_pages),
            tesseract_bin: env::var("TESSERACT_BIN").unwrap_or(defaults.tesseract_bin),
            pdftoppm_bin: env::var("PDFTOPPM_BIN").unwrap_or(defaults.pdftoppm_bin),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.dpi < MIN_OCR_DPI {
            return Err(format!("dpi must be at least {}", MIN_OCR_DPI));
        }
        if self.max_pages == 0 {
            return Err("max_pages must be at least 1".to_string());
        }
        if self.language.trim().is_empty() {
            return Err("language must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "chi_tra".to_string(),
            dpi: MIN_OCR_DPI,
            max_pages: 50,
            tesseract_bin: "tesseract".to_string(),
            pdftoppm_bin: "pdftoppm".to_string(),
        }
    }
}
