// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error taxonomy for content acquisition
//!
//! Recovery policy:
//! - `NetworkFailure`, `ParseFailure` and `UnsupportedFormat` are recovered at the
//!   fetch boundary and become an empty extraction result
//! - `Configuration` is fatal and surfaced before any network activity
//! - `Inference` is reported per hit; the pipeline skips the hit

use thiserror::Error;

use crate::content::ContentFormat;

/// Errors that can occur while acquiring, extracting or scoring content
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// Connection failure, timeout or non-success HTTP status
    #[error("Network failure for {url}: {reason}")]
    NetworkFailure { url: String, reason: String },

    /// Malformed document bytes for the detected format
    #[error("Failed to parse {format} content: {reason}")]
    ParseFailure {
        format: ContentFormat,
        reason: String,
    },

    /// Content type has no extraction strategy
    #[error("Unsupported content type: {content_type:?}")]
    UnsupportedFormat { content_type: String },

    /// Invalid caller configuration (e.g. fewer than two labels)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The classification oracle failed or returned an unusable distribution
    #[error("Inference error: {0}")]
    Inference(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AcquisitionError {
    pub fn network(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::NetworkFailure {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(format: ContentFormat, reason: impl ToString) -> Self {
        Self::ParseFailure {
            format,
            reason: reason.to_string(),
        }
    }

    /// Whether the fetch boundary converts this error into an empty result
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NetworkFailure { .. } | Self::ParseFailure { .. } | Self::UnsupportedFormat { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AcquisitionError>;
