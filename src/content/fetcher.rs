// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP content fetching with format dispatch
//!
//! Fetches a resource, classifies its media type and runs the matching
//! extractor. Every failure is recovered here: callers only ever see text or
//! an empty string.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::config::FetchConfig;
use super::extract::{Body, TextExtractors};
use super::format::ContentFormat;
use crate::errors::AcquisitionError;

/// Text extracted from a fetched resource
///
/// `text` is empty when fetching or extraction failed; `format` is always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub text: String,
    pub format: ContentFormat,
}

impl ExtractedContent {
    pub fn empty(format: ContentFormat) -> Self {
        Self {
            text: String::new(),
            format,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Anything that can turn a URL into extracted text
///
/// Implementations must not fail: errors resolve to empty content.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> ExtractedContent;
}

/// Content fetcher over reqwest
pub struct ContentFetcher {
    client: Client,
    extractors: Arc<TextExtractors>,
    config: FetchConfig,
}

impl ContentFetcher {
    /// Create a new content fetcher
    pub fn new(config: FetchConfig, extractors: TextExtractors) -> Result<Self, AcquisitionError> {
        config.validate().map_err(AcquisitionError::Configuration)?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| {
                AcquisitionError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            extractors: Arc::new(extractors),
            config,
        })
    }

    /// Fetch with the configured default timeout, returning plain text or empty
    pub async fn fetch_text(&self, url: &str) -> String {
        self.fetch(url, self.config.timeout()).await.text
    }

    /// Fetch and extract, surfacing the failure class
    pub async fn try_fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<ExtractedContent, AcquisitionError> {
        debug!("Fetching content from: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| describe_request_error(url, e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::network(
                url,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let format = ContentFormat::classify(&content_type, url);
        if format == ContentFormat::Unknown {
            return Err(AcquisitionError::UnsupportedFormat { content_type });
        }

        let body = self.read_body(url, response, format, timeout).await?;
        debug!("Read {} bytes of {} from {}", body.len(), format, url);

        let extractors = Arc::clone(&self.extractors);
        let text = tokio::task::spawn_blocking(move || extractors.extract(format, &body))
            .await
            .map_err(|e| AcquisitionError::parse(format, format!("extraction task failed: {}", e)))?;

        Ok(ExtractedContent { text, format })
    }

    async fn read_body(
        &self,
        url: &str,
        response: Response,
        format: ContentFormat,
        timeout: Duration,
    ) -> Result<Body, AcquisitionError> {
        let limit = self.config.max_body_bytes;
        if let Some(declared) = response.content_length() {
            if declared > limit as u64 {
                return Err(AcquisitionError::network(
                    url,
                    format!("body of {} bytes exceeds limit of {}", declared, limit),
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| describe_request_error(url, e, timeout))?;
            if bytes.len() + chunk.len() > limit {
                return Err(AcquisitionError::network(
                    url,
                    format!("body exceeds limit of {} bytes", limit),
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        if format.is_textual() {
            return Ok(Body::Text(String::from_utf8_lossy(&bytes).into_owned()));
        }
        Ok(Body::Bytes(bytes))
    }

    /// Get the configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl ContentSource for ContentFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> ExtractedContent {
        match self.try_fetch(url, timeout).await {
            Ok(content) => {
                if content.is_empty() {
                    warn!("No text extracted from {} ({})", url, content.format);
                } else {
                    info!(
                        "Extracted {} chars of {} from: {}",
                        content.text.chars().count(),
                        content.format,
                        url
                    );
                }
                content
            }
            Err(e) => {
                if e.is_recoverable() {
                    warn!("Fetch failed for {}: {}", url, e);
                } else {
                    error!("Fetch failed for {}: {}", url, e);
                }
                ExtractedContent::empty(format_hint(&e, url))
            }
        }
    }
}

fn describe_request_error(url: &str, e: reqwest::Error, timeout: Duration) -> AcquisitionError {
    if e.is_timeout() {
        AcquisitionError::network(url, format!("timed out after {:?}", timeout))
    } else {
        AcquisitionError::network(url, e)
    }
}

/// Best known format for a failed fetch
fn format_hint(error: &AcquisitionError, url: &str) -> ContentFormat {
    match error {
        AcquisitionError::ParseFailure { format, .. } => *format,
        AcquisitionError::UnsupportedFormat { .. } => ContentFormat::Unknown,
        _ => ContentFormat::classify("", url),
    }
}
