// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for web search

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// Rate limited by the search provider
    #[error("Rate limited by {provider}")]
    RateLimited { provider: String },

    /// API error from the search provider
    #[error("Search API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Search request timed out
    #[error("Search timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Invalid search query
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("Search configuration error: {0}")]
    Configuration(String),
}
