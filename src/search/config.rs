// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for web search

use std::env;
use std::time::Duration;

pub const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// Configuration for the DuckDuckGo provider
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// HTML endpoint
    pub endpoint: String,
    /// Region code (default: "wt-wt", no region)
    pub region: String,
    /// Safe-search filtering (default: off)
    pub safe_search: bool,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Upper bound on result pages fetched per query
    pub max_pages: usize,
    /// Default number of results per search
    pub default_max_results: usize,
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: env::var("SEARCH_ENDPOINT").unwrap_or(defaults.endpoint),
            region: env::var("SEARCH_REGION").unwrap_or(defaults.region),
            safe_search: env::var("SEARCH_SAFE_SEARCH")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.safe_search),
            request_timeout_ms: env::var("SEARCH_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
            max_pages: defaults.max_pages,
            default_max_results: env::var("SEARCH_MAX_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_max_results),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_ms == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }
        if self.max_pages == 0 {
            return Err("max_pages must be at least 1".to_string());
        }
        if self.default_max_results == 0 {
            return Err("default_max_results must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DDG_HTML_URL.to_string(),
            region: "wt-wt".to_string(),
            safe_search: false,
            request_timeout_ms: 10000,
            max_pages: 5,
            default_max_results: 5,
        }
    }
}
