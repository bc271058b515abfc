// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the acquisition pipeline

use std::env;
use std::time::Duration;

/// Configuration for the acquisition pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Hits gated and fetched concurrently (default: 1, fully sequential)
    pub concurrency: usize,
    /// Fetches allowed per domain per minute (default: 60)
    pub domain_rate_per_minute: u32,
    /// Timeout handed to every content fetch in seconds (default: 10)
    pub fetch_timeout_secs: u64,
}

impl PipelineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            concurrency: env::var("PIPELINE_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.concurrency),
            domain_rate_per_minute: env::var("PIPELINE_DOMAIN_RATE_PER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.domain_rate_per_minute),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout_secs),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 {
            return Err("concurrency must be at least 1".to_string());
        }
        if self.domain_rate_per_minute == 0 {
            return Err("domain_rate_per_minute must be at least 1".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            domain_rate_per_minute: 60,
            fetch_timeout_secs: 10,
        }
    }
}
