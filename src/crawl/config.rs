// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for crawl-permission checks

use std::env;
use std::time::Duration;

/// Configuration for the crawl-permission gate
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Consult robots.txt before fetching (default: true)
    pub enabled: bool,
    /// Timeout for the robots.txt request in seconds (default: 15)
    pub policy_timeout_secs: u64,
    /// How long a fetched policy is reused for its domain (default: 3600)
    pub cache_ttl_secs: u64,
    /// Maximum cached domains (default: 1000)
    pub max_cache_entries: usize,
    /// Deny when the policy is unreachable instead of allowing (default: false)
    pub fail_closed: bool,
    /// Agent name evaluated against the policy (default: "*")
    pub user_agent: String,
}

impl CrawlConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env::var("CRAWL_POLICY_ENABLED")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.enabled),
            policy_timeout_secs: env::var("CRAWL_POLICY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.policy_timeout_secs),
            cache_ttl_secs: env::var("CRAWL_POLICY_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
            max_cache_entries: defaults.max_cache_entries,
            fail_closed: env::var("CRAWL_POLICY_FAIL_CLOSED")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.fail_closed),
            user_agent: env::var("CRAWL_USER_AGENT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.user_agent),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.policy_timeout_secs == 0 {
            return Err("policy_timeout_secs must be at least 1".to_string());
        }
        if self.max_cache_entries == 0 {
            return Err("max_cache_entries must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn policy_timeout(&self) -> Duration {
        Duration::from_secs(self.policy_timeout_secs)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            policy_timeout_secs: 15,
            cache_ttl_secs: 3600,
            max_cache_entries: 1000,
            fail_closed: false,
            user_agent: "*".to_string(),
        }
    }
}
