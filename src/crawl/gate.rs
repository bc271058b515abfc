// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crawl-permission gate
//!
//! Decides, per URL, whether the publishing domain permits automated
//! retrieval. The gate never errors: every failure resolves to allow, or to
//! deny when the unreachable-policy case is configured fail-closed.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use texting_robots::Robot;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::cache::PolicyCache;
use super::config::CrawlConfig;
use super::domain::{policy_path, registrable_domain};
use super::policy::{HttpPolicySource, PolicyFetch, PolicySource};
use crate::errors::AcquisitionError;

/// What the decision was based on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyBasis {
    /// Policy checks switched off
    Disabled,
    /// No registrable domain could be derived
    NoDomain,
    /// Published rules were evaluated
    Rules,
    /// The domain publishes no policy
    Absent,
    /// The policy could not be retrieved
    Unreachable,
    /// The published policy could not be parsed
    Unparseable,
}

/// Permission decision for one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainPolicy {
    pub domain: Option<String>,
    pub allow: bool,
    pub basis: PolicyBasis,
}

impl DomainPolicy {
    fn new(domain: Option<String>, allow: bool, basis: PolicyBasis) -> Self {
        Self {
            domain,
            allow,
            basis,
        }
    }
}

/// Decides whether a URL may be fetched
#[async_trait]
pub trait CrawlPolicy: Send + Sync {
    async fn evaluate(&self, url: &str) -> DomainPolicy;

    async fn is_allowed(&self, url: &str) -> bool {
        self.evaluate(url).await.allow
    }
}

/// Permits everything; used when policy checks are disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl CrawlPolicy for AllowAll {
    async fn evaluate(&self, url: &str) -> DomainPolicy {
        DomainPolicy::new(registrable_domain(url), true, PolicyBasis::Disabled)
    }
}

/// robots.txt-backed gate with a per-domain TTL cache
pub struct CrawlPermissionGate {
    source: Arc<dyn PolicySource>,
    cache: PolicyCache,
    /// One policy fetch at a time per domain
    fetching: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    config: CrawlConfig,
}

impl CrawlPermissionGate {
    pub fn new(config: CrawlConfig, source: Arc<dyn PolicySource>) -> Self {
        let cache = PolicyCache::new(config.cache_ttl_secs, config.max_cache_entries);
        Self {
            source,
            cache,
            fetching: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Gate fetching policies over HTTP
    pub fn over_http(config: CrawlConfig) -> Result<Self, AcquisitionError> {
        config.validate().map_err(AcquisitionError::Configuration)?;
        let source = HttpPolicySource::new(config.policy_timeout())?;
        Ok(Self::new(config, Arc::new(source)))
    }

    /// Build the configured policy: the HTTP gate, or [`AllowAll`] when disabled
    pub fn from_config(config: CrawlConfig) -> Result<Arc<dyn CrawlPolicy>, AcquisitionError> {
        if !config.enabled {
            info!("Crawl policy checks disabled");
            return Ok(Arc::new(AllowAll));
        }
        Ok(Arc::new(Self::over_http(config)?))
    }

    pub fn cache(&self) -> &PolicyCache {
        &self.cache
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    async fn policy_for(&self, domain: &str) -> PolicyFetch {
        if let Some(cached) = self.cache.get(domain) {
            debug!("Policy cache hit: {}", domain);
            return cached;
        }

        let slot = {
            let mut fetching = self.fetching.lock().await;
            // Only the map holds idle slots
            fetching.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(fetching.entry(domain.to_string()).or_default())
        };
        let _guard = slot.lock().await;

        // A concurrent caller may have fetched it while we waited
        if let Some(cached) = self.cache.get(domain) {
            return cached;
        }
        let outcome = self.source.fetch_policy(domain).await;
        self.cache.insert(domain, outcome.clone());
        outcome
    }

    fn decide(&self, domain: String, outcome: &PolicyFetch, url: &str) -> DomainPolicy {
        match outcome {
            PolicyFetch::Rules(body) => match Robot::new(&self.config.user_agent, body.as_bytes()) {
                Ok(robot) => {
                    let allow = robot.allowed(&policy_path(url));
                    DomainPolicy::new(Some(domain), allow, PolicyBasis::Rules)
                }
                Err(e) => {
                    warn!("Unparseable crawl policy for {}: {}", domain, e);
                    DomainPolicy::new(Some(domain), true, PolicyBasis::Unparseable)
                }
            },
            PolicyFetch::Absent { status } => {
                debug!("No crawl policy for {} (HTTP {})", domain, status);
                DomainPolicy::new(Some(domain), true, PolicyBasis::Absent)
            }
            PolicyFetch::Unreachable(reason) => {
                let allow = !self.config.fail_closed;
                warn!(
                    "Crawl policy for {} unreachable ({}); {}",
                    domain,
                    reason,
                    if allow { "allowing" } else { "denying" }
                );
                DomainPolicy::new(Some(domain), allow, PolicyBasis::Unreachable)
            }
        }
    }
}

#[async_trait]
impl CrawlPolicy for CrawlPermissionGate {
    async fn evaluate(&self, url: &str) -> DomainPolicy {
        if !self.config.enabled {
            return AllowAll.evaluate(url).await;
        }

        let domain = match registrable_domain(url) {
            Some(domain) => domain,
            None => {
                debug!("No registrable domain for {}; allowing", url);
                return DomainPolicy::new(None, true, PolicyBasis::NoDomain);
            }
        };

        let outcome = self.policy_for(&domain).await;
        let decision = self.decide(domain, &outcome, url);
        if !decision.allow {
            info!("Crawl policy disallows: {}", url);
        }
        decision
    }
}
