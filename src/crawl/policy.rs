// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crawl-policy retrieval
//!
//! A [`PolicySource`] answers "what does this domain publish?". It never
//! decides; evaluation lives in the gate.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::errors::AcquisitionError;

/// Default location of a domain's crawl policy
pub const DEFAULT_POLICY_URL_TEMPLATE: &str = "http://{domain}/robots.txt";

/// Policies larger than this are truncated before evaluation
pub const MAX_POLICY_BYTES: usize = 512 * 1024;

/// Outcome of retrieving a domain's crawl policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyFetch {
    /// The domain published rules
    Rules(String),
    /// The domain answered but has no policy (4xx)
    Absent { status: u16 },
    /// The policy could not be retrieved (network error, timeout, 5xx)
    Unreachable(String),
}

/// Retrieves crawl policies by registrable domain
#[async_trait]
pub trait PolicySource: Send + Sync {
    async fn fetch_policy(&self, domain: &str) -> PolicyFetch;
}

/// Fetches `robots.txt` over HTTP
pub struct HttpPolicySource {
    client: Client,
    timeout: Duration,
    url_template: String,
}

impl HttpPolicySource {
    pub fn new(timeout: Duration) -> Result<Self, AcquisitionError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| {
                AcquisitionError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            timeout,
            url_template: DEFAULT_POLICY_URL_TEMPLATE.to_string(),
        })
    }

    /// Override where policies are fetched from; `{domain}` is substituted
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    pub fn policy_url(&self, domain: &str) -> String {
        self.url_template.replace("{domain}", domain)
    }
}

#[async_trait]
impl PolicySource for HttpPolicySource {
    async fn fetch_policy(&self, domain: &str) -> PolicyFetch {
        let url = self.policy_url(domain);
        debug!("Fetching crawl policy: {}", url);

        let response = match self.client.get(&url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return PolicyFetch::Unreachable(format!("timed out after {:?}", self.timeout))
            }
            Err(e) => return PolicyFetch::Unreachable(e.to_string()),
        };

        let status = response.status();
        if status.is_client_error() {
            return PolicyFetch::Absent {
                status: status.as_u16(),
            };
        }
        if !status.is_success() {
            return PolicyFetch::Unreachable(format!("HTTP {}", status.as_u16()));
        }

        match response.text().await {
            Ok(mut body) => {
                if body.len() > MAX_POLICY_BYTES {
                    let mut cut = MAX_POLICY_BYTES;
                    while !body.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    body.truncate(cut);
                }
                PolicyFetch::Rules(body)
            }
            Err(e) => PolicyFetch::Unreachable(e.to_string()),
        }
    }
}

/// In-memory policies keyed by domain; unknown domains are `Absent`
#[derive(Debug, Clone, Default)]
pub struct StaticPolicySource {
    policies: HashMap<String, PolicyFetch>,
}

impl StaticPolicySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(mut self, domain: &str, rules: &str) -> Self {
        self.policies
            .insert(domain.to_string(), PolicyFetch::Rules(rules.to_string()));
        self
    }

    pub fn with_outcome(mut self, domain: &str, outcome: PolicyFetch) -> Self {
        self.policies.insert(domain.to_string(), outcome);
        self
    }
}

#[async_trait]
impl PolicySource for StaticPolicySource {
    async fn fetch_policy(&self, domain: &str) -> PolicyFetch {
        self.policies
            .get(domain)
            .cloned()
            .unwrap_or(PolicyFetch::Absent { status: 404 })
    }
}
