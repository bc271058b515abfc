// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DuckDuckGo search provider
//!
//! Implements web search using DuckDuckGo's HTML interface.
//! No API key required.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;

use super::config::SearchConfig;
use super::provider::SearchProvider;
use super::types::{SearchError, SearchHit};
use crate::content::normalize_whitespace;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// DuckDuckGo search provider (no API key required)
pub struct DuckDuckGoProvider {
    client: Client,
    config: SearchConfig,
}

impl DuckDuckGoProvider {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate().map_err(SearchError::Configuration)?;

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| SearchError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Safe-search parameter: strict or off
    fn safe_search_param(&self) -> &'static str {
        if self.config.safe_search {
            "1"
        } else {
            "-2"
        }
    }

    async fn fetch_page(&self, query: &str, offset: usize) -> Result<Vec<SearchHit>, SearchError> {
        let offset_param = offset.to_string();
        let mut form = vec![
            ("q", query),
            ("kl", self.config.region.as_str()),
            ("kp", self.safe_search_param()),
        ];
        if offset > 0 {
            form.push(("s", offset_param.as_str()));
            form.push(("dc", offset_param.as_str()));
        }

        let response = self
            .client
            .post(&self.config.endpoint)
            .timeout(self.config.request_timeout())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        timeout_ms: self.config.request_timeout_ms,
                    }
                } else {
                    SearchError::ApiError {
                        status: 0,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        // 202 is the anomaly/challenge page
        if status == StatusCode::ACCEPTED
            || status == StatusCode::TOO_MANY_REQUESTS
            || status == StatusCode::FORBIDDEN
        {
            return Err(SearchError::RateLimited {
                provider: self.name().to_string(),
            });
        }
        if !status.is_success() {
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message: "DuckDuckGo request failed".to_string(),
            });
        }

        let html = response.text().await.map_err(|e| SearchError::ApiError {
            status: 0,
            message: e.to_string(),
        })?;

        Ok(parse_ddg_html(&html, &self.config.endpoint))
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidQuery {
                reason: "query is empty".to_string(),
            });
        }

        let mut hits = Vec::new();
        let mut seen = HashSet::new();
        // Results the provider has served so far, duplicates included
        let mut offset = 0;

        for page in 0..self.config.max_pages {
            if hits.len() >= max_results {
                break;
            }

            let page_hits = self.fetch_page(query, offset).await?;
            debug!("DuckDuckGo page {} returned {} hits", page, page_hits.len());
            offset += page_hits.len();

            let before = hits.len();
            for hit in page_hits {
                if hits.len() >= max_results {
                    break;
                }
                if seen.insert(hit.url.clone()) {
                    hits.push(hit);
                }
            }
            if hits.len() == before {
                break;
            }
        }

        info!("DuckDuckGo: {} hits for \"{}\"", hits.len(), query);
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}

/// Parse a DuckDuckGo HTML results page, skipping ads
pub fn parse_ddg_html(html: &str, endpoint: &str) -> Vec<SearchHit> {
    let (result_sel, link_sel, snippet_sel) = match (
        Selector::parse("div.result"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) {
        (Ok(r), Ok(l), Ok(s)) => (r, l, s),
        _ => return Vec::new(),
    };

    let base = Url::parse(endpoint).ok();
    let document = Html::parse_document(html);

    document
        .select(&result_sel)
        .filter(|block| !block.value().classes().any(|c| c == "result--ad"))
        .filter_map(|block| {
            let link = block.select(&link_sel).next()?;
            let url = resolve_result_url(link.value().attr("href")?, base.as_ref())?;
            let title = element_text(link);
            if title.is_empty() {
                return None;
            }
            let snippet = block
                .select(&snippet_sel)
                .next()
                .map(element_text)
                .unwrap_or_default();
            Some(SearchHit {
                title,
                url,
                snippet,
            })
        })
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Actual target of a result link, unwrapping DuckDuckGo's `/l/?uddg=` redirect
fn resolve_result_url(href: &str, base: Option<&Url>) -> Option<String> {
    let absolute = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };

    let target = match absolute.query_pairs().find(|(key, _)| key == "uddg") {
        Some((_, target)) => Url::parse(&target).ok()?,
        None => absolute,
    };

    matches!(target.scheme(), "http" | "https").then(|| target.to_string())
}
