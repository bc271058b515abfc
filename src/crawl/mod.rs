// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crawl-permission checks
//!
//! Resolves a URL to its registrable domain, retrieves that domain's
//! `robots.txt` once per TTL window and evaluates the URL path against it.

pub mod cache;
pub mod config;
pub mod domain;
pub mod gate;
pub mod policy;

pub use cache::{PolicyCache, PolicyCacheStats};
pub use config::CrawlConfig;
pub use domain::{policy_path, registrable_domain};
pub use gate::{AllowAll, CrawlPermissionGate, CrawlPolicy, DomainPolicy, PolicyBasis};
pub use policy::{HttpPolicySource, PolicyFetch, PolicySource, StaticPolicySource};
