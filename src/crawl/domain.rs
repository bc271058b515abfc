// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Registrable-domain resolution

use url::{Host, Url};

/// Registrable domain of a URL (e.g. `news.bbc.co.uk` → `bbc.co.uk`)
///
/// `None` for unparseable URLs, IP hosts, and hosts that are themselves a
/// public suffix.
pub fn registrable_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = match parsed.host()? {
        Host::Domain(domain) => domain.trim_end_matches('.').to_ascii_lowercase(),
        Host::Ipv4(_) | Host::Ipv6(_) => return None,
    };
    psl::domain_str(&host).map(str::to_string)
}

/// Path and query of a URL, the part a crawl policy is evaluated against
pub fn policy_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        Err(_) => "/".to_string(),
    }
}
