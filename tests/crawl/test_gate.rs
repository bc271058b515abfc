// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Tests for CrawlPermissionGate over HTTP-served robots.txt files

use axum::http::StatusCode;
use search_harvest::crawl::{
    CrawlConfig, CrawlPermissionGate, CrawlPolicy, HttpPolicySource, PolicyBasis, PolicyFetch,
    PolicySource,
};
use std::sync::Arc;
use std::time::Duration;

use crate::common::{spawn_server, Fixture};

async fn policy_server() -> String {
    spawn_server(vec![
        (
            "/robots/blocked.example.txt",
            Fixture::ok("text/plain", "User-agent: *\nDisallow: /\n"),
        ),
        (
            "/robots/partial.example.txt",
            Fixture::ok(
                "text/plain",
                "User-agent: GoodBot\nDisallow:\n\nUser-agent: *\nDisallow: /private/\nAllow: /private/open\n",
            ),
        ),
        (
            "/robots/down.example.txt",
            Fixture::status(StatusCode::SERVICE_UNAVAILABLE),
        ),
        (
            "/robots/forbidden.example.txt",
            Fixture::status(StatusCode::FORBIDDEN),
        ),
    ])
    .await
}

async fn gate(fail_closed: bool) -> CrawlPermissionGate {
    let base = policy_server().await;
    let source = HttpPolicySource::new(Duration::from_secs(5))
        .unwrap()
        .with_url_template(format!("{}/robots/{{domain}}.txt", base));
    let config = CrawlConfig {
        fail_closed,
        ..CrawlConfig::default()
    };
    CrawlPermissionGate::new(config, Arc::new(source))
}

#[tokio::test]
async fn test_source_classifies_responses() {
    let base = policy_server().await;
    let source = HttpPolicySource::new(Duration::from_secs(5))
        .unwrap()
        .with_url_template(format!("{}/robots/{{domain}}.txt", base));

    assert!(matches!(
        source.fetch_policy("blocked.example").await,
        PolicyFetch::Rules(body) if body.contains("Disallow: /")
    ));
    assert_eq!(
        source.fetch_policy("nothing.example").await,
        PolicyFetch::Absent { status: 404 }
    );
    assert_eq!(
        source.fetch_policy("forbidden.example").await,
        PolicyFetch::Absent { status: 403 }
    );
    assert!(matches!(
        source.fetch_policy("down.example").await,
        PolicyFetch::Unreachable(_)
    ));
}

#[tokio::test]
async fn test_disallow_all_denies_every_path() {
    let gate = gate(false).await;
    assert!(!gate.is_allowed("http://blocked.example/x").await);
    assert!(!gate.is_allowed("https://www.blocked.example/").await);
}

#[tokio::test]
async fn test_wildcard_group_rules() {
    let gate = gate(false).await;
    assert!(gate.is_allowed("https://partial.example/public").await);
    assert!(!gate.is_allowed("https://partial.example/private/doc.pdf").await);
    assert!(gate.is_allowed("https://partial.example/private/open").await);
}

#[tokio::test]
async fn test_missing_policy_allows() {
    let gate = gate(true).await;
    let decision = gate.evaluate("https://nothing.example/a").await;
    assert!(decision.allow);
    assert_eq!(decision.basis, PolicyBasis::Absent);
}

#[tokio::test]
async fn test_server_error_fail_open_by_default() {
    let gate = gate(false).await;
    let decision = gate.evaluate("https://down.example/a").await;
    assert!(decision.allow);
    assert_eq!(decision.basis, PolicyBasis::Unreachable);
}

#[tokio::test]
async fn test_server_error_fail_closed_when_configured() {
    let gate = gate(true).await;
    assert!(!gate.is_allowed("https://down.example/a").await);
}

#[tokio::test]
async fn test_unreachable_host_fails_open() {
    let source = HttpPolicySource::new(Duration::from_secs(2))
        .unwrap()
        .with_url_template("http://127.0.0.1:1/{domain}/robots.txt");
    let gate = CrawlPermissionGate::new(CrawlConfig::default(), Arc::new(source));

    assert!(gate.is_allowed("https://example.com/page").await);
}

#[tokio::test]
async fn test_decisions_cached_per_domain() {
    let gate = gate(false).await;
    gate.is_allowed("http://blocked.example/a").await;
    gate.is_allowed("http://sub.blocked.example/b").await;
    gate.is_allowed("https://partial.example/c").await;

    assert_eq!(gate.cache().stats().domains, 2);
}
