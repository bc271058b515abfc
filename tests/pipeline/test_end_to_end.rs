// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// End-to-end tests: gate → real fetch + extraction → mock scoring → JSON artifact

use async_trait::async_trait;
use search_harvest::content::{ContentFetcher, ContentSource, ExtractedContent, FetchConfig};
use search_harvest::crawl::{CrawlConfig, CrawlPermissionGate, StaticPolicySource};
use search_harvest::pipeline::{
    read_results, write_results, AcquisitionPipeline, PipelineConfig, SkipReason,
};
use search_harvest::scoring::{LabelPair, MockClassifier, RelevanceScorer};
use search_harvest::search::SearchHit;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;

use crate::common::{extractors, pdf_document, spawn_server, BlankPages, Fixture, FixedOcr};

/// Routes every URL to the fixture server, keeping host and path as the path
struct Loopback {
    base: String,
    inner: ContentFetcher,
}

#[async_trait]
impl ContentSource for Loopback {
    async fn fetch(&self, url: &str, timeout: Duration) -> ExtractedContent {
        let parsed = Url::parse(url).unwrap();
        let local = format!(
            "{}/{}{}",
            self.base,
            parsed.host_str().unwrap_or_default(),
            parsed.path()
        );
        self.inner.fetch(&local, timeout).await
    }
}

struct Setup {
    pipeline: AcquisitionPipeline,
    classifier: Arc<MockClassifier>,
}

async fn setup(ocr_text: &str, concurrency: usize) -> Setup {
    let base = spawn_server(vec![
        ("/example.com/a.pdf", Fixture::ok("application/pdf", pdf_document(Some("Hello World")))),
        ("/blocked.example/x", Fixture::ok("text/html", "<p>Private</p>")),
        ("/example.com/scan.pdf", Fixture::ok("application/pdf", pdf_document(None))),
        ("/example.org/page", Fixture::ok("text/html", "<h1>Survey</h1><p>Results inside</p>")),
        ("/example.net/empty", Fixture::ok("text/html", "<script>only()</script>")),
    ])
    .await;

    let fetcher = ContentFetcher::new(
        FetchConfig::default(),
        extractors(Arc::new(FixedOcr::new(ocr_text)), Arc::new(BlankPages::new(1))),
    )
    .unwrap();

    let gate = CrawlPermissionGate::new(
        CrawlConfig::default(),
        Arc::new(StaticPolicySource::new().with_rules("blocked.example", "User-agent: *\nDisallow: /")),
    );

    let classifier = Arc::new(MockClassifier::new(0.7));
    let config = PipelineConfig {
        concurrency,
        ..PipelineConfig::default()
    };
    let pipeline = AcquisitionPipeline::new(
        Arc::new(gate),
        Arc::new(Loopback { base, inner: fetcher }),
        RelevanceScorer::new(classifier.clone(), 1),
        config,
    )
    .unwrap();

    Setup {
        pipeline,
        classifier,
    }
}

fn labels() -> LabelPair {
    LabelPair::new(&["Academic Paper", "Non-Academic"]).unwrap()
}

fn hit(url: &str) -> SearchHit {
    SearchHit::new(format!("Title for {}", url), url, "snippet")
}

#[tokio::test]
async fn test_pdf_kept_and_blocked_domain_dropped() {
    let setup = setup("", 1).await;
    let hits = vec![hit("http://example.com/a.pdf"), hit("http://blocked.example/x")];

    let report = setup.pipeline.run_with_report(&hits, &labels()).await;

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.link, "http://example.com/a.pdf");
    assert_eq!(record.title, "Title for http://example.com/a.pdf");
    assert!(record.full_text.contains("Hello World"), "got {:?}", record.full_text);
    assert!((0.0..=1.0).contains(&record.relevance_score));

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].url, "http://blocked.example/x");
    assert_eq!(report.skipped[0].reason, SkipReason::Disallowed);
}

#[tokio::test]
async fn test_scanned_pdf_without_ocr_text_is_dropped() {
    let setup = setup("", 1).await;
    let records = setup
        .pipeline
        .run(&[hit("http://example.com/scan.pdf")], &labels())
        .await;

    assert!(records.is_empty());
    assert_eq!(setup.classifier.calls(), 0);
}

#[tokio::test]
async fn test_scanned_pdf_with_ocr_text_is_kept() {
    let setup = setup("Recognized scan", 1).await;
    let records = setup
        .pipeline
        .run(&[hit("http://example.com/scan.pdf")], &labels())
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].full_text, "Recognized scan");
}

#[tokio::test]
async fn test_output_is_stable_filter_of_input() {
    let setup = setup("", 3).await;
    let hits = vec![
        hit("http://example.org/page"),
        hit("http://blocked.example/x"),
        hit("http://example.net/empty"),
        hit("http://example.com/a.pdf"),
        hit("http://example.com/missing"),
    ];

    let report = setup.pipeline.run_with_report(&hits, &labels()).await;
    let links: Vec<&str> = report.records.iter().map(|r| r.link.as_str()).collect();

    assert_eq!(links, vec!["http://example.org/page", "http://example.com/a.pdf"]);
    assert!(report.records.iter().all(|r| !r.full_text.trim().is_empty()));
    assert_eq!(report.skipped_for(SkipReason::Disallowed), 1);
    assert_eq!(report.skipped_for(SkipReason::EmptyContent), 2);
    assert_eq!(setup.classifier.calls(), 2);
}

#[tokio::test]
async fn test_records_written_and_read_back() {
    let setup = setup("", 1).await;
    let records = setup
        .pipeline
        .run(
            &[hit("http://example.com/a.pdf"), hit("http://example.org/page")],
            &labels(),
        )
        .await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("all_search_results.json");
    write_results(&path, &records).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"relevance_score\""));
    assert_eq!(read_results(&path).unwrap(), records);
}
