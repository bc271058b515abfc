// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Tests for ContentFetcher format dispatch against a local HTTP server

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures::stream;
use search_harvest::content::{ContentFetcher, ContentFormat, ContentSource, FetchConfig};
use search_harvest::errors::AcquisitionError;
use std::sync::Arc;
use std::time::Duration;

use crate::common::{
    extractors, pdf_document, png_bytes, spawn_router, spawn_server, BlankPages, Fixture, FixedOcr,
};

const TIMEOUT: Duration = Duration::from_secs(5);

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Fixture</title><style>body { color: red; }</style></head>
<body>
  <h1>Visible   heading</h1>
  <script>var hidden = "do not index";</script>
  <p>First paragraph.</p>
  <noscript>Enable JavaScript</noscript>
</body>
</html>"#;

struct Harness {
    base: String,
    fetcher: ContentFetcher,
    ocr: Arc<FixedOcr>,
    rasterizer: Arc<BlankPages>,
}

async fn harness(ocr_text: &str, config: FetchConfig) -> Harness {
    let base = spawn_server(vec![
        ("/page.html", Fixture::ok("text/html; charset=utf-8", PAGE)),
        ("/a.pdf", Fixture::ok("application/pdf", pdf_document(Some("Hello World")))),
        ("/scan.pdf", Fixture::ok("application/pdf", pdf_document(None))),
        ("/download.PDF", Fixture::ok("application/octet-stream", pdf_document(Some("Suffix Match")))),
        ("/receipt.png", Fixture::ok("image/png", png_bytes(64, 32))),
        ("/archive.zip", Fixture::ok("application/zip", vec![0x50, 0x4b, 0x03, 0x04])),
        ("/broken.png", Fixture::ok("image/png", vec![0x89, 0x50, 0x4e, 0x47, 0x00])),
        ("/gone", Fixture::status(StatusCode::NOT_FOUND)),
        ("/error", Fixture::status(StatusCode::INTERNAL_SERVER_ERROR)),
    ])
    .await;

    let ocr = Arc::new(FixedOcr::new(ocr_text));
    let rasterizer = Arc::new(BlankPages::new(2));
    let fetcher = ContentFetcher::new(config, extractors(ocr.clone(), rasterizer.clone())).unwrap();

    Harness {
        base,
        fetcher,
        ocr,
        rasterizer,
    }
}

#[tokio::test]
async fn test_html_visible_text_only() {
    let h = harness("", FetchConfig::default()).await;
    let content = h.fetcher.fetch(&format!("{}/page.html", h.base), TIMEOUT).await;

    assert_eq!(content.format, ContentFormat::Html);
    assert!(content.text.contains("Visible heading"));
    assert!(content.text.contains("First paragraph."));
    assert!(!content.text.contains("do not index"));
    assert!(!content.text.contains("color: red"));
    assert!(!content.text.contains("Enable JavaScript"));
}

#[tokio::test]
async fn test_pdf_text_layer_skips_ocr() {
    let h = harness("should not appear", FetchConfig::default()).await;
    let content = h.fetcher.fetch(&format!("{}/a.pdf", h.base), TIMEOUT).await;

    assert_eq!(content.format, ContentFormat::Pdf);
    assert!(content.text.contains("Hello World"), "got {:?}", content.text);
    assert_eq!(h.rasterizer.calls(), 0);
    assert_eq!(h.ocr.calls(), 0);
}

#[tokio::test]
async fn test_pdf_without_text_layer_falls_back_to_ocr() {
    let h = harness("  scanned\n page  ", FetchConfig::default()).await;
    let content = h.fetcher.fetch(&format!("{}/scan.pdf", h.base), TIMEOUT).await;

    assert_eq!(content.format, ContentFormat::Pdf);
    assert_eq!(content.text, "scanned page scanned page");
    assert_eq!(h.rasterizer.calls(), 1);
    assert_eq!(h.ocr.calls(), 2);
}

#[tokio::test]
async fn test_scanned_pdf_with_no_recognizable_text_is_empty() {
    let h = harness("   ", FetchConfig::default()).await;
    let content = h.fetcher.fetch(&format!("{}/scan.pdf", h.base), TIMEOUT).await;

    assert!(content.is_empty());
    assert_eq!(content.format, ContentFormat::Pdf);
}

#[tokio::test]
async fn test_pdf_detected_by_url_suffix() {
    let h = harness("", FetchConfig::default()).await;
    let content = h.fetcher.fetch(&format!("{}/download.PDF", h.base), TIMEOUT).await;

    assert_eq!(content.format, ContentFormat::Pdf);
    assert!(content.text.contains("Suffix Match"), "got {:?}", content.text);
}

#[tokio::test]
async fn test_image_is_ocred() {
    let h = harness("收據 總計 100", FetchConfig::default()).await;
    let content = h.fetcher.fetch(&format!("{}/receipt.png", h.base), TIMEOUT).await;

    assert_eq!(content.format, ContentFormat::Image);
    assert_eq!(content.text, "收據 總計 100");
    assert_eq!(h.ocr.calls(), 1);
}

#[tokio::test]
async fn test_corrupt_image_is_empty() {
    let h = harness("never", FetchConfig::default()).await;
    let content = h.fetcher.fetch(&format!("{}/broken.png", h.base), TIMEOUT).await;

    assert!(content.is_empty());
    assert_eq!(h.ocr.calls(), 0);
}

#[tokio::test]
async fn test_unsupported_type_is_empty() {
    let h = harness("", FetchConfig::default()).await;
    let url = format!("{}/archive.zip", h.base);

    let content = h.fetcher.fetch(&url, TIMEOUT).await;
    assert!(content.is_empty());
    assert_eq!(content.format, ContentFormat::Unknown);

    let err = h.fetcher.try_fetch(&url, TIMEOUT).await.unwrap_err();
    assert!(matches!(err, AcquisitionError::UnsupportedFormat { .. }));
}

#[tokio::test]
async fn test_error_statuses_are_network_failures() {
    let h = harness("", FetchConfig::default()).await;

    for path in ["/gone", "/error", "/missing"] {
        let url = format!("{}{}", h.base, path);
        assert!(h.fetcher.fetch(&url, TIMEOUT).await.is_empty());
        assert!(matches!(
            h.fetcher.try_fetch(&url, TIMEOUT).await,
            Err(AcquisitionError::NetworkFailure { .. })
        ));
    }
}

#[tokio::test]
async fn test_body_over_limit_is_rejected() {
    let config = FetchConfig {
        max_body_bytes: 64,
        ..FetchConfig::default()
    };
    let h = harness("never", config).await;
    let url = format!("{}/receipt.png", h.base);

    let err = h.fetcher.try_fetch(&url, TIMEOUT).await.unwrap_err();
    assert!(err.to_string().contains("exceeds limit"));
    assert_eq!(h.ocr.calls(), 0);
}

/// HTML sent in chunks with no Content-Length header
async fn chunked_html() -> impl IntoResponse {
    let chunks = stream::iter(
        (0..100).map(|_| Ok::<_, std::io::Error>("<p>streamed paragraph of html</p>")),
    );
    (
        [(header::CONTENT_TYPE, "text/html")],
        Body::from_stream(chunks),
    )
}

#[tokio::test]
async fn test_chunked_html_over_limit_is_rejected() {
    let base = spawn_router(Router::new().route("/stream.html", get(chunked_html))).await;
    let config = FetchConfig {
        max_body_bytes: 64,
        ..FetchConfig::default()
    };
    let fetcher = ContentFetcher::new(
        config,
        extractors(Arc::new(FixedOcr::new("")), Arc::new(BlankPages::new(1))),
    )
    .unwrap();
    let url = format!("{}/stream.html", base);

    let err = fetcher.try_fetch(&url, TIMEOUT).await.unwrap_err();
    assert!(err.to_string().contains("exceeds limit"));
    assert!(fetcher.fetch(&url, TIMEOUT).await.is_empty());
}

#[tokio::test]
async fn test_chunked_html_within_limit_is_read() {
    let base = spawn_router(Router::new().route("/stream.html", get(chunked_html))).await;
    let fetcher = ContentFetcher::new(
        FetchConfig::default(),
        extractors(Arc::new(FixedOcr::new("")), Arc::new(BlankPages::new(1))),
    )
    .unwrap();

    let content = fetcher
        .fetch(&format!("{}/stream.html", base), TIMEOUT)
        .await;
    assert_eq!(content.format, ContentFormat::Html);
    assert_eq!(content.text.matches("streamed paragraph of html").count(), 100);
}

#[tokio::test]
async fn test_fetch_text_uses_default_timeout() {
    let h = harness("", FetchConfig::default()).await;
    let text = h.fetcher.fetch_text(&format!("{}/page.html", h.base)).await;
    assert!(text.starts_with("Fixture") || text.contains("Visible heading"));
}
