// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Tests for DuckDuckGoProvider against a local results page

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use search_harvest::search::{DuckDuckGoProvider, SearchConfig, SearchError, SearchProvider};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::common::{spawn_router, spawn_server, Fixture};

fn results_page(count: usize) -> String {
    results_for(&(0..count).collect::<Vec<_>>())
}

fn results_for(sites: &[usize]) -> String {
    let mut html = String::from("<html><body><div id=\"links\">");
    html.push_str(
        r#"<div class="result result--ad"><a class="result__a" href="https://ads.example/">Ad</a></div>"#,
    );
    for &i in sites {
        html.push_str(&format!(
            r#"<div class="result web-result">
                 <h2 class="result__title"><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fsite{i}.example%2Fdoc&amp;rut=x">Result {i}</a></h2>
                 <a class="result__snippet">Snippet {i}</a>
               </div>"#,
            i = i
        ));
    }
    html.push_str("</div></body></html>");
    html
}

fn provider(endpoint: String) -> DuckDuckGoProvider {
    DuckDuckGoProvider::new(SearchConfig {
        endpoint,
        ..SearchConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_search_returns_ranked_hits() {
    let base = spawn_server(vec![("/html/", Fixture::ok("text/html", results_page(3)))]).await;
    let hits = provider(format!("{}/html/", base))
        .search("rust", 10)
        .await
        .unwrap();

    assert_eq!(hits.len(), 3);
    for (i, hit) in hits.iter().enumerate() {
        assert_eq!(hit.title, format!("Result {}", i));
        assert_eq!(hit.url, format!("https://site{}.example/doc", i));
        assert_eq!(hit.snippet, format!("Snippet {}", i));
    }
}

#[tokio::test]
async fn test_search_truncates_to_max_results() {
    let base = spawn_server(vec![("/html/", Fixture::ok("text/html", results_page(10)))]).await;
    let hits = provider(format!("{}/html/", base))
        .search("rust", 4)
        .await
        .unwrap();

    assert_eq!(hits.len(), 4);
    assert_eq!(hits[3].url, "https://site3.example/doc");
}

#[tokio::test]
async fn test_challenge_page_is_rate_limit() {
    let base = spawn_server(vec![("/html/", Fixture::status(StatusCode::ACCEPTED))]).await;
    let result = provider(format!("{}/html/", base)).search("rust", 5).await;
    assert!(matches!(result, Err(SearchError::RateLimited { .. })));
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let base = spawn_server(vec![("/html/", Fixture::status(StatusCode::BAD_GATEWAY))]).await;
    let result = provider(format!("{}/html/", base)).search("rust", 5).await;
    assert!(matches!(result, Err(SearchError::ApiError { status: 502, .. })));
}

#[tokio::test]
async fn test_empty_results_page() {
    let base = spawn_server(vec![("/html/", Fixture::ok("text/html", results_page(0)))]).await;
    let hits = provider(format!("{}/html/", base))
        .search("nothing matches", 5)
        .await
        .unwrap();
    assert!(hits.is_empty());
}

/// Serves duplicated results on the first page and records every `s` offset requested
async fn paged_results(
    State(offsets): State<Arc<Mutex<Vec<usize>>>>,
    Form(form): Form<HashMap<String, String>>,
) -> axum::response::Html<String> {
    let offset = form
        .get("s")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(0);
    offsets.lock().unwrap().push(offset);

    let page = match offset {
        0 => results_for(&[0, 1, 0, 2]),
        4 => results_for(&[4, 5]),
        _ => results_for(&[]),
    };
    axum::response::Html(page)
}

#[tokio::test]
async fn test_paging_offset_counts_duplicates() {
    let offsets = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/html/", post(paged_results))
        .with_state(offsets.clone());
    let base = spawn_router(app).await;

    let hits = provider(format!("{}/html/", base))
        .search("rust", 5)
        .await
        .unwrap();

    let urls: Vec<&str> = hits.iter().map(|h| h.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://site0.example/doc",
            "https://site1.example/doc",
            "https://site2.example/doc",
            "https://site4.example/doc",
            "https://site5.example/doc",
        ]
    );
    assert_eq!(*offsets.lock().unwrap(), vec![0, 4]);
}
