//! Integration tests for the ttlbin HTTP API and pages.

mod support;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};
use support::{setup_offline_server, setup_server, setup_test_server, TEST_MAX_PASTE_SIZE};
use ttlbin_core::ids::generate_id;
use ttlbin_server::{request_body_limit, Database};

fn now_header() -> HeaderName {
    HeaderName::from_static("x-test-now-ms")
}

fn at(ms: i64) -> HeaderValue {
    HeaderValue::from_str(&ms.to_string()).expect("header value")
}

async fn create(server: &TestServer, body: Value) -> String {
    let response = server.post("/api/pastes").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    created["id"].as_str().expect("id").to_string()
}

async fn created_at(db: &Database, id: &str) -> i64 {
    db.pastes
        .get(id)
        .await
        .expect("get")
        .expect("stored paste")
        .created_at
}

async fn fetch_at(server: &TestServer, id: &str, now_ms: i64) -> TestResponse {
    server
        .get(&format!("/api/pastes/{}", id))
        .add_header(now_header(), at(now_ms))
        .await
}

fn assert_error(response: &TestResponse, status: StatusCode, message: &str) {
    assert_eq!(response.status_code(), status);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": message }));
}

#[tokio::test]
async fn create_returns_201_with_id_and_share_url() {
    let (server, _temp, _db) = setup_test_server();

    let response = server
        .post("/api/pastes")
        .json(&json!({ "content": "Hello, World!" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    let id = created["id"].as_str().expect("id");
    assert_eq!(id.len(), 21);
    let url = created["url"].as_str().expect("url");
    assert!(url.starts_with("http://"), "url: {}", url);
    assert!(url.ends_with(&format!("/p/{}", id)), "url: {}", url);
}

#[tokio::test]
async fn share_url_follows_forwarded_proto() {
    let (server, _temp, _db) = setup_test_server();

    let response = server
        .post("/api/pastes")
        .add_header(
            HeaderName::from_static("x-forwarded-proto"),
            HeaderValue::from_static("https"),
        )
        .json(&json!({ "content": "proxied" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    let id = created["id"].as_str().expect("id");
    let url = created["url"].as_str().expect("url");
    assert!(url.starts_with("https://"), "url: {}", url);
    assert!(url.ends_with(&format!("/p/{}", id)), "url: {}", url);
}

#[tokio::test]
async fn round_trip_without_limits_returns_content_and_nulls() {
    let (server, _temp, _db) = setup_test_server();
    let id = create(&server, json!({ "content": "hello\nworld" })).await;

    let response = server.get(&format!("/api/pastes/{}", id)).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let paste: Value = response.json();
    assert_eq!(
        paste,
        json!({
            "content": "hello\nworld",
            "remaining_views": null,
            "expires_at": null,
        })
    );
}

#[tokio::test]
async fn view_quota_allows_exactly_max_views_reads() {
    let (server, _temp, _db) = setup_test_server();
    let id = create(&server, json!({ "content": "limited", "max_views": 2 })).await;

    for remaining in [1, 0] {
        let response = server.get(&format!("/api/pastes/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let paste: Value = response.json();
        assert_eq!(paste["remaining_views"], remaining);
    }

    let exhausted = server.get(&format!("/api/pastes/{}", id)).await;
    assert_error(&exhausted, StatusCode::NOT_FOUND, "Paste not found");
}

#[tokio::test]
async fn html_views_count_against_the_quota() {
    let (server, _temp, db) = setup_test_server();
    let id = create(&server, json!({ "content": "once", "max_views": 1 })).await;

    let page = server.get(&format!("/p/{}", id)).await;
    assert_eq!(page.status_code(), StatusCode::OK);

    let api = server.get(&format!("/api/pastes/{}", id)).await;
    assert_error(&api, StatusCode::NOT_FOUND, "Paste not found");

    let stored = db.pastes.get(&id).await.expect("get").expect("paste");
    assert_eq!(stored.current_views, 1);
}

#[tokio::test]
async fn ttl_boundary_is_exact_under_test_clock() {
    let (server, _temp, db) = setup_test_server();
    let id = create(&server, json!({ "content": "brief", "ttl_seconds": 60 })).await;
    let expiry = created_at(&db, &id).await + 60_000;

    let before = fetch_at(&server, &id, expiry - 1).await;
    assert_eq!(before.status_code(), StatusCode::OK);
    let paste: Value = before.json();
    let expires_at = paste["expires_at"].as_str().expect("expires_at");
    assert!(expires_at.ends_with('Z'), "expires_at: {}", expires_at);

    let at_expiry = fetch_at(&server, &id, expiry).await;
    assert_error(&at_expiry, StatusCode::NOT_FOUND, "Paste not found");
}

#[tokio::test]
async fn test_clock_header_is_ignored_outside_test_mode() {
    let (server, _temp, db) = setup_server(false);
    let id = create(&server, json!({ "content": "brief", "ttl_seconds": 60 })).await;
    let far_future = created_at(&db, &id).await + 3_600_000;

    let response = fetch_at(&server, &id, far_future).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn nonexistent_and_expired_pastes_are_indistinguishable() {
    let (server, _temp, db) = setup_test_server();
    let id = create(&server, json!({ "content": "gone", "ttl_seconds": 1 })).await;
    let later = created_at(&db, &id).await + 1_000;

    let expired = fetch_at(&server, &id, later).await;
    let missing = fetch_at(&server, &generate_id(), later).await;
    let malformed = fetch_at(&server, "not-an-id", later).await;

    for response in [&expired, &missing, &malformed] {
        assert_error(response, StatusCode::NOT_FOUND, "Paste not found");
    }
    assert_eq!(expired.text(), missing.text());
}

#[tokio::test]
async fn invalid_payloads_are_rejected_with_field_messages() {
    let (server, _temp, _db) = setup_test_server();
    let cases = [
        (json!({}), "content is required and must be a non-empty string"),
        (json!({ "content": "" }), "content is required and must be a non-empty string"),
        (json!({ "content": "   \n\t" }), "content is required and must be a non-empty string"),
        (json!({ "content": 7 }), "content is required and must be a non-empty string"),
        (json!({ "content": "x", "ttl_seconds": 0 }), "ttl_seconds must be an integer >= 1"),
        (json!({ "content": "x", "ttl_seconds": 2.5 }), "ttl_seconds must be an integer >= 1"),
        (json!({ "content": "x", "max_views": -1 }), "max_views must be an integer >= 1"),
        (json!({ "content": "x", "max_views": "3" }), "max_views must be an integer >= 1"),
    ];

    for (body, message) in cases {
        let response = server.post("/api/pastes").json(&body).await;
        assert_error(&response, StatusCode::BAD_REQUEST, message);
    }
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (server, _temp, _db) = setup_test_server();

    let response = server
        .post("/api/pastes")
        .text("{\"content\": ")
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, "Invalid JSON in request body");
}

#[tokio::test]
async fn content_at_the_size_limit_is_accepted() {
    let (server, _temp, _db) = setup_test_server();
    let content = "x".repeat(TEST_MAX_PASTE_SIZE);

    let id = create(&server, json!({ "content": content, "max_views": 1 })).await;

    let response = server.get(&format!("/api/pastes/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let paste: Value = response.json();
    assert_eq!(paste["content"].as_str().map(str::len), Some(TEST_MAX_PASTE_SIZE));
}

#[tokio::test]
async fn escaped_content_under_the_limit_is_accepted() {
    let (server, _temp, _db) = setup_test_server();
    // Each newline is two bytes once JSON-encoded.
    let content = "\n".repeat(TEST_MAX_PASTE_SIZE - 4);

    let response = server
        .post("/api/pastes")
        .json(&json!({ "content": content }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn content_over_the_size_limit_is_rejected_by_validation() {
    let (server, _temp, _db) = setup_test_server();
    let content = "x".repeat(TEST_MAX_PASTE_SIZE + 1);

    let response = server
        .post("/api/pastes")
        .json(&json!({ "content": content }))
        .await;

    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        &format!("content exceeds maximum of {} bytes", TEST_MAX_PASTE_SIZE),
    );
}

#[tokio::test]
async fn bodies_over_the_transport_limit_are_rejected() {
    let (server, _temp, _db) = setup_test_server();
    let limit = request_body_limit(TEST_MAX_PASTE_SIZE);
    let content = "x".repeat(limit);

    let response = server
        .post("/api/pastes")
        .json(&json!({ "content": content }))
        .await;

    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        &format!("request body exceeds maximum of {} bytes", limit),
    );
}

#[tokio::test]
async fn paste_page_honours_test_clock_at_ttl_boundary() {
    let (server, _temp, db) = setup_test_server();
    let id = create(&server, json!({ "content": "page ttl", "ttl_seconds": 30 })).await;
    let expiry = created_at(&db, &id).await + 30_000;

    let before = server
        .get(&format!("/p/{}", id))
        .add_header(now_header(), at(expiry - 1))
        .await;
    assert_eq!(before.status_code(), StatusCode::OK);
    assert!(before.text().contains("page ttl"));

    let at_expiry = server
        .get(&format!("/p/{}", id))
        .add_header(now_header(), at(expiry))
        .await;
    assert_eq!(at_expiry.status_code(), StatusCode::NOT_FOUND);
    assert!(at_expiry.text().contains("<title>Paste Not Found</title>"));
}

#[tokio::test]
async fn healthz_reports_ok_for_a_working_store() {
    let (server, _temp, _db) = setup_test_server();

    let response = server.get("/healthz").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn storage_failures_map_to_503_and_generic_500s() {
    let (server, _temp) = setup_offline_server();

    let health = server.get("/healthz").await;
    assert_eq!(health.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = health.json();
    assert_eq!(body, json!({ "ok": false }));

    let create = server
        .post("/api/pastes")
        .json(&json!({ "content": "x" }))
        .await;
    assert_error(&create, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");

    let read = server.get(&format!("/api/pastes/{}", generate_id())).await;
    assert_error(&read, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");

    let page = server.get(&format!("/p/{}", generate_id())).await;
    assert_eq!(page.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(page.text().contains("Something went wrong!"));
    assert!(!page.text().contains("10.0.0.7"));
}

#[tokio::test]
async fn paste_page_escapes_html_and_keeps_line_breaks() {
    let (server, _temp, _db) = setup_test_server();
    let id = create(
        &server,
        json!({ "content": "<script>alert(\"x\")</script>\n& 'quoted'" }),
    )
    .await;

    let page = server.get(&format!("/p/{}", id)).await;

    assert_eq!(page.status_code(), StatusCode::OK);
    let content_type = page.header("content-type");
    assert!(content_type
        .to_str()
        .expect("content type")
        .starts_with("text/html"));
    let html = page.text();
    assert!(html.contains(&format!("<title>Paste #{}</title>", id)));
    assert!(html.contains(
        "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;<br />&amp; &#039;quoted&#039;"
    ));
    assert!(!html.contains("<script>alert"));
}

#[tokio::test]
async fn unavailable_paste_page_renders_html_404() {
    let (server, _temp, _db) = setup_test_server();

    let page = server.get(&format!("/p/{}", generate_id())).await;

    assert_eq!(page.status_code(), StatusCode::NOT_FOUND);
    let html = page.text();
    assert!(html.contains("<title>Paste Not Found</title>"));
    assert!(html.contains("has expired, or has reached its view limit"));
}

#[tokio::test]
async fn unknown_routes_render_html_404() {
    let (server, _temp, _db) = setup_test_server();

    let page = server.get("/definitely/not/here").await;

    assert_eq!(page.status_code(), StatusCode::NOT_FOUND);
    assert!(page.text().contains("404 - Page Not Found"));
}

#[tokio::test]
async fn home_page_serves_submit_form_with_security_headers() {
    let (server, _temp, _db) = setup_test_server();

    let page = server.get("/").await;

    assert_eq!(page.status_code(), StatusCode::OK);
    let html = page.text();
    assert!(html.contains("<form id=\"paste-form\">"));
    assert!(html.contains("fetch(\"/api/pastes\""));
    page.assert_header("x-content-type-options", "nosniff");
    page.assert_header("x-frame-options", "DENY");
    page.assert_contains_header("content-security-policy");
}
