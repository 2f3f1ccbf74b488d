use navsync_core::{favicon_url, CachedSnapshot, CaptureRequest};
use navsync_engine::{
    FailureKind, LinkStore, RemoteSettings, ReqwestLinkStore, AUTH_HEADER, LINK_PATH,
    STORAGE_PATH,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn store_for(server: &MockServer, secret: Option<&str>) -> ReqwestLinkStore {
    ReqwestLinkStore::new(RemoteSettings::new(
        server.uri(),
        secret.map(str::to_string),
    ))
    .unwrap()
}

#[tokio::test]
async fn fetch_snapshot_sends_secret_and_parses_body() {
    let server = MockServer::start().await;
    let expected = common::snapshot();
    Mock::given(method("GET"))
        .and(path(STORAGE_PATH))
        .and(header(AUTH_HEADER, "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&expected))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = store_for(&server, Some("s3cret"))
        .fetch_snapshot()
        .await
        .unwrap();
    assert_eq!(snapshot, expected);
}

#[tokio::test]
async fn missing_fields_default_to_empty_lists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STORAGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let snapshot = store_for(&server, Some("s3cret"))
        .fetch_snapshot()
        .await
        .unwrap();
    assert_eq!(snapshot, CachedSnapshot::default());
}

#[tokio::test]
async fn non_success_status_is_reported_with_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STORAGE_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = store_for(&server, Some("s3cret"))
        .fetch_snapshot()
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STORAGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = store_for(&server, Some("s3cret"))
        .fetch_snapshot()
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidResponse);
}

#[tokio::test]
async fn blank_secret_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_for(&server, Some("   "));
    assert!(!store.is_configured());
    let err = store.fetch_snapshot().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Configuration);
}

#[tokio::test]
async fn create_link_posts_camel_case_body() {
    let server = MockServer::start().await;
    let request = CaptureRequest::new("c1", "https://example.com/article", Some("Article"));
    Mock::given(method("POST"))
        .and(path(LINK_PATH))
        .and(header(AUTH_HEADER, "s3cret"))
        .and(body_json(json!({
            "title": "Article",
            "url": "https://example.com/article",
            "categoryId": "c1",
            "icon": favicon_url("https://example.com/article").unwrap(),
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    store_for(&server, Some("s3cret"))
        .create_link(&request)
        .await
        .unwrap();
}

#[tokio::test]
async fn unreachable_server_is_a_network_failure() {
    let store = ReqwestLinkStore::new(RemoteSettings::new(
        "http://127.0.0.1:1",
        Some("s3cret".to_string()),
    ))
    .unwrap();
    let err = store.fetch_snapshot().await.unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::Network | FailureKind::Timeout
    ));
}
