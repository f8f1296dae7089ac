//! End-to-end tests against a live mock Elpis server.
//!
//! Each test starts an axum router on an ephemeral port serving canned
//! envelopes, then exercises the client over real HTTP.

use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use elpis_client::{Elpis, ElpisError};
use serde_json::json;

/// Serve the router on an ephemeral port and return the server URL,
/// deliberately without the `api/` suffix so the client's normalization is
/// exercised too.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn dataset_list_preserves_order() {
    let router = Router::new().route(
        "/api/dataset/list",
        get(|| async { Json(json!({"status": 200, "data": {"list": ["b", "a", "b"]}})) }),
    );
    let client = Elpis::new(serve(router).await).unwrap();

    let names = client.dataset_list().await.unwrap();
    assert_eq!(names, vec!["b", "a", "b"]);
}

#[tokio::test]
async fn dataset_prepare_decodes_wordlist_string() {
    let router = Router::new().route(
        "/api/dataset/prepare",
        post(|| async {
            // The server double-encodes the wordlist as a JSON string.
            Json(json!({"status": 200, "data": {"wordlist": r#"{"one":3,"two":1}"#}}))
        }),
    );
    let client = Elpis::new(serve(router).await).unwrap();

    let frequencies = client.dataset_prepare().await.unwrap();
    assert_eq!(frequencies.get("one"), Some(&3));
    assert_eq!(frequencies.get("two"), Some(&1));
    assert_eq!(frequencies.len(), 2);
}

#[tokio::test]
async fn model_status_extracts_status_string() {
    let router = Router::new().route(
        "/api/model/status",
        get(|| async { Json(json!({"status": 200, "data": {"status": "training"}})) }),
    );
    let client = Elpis::new(serve(router).await).unwrap();

    assert_eq!(client.model_status().await.unwrap(), "training");
}

#[tokio::test]
async fn transcription_endpoints_share_the_status_shape() {
    let handler = || async { Json(json!({"status": 200, "data": {"status": "transcribing"}})) };
    let router = Router::new()
        .route("/api/transcription/transcribe", get(handler))
        .route("/api/transcription/status", get(handler));
    let client = Elpis::new(serve(router).await).unwrap();

    assert_eq!(client.transcription_transcribe().await.unwrap(), "transcribing");
    assert_eq!(client.transcription_status().await.unwrap(), "transcribing");
}

#[tokio::test]
async fn config_reset_accepts_empty_data() {
    let router = Router::new().route(
        "/api/config/reset",
        post(|| async { Json(json!({"status": 200, "data": {}})) }),
    );
    let client = Elpis::new(serve(router).await).unwrap();

    client.config_reset().await.unwrap();
}

#[tokio::test]
async fn application_error_carries_server_message() {
    let router = Router::new().route(
        "/api/model/list",
        get(|| async { Json(json!({"status": 500, "data": "no models trained"})) }),
    );
    let client = Elpis::new(serve(router).await).unwrap();

    let err = client.model_list().await.unwrap_err();
    assert_eq!(err.to_string(), "no models trained (status 500)");
    let response = err.response().expect("failure envelope attached");
    assert_eq!(response.status(), Some(500));
    assert_eq!(response.http_status(), Some(200));
}

#[tokio::test]
async fn non_json_body_is_reported_not_panicked() {
    let router = Router::new().route(
        "/api/pron-dict/list",
        get(|| async { "<html>busy</html>" }),
    );
    let client = Elpis::new(serve(router).await).unwrap();

    let err = client.pron_dict_list().await.unwrap_err();
    let response = err.response().expect("failure envelope attached");
    assert_eq!(response.status(), None);
    assert_eq!(response.message(), Some("Response not JSON: <html>busy</html>"));
}

#[tokio::test]
async fn connection_refused_is_a_network_error() {
    // Bind then drop to find a port with no listener.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Elpis::new(format!("http://{addr}")).unwrap();
    assert!(matches!(
        client.dataset_list().await,
        Err(ElpisError::Network(_))
    ));
}
