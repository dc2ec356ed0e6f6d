//! HTTP delivery of telemetry events against a local mock collector.

use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use quicklink::infrastructure::telemetry::{
    DeliveryOutcome, HttpTransport, LogLevel, RetryPolicy, Stack, TelemetryClient,
    TelemetryEvent, Transport, TransportError,
};

fn client_for(server: &MockServer) -> TelemetryClient {
    let transport = HttpTransport::new(&server.base_url(), Duration::from_secs(2)).unwrap();
    TelemetryClient::new(
        Arc::new(transport),
        RetryPolicy::new(3, Duration::from_millis(10)),
    )
}

fn event() -> TelemetryEvent {
    TelemetryEvent::new(Stack::Frontend, LogLevel::Warn, "page", "Attempted to access expired URL")
}

#[tokio::test]
async fn test_posts_json_body_with_bearer_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/logs")
                .header("authorization", "Bearer secret")
                .header("content-type", "application/json")
                .json_body(json!({
                    "stack": "frontend",
                    "level": "warn",
                    "package": "page",
                    "message": "Attempted to access expired URL"
                }));
            then.status(200)
                .json_body(json!({ "logID": "abc-123", "message": "log created successfully" }));
        })
        .await;

    let client = client_for(&server);
    client.set_token("secret");

    let outcome = client.deliver(&event()).await;

    mock.assert_async().await;
    assert_eq!(
        outcome,
        DeliveryOutcome::Delivered {
            attempts: 1,
            log_id: Some("abc-123".to_string())
        }
    );
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start_async().await;
    let transport = HttpTransport::new(&server.base_url(), Duration::from_secs(2)).unwrap();
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/logs").header_missing("authorization");
            then.status(200).json_body(json!({ "logID": "x" }));
        })
        .await;

    let ack = transport.post(&event(), None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(ack.log_id.as_deref(), Some("x"));
}

#[tokio::test]
async fn test_server_error_is_retried_until_exhausted() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/logs");
            then.status(503);
        })
        .await;

    let outcome = client_for(&server).deliver(&event()).await;

    mock.assert_hits_async(3).await;
    assert_eq!(outcome, DeliveryOutcome::Exhausted { attempts: 3 });
}

#[tokio::test]
async fn test_non_json_success_body_counts_as_delivered() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/logs");
            then.status(201).body("created");
        })
        .await;

    let outcome = client_for(&server).deliver(&event()).await;

    mock.assert_hits_async(1).await;
    assert_eq!(
        outcome,
        DeliveryOutcome::Delivered {
            attempts: 1,
            log_id: None
        }
    );
}

#[tokio::test]
async fn test_status_error_from_transport() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/logs");
            then.status(401);
        })
        .await;

    let transport = HttpTransport::new(&server.base_url(), Duration::from_secs(2)).unwrap();
    let err = transport.post(&event(), Some("bad".to_string())).await.unwrap_err();

    assert!(matches!(err, TransportError::Status(status) if status.as_u16() == 401));
}

#[tokio::test]
async fn test_send_is_drained_by_shutdown() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/logs");
            then.status(200).json_body(json!({ "logID": "1" }));
        })
        .await;

    let client = client_for(&server);
    client.info(Stack::Backend, "service", "Created 1 URLs");
    client.warn(Stack::Frontend, "page", "Attempted to access expired URL");
    client.shutdown().await;

    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_invalid_events_never_reach_collector() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/logs");
            then.status(200);
        })
        .await;

    let client = client_for(&server);
    client.info(Stack::Frontend, "db", "frontend cannot log as db");
    client.log("backend", "verbose", "service", "unknown level");
    client.shutdown().await;

    mock.assert_hits_async(0).await;
}
