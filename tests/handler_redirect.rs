mod common;

use quicklink::domain::entities::ClickSource;

#[tokio::test]
async fn test_redirect_success() {
    let (state, _store) = common::create_test_state();
    common::create_test_link(&state, "redirect1", "https://example.com/target").await;
    let server = common::create_test_server(state.clone());

    let response = server.get("/redirect1").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://example.com/target");
    assert_eq!(common::click_count(&state, "redirect1").await, 1);

    let links = state.links.lock().await;
    let link = links.find_by_code("redirect1").unwrap();
    assert_eq!(link.click_history()[0].source, ClickSource::DirectAccess);
}

#[tokio::test]
async fn test_redirect_counts_every_visit() {
    let (state, _store) = common::create_test_state();
    common::create_test_link(&state, "counted", "https://example.com").await;
    let server = common::create_test_server(state.clone());

    for _ in 0..3 {
        server.get("/counted").await.assert_status(axum::http::StatusCode::TEMPORARY_REDIRECT);
    }

    assert_eq!(common::click_count(&state, "counted").await, 3);
}

#[tokio::test]
async fn test_redirect_encodes_non_ascii_target() {
    let (state, _store) = common::create_test_state();
    common::create_test_link(&state, "cafe", "https://example.com/caf\u{e9}").await;
    let server = common::create_test_server(state.clone());

    let response = server.get("/cafe").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://example.com/caf%C3%A9");
    assert_eq!(common::click_count(&state, "cafe").await, 1);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (state, _store) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.get("/nonexistent").await;

    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["details"]["kind"], "not_found");
}

#[tokio::test]
async fn test_redirect_expired_link() {
    let (state, _store) = common::create_test_state();
    common::create_expired_link(&state, "expired1", "https://example.com/old").await;
    let server = common::create_test_server(state.clone());

    let response = server.get("/expired1").await;

    assert_eq!(response.status_code(), 410);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["details"]["kind"], "expired");
    assert_eq!(common::click_count(&state, "expired1").await, 0);
}

#[tokio::test]
async fn test_redirect_trailing_slash() {
    let (state, _store) = common::create_test_state();
    common::create_test_link(&state, "slash", "https://example.com").await;
    let app = quicklink::routes::app_router(state);

    let response = tower::ServiceExt::oneshot(
        app,
        axum::http::Request::builder()
            .uri("/slash/")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), 307);
}
