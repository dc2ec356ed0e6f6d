#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use quicklink::application::services::LinkService;
use quicklink::domain::entities::{Link, LinkRequest};
use quicklink::infrastructure::persistence::MemoryStore;
use quicklink::infrastructure::telemetry::TelemetryClient;
use quicklink::routes::router;
use quicklink::state::AppState;

pub const BASE_URL: &str = "http://qk.test";

pub fn create_test_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let links = LinkService::new(store.clone(), TelemetryClient::disabled());
    let state = AppState::new(links, TelemetryClient::disabled(), BASE_URL);

    (state, store)
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

pub async fn create_test_link(state: &AppState, code: &str, url: &str) -> Link {
    create_link_at(state, code, url, 30, Utc::now()).await
}

/// A one-minute link created ten minutes ago.
pub async fn create_expired_link(state: &AppState, code: &str, url: &str) -> Link {
    create_link_at(state, code, url, 1, Utc::now() - Duration::minutes(10)).await
}

pub async fn create_link_at(
    state: &AppState,
    code: &str,
    url: &str,
    validity_minutes: i64,
    created_at: DateTime<Utc>,
) -> Link {
    let request = LinkRequest::new(url)
        .with_custom_code(code)
        .with_validity_minutes(validity_minutes);

    state
        .links
        .lock()
        .await
        .create(vec![request], created_at)
        .unwrap()
        .remove(0)
}

pub async fn click_count(state: &AppState, code: &str) -> u64 {
    state
        .links
        .lock()
        .await
        .find_by_code(code)
        .map(|link| link.click_count())
        .unwrap()
}
