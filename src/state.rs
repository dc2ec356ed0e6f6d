//! Shared state handed to every HTTP handler.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::application::services::LinkService;
use crate::infrastructure::telemetry::TelemetryClient;

/// Application state cloned into each request.
///
/// The registry sits behind one async mutex, so each operation runs to
/// completion before the next one starts. Telemetry delivery runs on its own
/// tasks and never holds the lock.
#[derive(Clone)]
pub struct AppState {
    pub links: Arc<Mutex<LinkService>>,
    pub telemetry: TelemetryClient,
    /// Origin used to build short URLs, without a trailing slash.
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(links: LinkService, telemetry: TelemetryClient, base_url: &str) -> Self {
        Self {
            links: Arc::new(Mutex::new(links)),
            telemetry,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Builds the public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        LinkService::short_url(&self.base_url, code)
    }
}
