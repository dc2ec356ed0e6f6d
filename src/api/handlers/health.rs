//! Handler for health check endpoint.

use axum::{Json, extract::State};

use crate::api::dto::health::HealthResponse;
use crate::state::AppState;

/// Returns service status.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// ```json
/// { "status": "ok", "version": "0.1.0", "links": 3, "telemetry": "disabled" }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let links = state.links.lock().await.len();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        links,
        telemetry: if state.telemetry.is_enabled() {
            "enabled"
        } else {
            "disabled"
        },
    })
}
