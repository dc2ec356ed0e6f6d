//! Handler for registry statistics.

use axum::{Json, extract::State};
use chrono::Utc;

use crate::api::dto::stats::StatsResponse;
use crate::state::AppState;

/// Returns link counts by status and the total number of clicks.
///
/// # Endpoint
///
/// `GET /api/stats`
///
/// # Response
///
/// ```json
/// { "total": 3, "active": 2, "expired": 1, "total_clicks": 14 }
/// ```
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.links.lock().await.stats(Utc::now());
    Json(stats.into())
}
