//! Handlers for link management endpoints (list, delete, clear, test visit).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::api::dto::link::LinkResponse;
use crate::domain::entities::ClickSource;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every link in creation order.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(State(state): State<AppState>) -> Json<Vec<LinkResponse>> {
    let now = Utc::now();
    let links = state.links.lock().await;

    Json(
        links
            .links()
            .iter()
            .map(|link| LinkResponse::new(link, state.short_url(link.short_code()), now))
            .collect(),
    )
}

/// Deletes a link by id, freeing its code.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if no link has that id.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.links.lock().await.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Removes every link.
///
/// # Endpoint
///
/// `DELETE /api/links`
pub async fn clear_links_handler(State(state): State<AppState>) -> StatusCode {
    state.links.lock().await.clear();
    StatusCode::NO_CONTENT
}

/// Records a `Test` click without redirecting.
///
/// # Endpoint
///
/// `POST /api/visits/{code}`
///
/// # Errors
///
/// Returns 404 Not Found for an unknown code and 410 Gone once expired.
pub async fn visit_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .links
        .lock()
        .await
        .record_visit(&code, Utc::now(), ClickSource::Test)?;
    Ok(StatusCode::NO_CONTENT)
}
