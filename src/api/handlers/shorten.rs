//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use validator::Validate;

use crate::api::dto::link::LinkResponse;
use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::domain::entities::LinkRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Creates short links for up to five URLs at once.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "urls": [
///     { "url": "https://example.com" },
///     { "url": "https://rust-lang.org", "custom_code": "rust", "validity_minutes": 60 }
///   ]
/// }
/// ```
///
/// # Response
///
/// `201 Created` with every new link.
///
/// # Errors
///
/// The batch is all-or-nothing; any failure creates nothing.
///
/// - 400 with `kind` `invalid_request`, `empty_batch`, `invalid_url` or
///   `duplicate_custom_code`
/// - 409 with `kind` `code_already_exists`
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let requests: Vec<LinkRequest> = payload.urls.into_iter().map(Into::into).collect();
    let now = Utc::now();

    let created = state.links.lock().await.create(requests, now)?;

    let items: Vec<LinkResponse> = created
        .iter()
        .map(|link| LinkResponse::new(link, state.short_url(link.short_code()), now))
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            created: items.len(),
            items,
        }),
    ))
}
