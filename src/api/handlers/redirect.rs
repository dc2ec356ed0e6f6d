//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use tracing::debug;

use crate::domain::entities::ClickSource;
use crate::domain::errors::ResolutionError;
use crate::error::AppError;
use crate::infrastructure::telemetry::Stack;
use crate::state::AppState;
use crate::utils::validation::redirect_location;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code against the registry at the current instant
/// 2. Record a `Direct Access` click
/// 3. Return 307 Temporary Redirect, with the target percent-encoded
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 410 Gone if the link has expired; no click is recorded.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let result = state
        .links
        .lock()
        .await
        .resolve(&code, Utc::now(), ClickSource::DirectAccess);

    match result {
        Ok(link) => {
            debug!(code = %code, target_url = link.original_url(), "Redirecting");
            state.telemetry.info(
                Stack::Backend,
                "handler",
                format!("Redirecting to: {}", link.original_url()),
            );
            Ok(Redirect::temporary(&redirect_location(link.original_url())))
        }
        Err(e) => {
            match &e {
                ResolutionError::NotFound(code) => state.telemetry.error(
                    Stack::Backend,
                    "handler",
                    format!("Short URL not found: {code}"),
                ),
                ResolutionError::Expired(code) => state.telemetry.warn(
                    Stack::Backend,
                    "handler",
                    format!("Attempted to access expired URL: {code}"),
                ),
            }
            Err(e.into())
        }
    }
}
