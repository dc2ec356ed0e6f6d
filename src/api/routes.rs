//! API route configuration.

use crate::api::handlers::{
    clear_links_handler, delete_link_handler, list_links_handler, shorten_handler, stats_handler,
    visit_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// All routes nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /shorten`        - Create up to five links at once
/// - `GET    /links`          - List every link
/// - `DELETE /links`          - Remove every link
/// - `DELETE /links/{id}`     - Remove one link
/// - `POST   /visits/{code}`  - Record a test click
/// - `GET    /stats`          - Link and click counts
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/links", get(list_links_handler).delete(clear_links_handler))
        .route("/links/{id}", delete(delete_link_handler))
        .route("/visits/{code}", post(visit_handler))
        .route("/stats", get(stats_handler))
}
