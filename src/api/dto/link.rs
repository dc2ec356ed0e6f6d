//! DTOs describing stored links.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{Click, Link, LinkStatus};

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: Uuid,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: LinkStatus,
    pub click_count: u64,
    pub click_history: Vec<Click>,
}

impl LinkResponse {
    /// Describes `link` as seen at `now`.
    pub fn new(link: &Link, short_url: String, now: DateTime<Utc>) -> Self {
        Self {
            id: link.id(),
            code: link.short_code().to_string(),
            short_url,
            original_url: link.original_url().to_string(),
            created_at: link.created_at(),
            expires_at: link.expires_at(),
            status: link.status_at(now),
            click_count: link.click_count(),
            click_history: link.click_history().to_vec(),
        }
    }
}
