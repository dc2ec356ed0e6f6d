//! Link entity representing a shortened URL with its validity window and clicks.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::click::Click;
use crate::utils::validation::is_well_formed_url;

/// Validity applied when a request gives none, or a non-positive one.
pub const DEFAULT_VALIDITY_MINUTES: i64 = 30;

/// Longest validity a link may have (one year).
pub const MAX_VALIDITY_MINUTES: i64 = 525_600;

/// A shortened URL record.
///
/// Everything except the click counter and history is fixed at creation.
/// Clicks can only be added through the registry, which keeps
/// `click_count == click_history.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredLink")]
pub struct Link {
    id: Uuid,
    original_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    click_count: u64,
    click_history: Vec<Click>,
}

impl Link {
    /// Creates a link with no clicks.
    ///
    /// `expires_at` is `created_at` plus the effective validity, see
    /// [`validity_window`].
    pub fn new(
        id: Uuid,
        original_url: String,
        short_code: String,
        created_at: DateTime<Utc>,
        validity_minutes: Option<i64>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            created_at,
            expires_at: created_at + validity_window(validity_minutes),
            click_count: 0,
            click_history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn short_code(&self) -> &str {
        &self.short_code
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn click_count(&self) -> u64 {
        self.click_count
    }

    /// Clicks in the order they were recorded.
    pub fn click_history(&self) -> &[Click] {
        &self.click_history
    }

    /// Returns true once `now` is past the expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Derived status at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> LinkStatus {
        if self.is_expired_at(now) {
            LinkStatus::Expired
        } else {
            LinkStatus::Active
        }
    }

    pub(crate) fn record_click(&mut self, click: Click) {
        self.click_history.push(click);
        self.click_count += 1;
    }
}

/// Converts requested minutes into the validity actually applied.
///
/// Missing or non-positive values fall back to [`DEFAULT_VALIDITY_MINUTES`];
/// anything above [`MAX_VALIDITY_MINUTES`] is clamped.
pub fn validity_window(validity_minutes: Option<i64>) -> Duration {
    let minutes = match validity_minutes {
        Some(minutes) if minutes > 0 => minutes.min(MAX_VALIDITY_MINUTES),
        _ => DEFAULT_VALIDITY_MINUTES,
    };
    Duration::minutes(minutes)
}

/// Returns the first short code carried by more than one of `links`.
pub fn find_duplicate_code(links: &[Link]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(links.len());
    links
        .iter()
        .map(Link::short_code)
        .find(|code| !seen.insert(*code))
}

/// Whether a link still resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Active,
    Expired,
}

/// Input for one entry of a creation batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRequest {
    pub url: String,
    /// Blank codes are treated as absent.
    pub custom_code: Option<String>,
    pub validity_minutes: Option<i64>,
}

impl LinkRequest {
    /// Request for `url` with a generated code and the default validity.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_custom_code(mut self, code: impl Into<String>) -> Self {
        self.custom_code = Some(code.into());
        self
    }

    pub fn with_validity_minutes(mut self, minutes: i64) -> Self {
        self.validity_minutes = Some(minutes);
        self
    }
}

/// Registry-wide counters, computed at call time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub total_clicks: u64,
}

/// On-disk shape of a [`Link`], checked before it becomes one.
#[derive(Deserialize)]
struct StoredLink {
    id: Uuid,
    original_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    click_count: u64,
    click_history: Vec<Click>,
}

impl TryFrom<StoredLink> for Link {
    type Error = String;

    fn try_from(stored: StoredLink) -> Result<Self, Self::Error> {
        if !is_well_formed_url(&stored.original_url) {
            return Err(format!(
                "link {} has an invalid original_url",
                stored.short_code
            ));
        }

        if stored.expires_at <= stored.created_at {
            return Err(format!(
                "link {} expires before it was created",
                stored.short_code
            ));
        }

        if stored.click_count != stored.click_history.len() as u64 {
            return Err(format!(
                "link {} has click_count {} but {} recorded clicks",
                stored.short_code,
                stored.click_count,
                stored.click_history.len()
            ));
        }

        Ok(Self {
            id: stored.id,
            original_url: stored.original_url,
            short_code: stored.short_code,
            created_at: stored.created_at,
            expires_at: stored.expires_at,
            click_count: stored.click_count,
            click_history: stored.click_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ClickSource;
    use serde_json::json;

    fn sample_link(validity: Option<i64>) -> Link {
        Link::new(
            Uuid::new_v4(),
            "https://example.com".to_string(),
            "abc123".to_string(),
            Utc::now(),
            validity,
        )
    }

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let link = Link::new(
            id,
            "https://example.com".to_string(),
            "abc123".to_string(),
            now,
            Some(1),
        );

        assert_eq!(link.id(), id);
        assert_eq!(link.short_code(), "abc123");
        assert_eq!(link.original_url(), "https://example.com");
        assert_eq!(link.created_at(), now);
        assert_eq!(link.expires_at(), now + Duration::minutes(1));
        assert_eq!(link.click_count(), 0);
        assert!(link.click_history().is_empty());
    }

    #[test]
    fn test_validity_defaults_to_thirty_minutes() {
        assert_eq!(validity_window(None), Duration::minutes(30));
        assert_eq!(validity_window(Some(0)), Duration::minutes(30));
        assert_eq!(validity_window(Some(-5)), Duration::minutes(30));
    }

    #[test]
    fn test_validity_is_clamped() {
        assert_eq!(
            validity_window(Some(i64::MAX)),
            Duration::minutes(MAX_VALIDITY_MINUTES)
        );
        assert_eq!(validity_window(Some(90)), Duration::minutes(90));
    }

    #[test]
    fn test_link_expiry_boundary() {
        let link = sample_link(Some(1));
        let expires_at = link.expires_at();

        assert!(!link.is_expired_at(expires_at));
        assert!(link.is_expired_at(expires_at + Duration::milliseconds(1)));
        assert_eq!(link.status_at(link.created_at()), LinkStatus::Active);
        assert_eq!(
            link.status_at(expires_at + Duration::seconds(1)),
            LinkStatus::Expired
        );
    }

    #[test]
    fn test_record_click_keeps_count_in_sync() {
        let mut link = sample_link(None);
        link.record_click(Click::new(Utc::now(), ClickSource::DirectAccess));
        link.record_click(Click::new(Utc::now(), ClickSource::Test));

        assert_eq!(link.click_count(), 2);
        assert_eq!(link.click_history().len(), 2);
        assert_eq!(link.click_history()[1].source, ClickSource::Test);
    }

    #[test]
    fn test_link_json_roundtrip() {
        let mut link = sample_link(Some(5));
        link.record_click(Click::new(Utc::now(), ClickSource::DirectAccess));

        let json = serde_json::to_string(&link).unwrap();
        let restored: Link = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, link);
    }

    #[test]
    fn test_deserialize_rejects_click_count_mismatch() {
        let value = json!({
            "id": Uuid::new_v4(),
            "original_url": "https://example.com",
            "short_code": "abc123",
            "created_at": "2025-01-01T00:00:00Z",
            "expires_at": "2025-01-01T00:30:00Z",
            "click_count": 2,
            "click_history": []
        });

        let result: Result<Link, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_inverted_window() {
        let value = json!({
            "id": Uuid::new_v4(),
            "original_url": "https://example.com",
            "short_code": "abc123",
            "created_at": "2025-01-01T00:30:00Z",
            "expires_at": "2025-01-01T00:30:00Z",
            "click_count": 0,
            "click_history": []
        });

        let result: Result<Link, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_url_with_newline() {
        let value = json!({
            "id": Uuid::new_v4(),
            "original_url": "https://example.com/a\nb",
            "short_code": "abc123",
            "created_at": "2025-01-01T00:00:00Z",
            "expires_at": "2025-01-01T00:30:00Z",
            "click_count": 0,
            "click_history": []
        });

        let result: Result<Link, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_find_duplicate_code() {
        let unique = vec![sample_link(None), {
            let mut other = sample_link(None);
            other.short_code = "xyz789".to_string();
            other
        }];
        assert_eq!(find_duplicate_code(&unique), None);

        let duplicated = vec![sample_link(None), sample_link(Some(5))];
        assert_eq!(find_duplicate_code(&duplicated), Some("abc123"));
    }

    #[test]
    fn test_link_request_builder() {
        let request = LinkRequest::new("https://rust-lang.org")
            .with_custom_code("rust")
            .with_validity_minutes(10);

        assert_eq!(request.url, "https://rust-lang.org");
        assert_eq!(request.custom_code.as_deref(), Some("rust"));
        assert_eq!(request.validity_minutes, Some(10));
    }
}
