//! DTOs for the link shortening endpoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use super::link::LinkResponse;
use crate::domain::entities::{LinkRequest, MAX_VALIDITY_MINUTES};

/// Most URLs accepted in one request.
pub const MAX_BATCH_SIZE: u64 = 5;

/// Custom codes may be empty, which asks for a generated one.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]*$").unwrap());

/// Request to shorten one or more URLs.
///
/// The batch is created whole or rejected whole.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(max = MAX_BATCH_SIZE, message = "At most 5 URLs per request"), nested)]
    pub urls: Vec<UrlItem>,
}

/// Individual URL to be shortened.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UrlItem {
    /// The original URL. Blank entries are skipped.
    #[serde(default)]
    pub url: String,

    #[validate(length(max = 32))]
    #[validate(regex(path = *CUSTOM_CODE_REGEX, message = "Use letters, digits, '-' or '_'"))]
    pub custom_code: Option<String>,

    /// Minutes until expiry; missing or non-positive means 30.
    #[validate(range(max = MAX_VALIDITY_MINUTES))]
    pub validity_minutes: Option<i64>,
}

impl From<UrlItem> for LinkRequest {
    fn from(item: UrlItem) -> Self {
        LinkRequest {
            url: item.url,
            custom_code: item.custom_code,
            validity_minutes: item.validity_minutes,
        }
    }
}

/// Records created by a successful batch.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub created: usize,
    pub items: Vec<LinkResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ShortenRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_request() {
        let request = parse(json!({
            "urls": [
                { "url": "https://example.com" },
                { "url": "https://rust-lang.org", "custom_code": "rust_1", "validity_minutes": 60 },
                { "url": "https://docs.rs", "custom_code": "" }
            ]
        }));

        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_too_many_urls() {
        let urls: Vec<_> = (0..6)
            .map(|i| json!({ "url": format!("https://example.com/{i}") }))
            .collect();

        assert!(parse(json!({ "urls": urls })).validate().is_err());
    }

    #[test]
    fn test_custom_code_charset_and_length() {
        let bad_chars = parse(json!({ "urls": [{ "url": "https://a.example", "custom_code": "a b" }] }));
        assert!(bad_chars.validate().is_err());

        let too_long = parse(json!({
            "urls": [{ "url": "https://a.example", "custom_code": "x".repeat(33) }]
        }));
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_validity_upper_bound() {
        let request = parse(json!({
            "urls": [{ "url": "https://a.example", "validity_minutes": 525_601 }]
        }));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_converts_to_link_request() {
        let item = UrlItem {
            url: "https://a.example".to_string(),
            custom_code: Some("abc".to_string()),
            validity_minutes: Some(5),
        };

        assert_eq!(
            LinkRequest::from(item),
            LinkRequest::new("https://a.example")
                .with_custom_code("abc")
                .with_validity_minutes(5)
        );
    }
}
