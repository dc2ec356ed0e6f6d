//! Click entity representing a single successful resolution of a short code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a click came from.
///
/// Serialized as a plain string: `"Direct Access"`, `"Test"`, or the custom
/// tag itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickSource {
    /// A visitor followed the short URL.
    #[serde(rename = "Direct Access")]
    DirectAccess,
    /// The owner used the manual "test" action.
    Test,
    /// Any other caller-supplied tag.
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for ClickSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectAccess => f.write_str("Direct Access"),
            Self::Test => f.write_str("Test"),
            Self::Other(tag) => f.write_str(tag),
        }
    }
}

/// A timestamped click on a short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Click {
    pub timestamp: DateTime<Utc>,
    pub source: ClickSource,
}

impl Click {
    /// Creates a new Click instance.
    pub fn new(timestamp: DateTime<Utc>, source: ClickSource) -> Self {
        Self { timestamp, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_click_creation() {
        let now = Utc::now();
        let click = Click::new(now, ClickSource::Test);

        assert_eq!(click.timestamp, now);
        assert_eq!(click.source, ClickSource::Test);
    }

    #[test]
    fn test_click_source_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_value(ClickSource::DirectAccess).unwrap(),
            json!("Direct Access")
        );
        assert_eq!(serde_json::to_value(ClickSource::Test).unwrap(), json!("Test"));
        assert_eq!(
            serde_json::to_value(ClickSource::Other("QR code".to_string())).unwrap(),
            json!("QR code")
        );
    }

    #[test]
    fn test_click_source_deserializes_known_and_custom_tags() {
        let direct: ClickSource = serde_json::from_value(json!("Direct Access")).unwrap();
        let test: ClickSource = serde_json::from_value(json!("Test")).unwrap();
        let other: ClickSource = serde_json::from_value(json!("Newsletter")).unwrap();

        assert_eq!(direct, ClickSource::DirectAccess);
        assert_eq!(test, ClickSource::Test);
        assert_eq!(other, ClickSource::Other("Newsletter".to_string()));
    }

    #[test]
    fn test_click_source_display() {
        assert_eq!(ClickSource::DirectAccess.to_string(), "Direct Access");
        assert_eq!(ClickSource::Other("cli".to_string()).to_string(), "cli");
    }
}
