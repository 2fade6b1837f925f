//! Persisted data model shared by every component.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Gallery image identifier (milliseconds since epoch, bumped for uniqueness).
pub type ImageId = i64;

// ─── Reviews ───────────────────────────────────────────────────────────────

/// A stored visitor review. Never edited after it lands in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "saturating_rating")]
    pub rating: u8,
    pub message: String,
    /// ISO-8601: either a plain date (`2024-10-06`) or a full RFC 3339 instant.
    pub created: String,
}

impl Review {
    /// Calendar date of `created`, accepting both stored forms.
    pub fn created_date(&self) -> Option<NaiveDate> {
        if let Ok(at) = DateTime::parse_from_rfc3339(&self.created) {
            return Some(at.with_timezone(&Utc).date_naive());
        }
        NaiveDate::parse_from_str(&self.created, "%Y-%m-%d").ok()
    }

    /// Location with empty strings treated as absent.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.trim().is_empty())
    }
}

/// Stored ratings are read leniently: any number or numeric string is
/// rounded and saturated into `0..=5`; anything else counts as 0.
fn saturating_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if !raw.is_finite() {
        return Ok(0);
    }
    Ok(raw.round().clamp(0.0, 5.0) as u8)
}

/// Unvalidated review input as it arrives from a form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub rating: i64,
    pub message: String,
}

// ─── Gallery ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GalleryImage {
    pub id: ImageId,
    /// Embedded `data:` URL of the image.
    pub src: String,
    pub timestamp: DateTime<Utc>,
}

// ─── Admin ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

impl AdminAccount {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    pub is_logged_in: bool,
    pub current_admin: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(created: &str) -> Review {
        Review {
            name: "Asha".into(),
            location: None,
            rating: 4,
            message: "Lovely".into(),
            created: created.into(),
        }
    }

    #[test]
    fn test_created_date_accepts_both_forms() {
        let plain = review("2024-10-06");
        assert_eq!(plain.created_date(), NaiveDate::from_ymd_opt(2024, 10, 6));

        let instant = review("2025-03-01T18:30:00.000Z");
        assert_eq!(instant.created_date(), NaiveDate::from_ymd_opt(2025, 3, 1));

        assert_eq!(review("yesterday").created_date(), None);
    }

    #[test]
    fn test_blank_location_is_absent() {
        let mut r = review("2024-10-06");
        r.location = Some("  ".into());
        assert_eq!(r.location(), None);
        r.location = Some("Daly City".into());
        assert_eq!(r.location(), Some("Daly City"));
    }

    #[test]
    fn test_stored_rating_saturates_into_range() {
        let parse = |rating: &str| -> u8 {
            let json = format!(
                r#"{{"name":"A","message":"B","created":"2024-01-01","rating":{rating}}}"#
            );
            serde_json::from_str::<Review>(&json).unwrap().rating
        };
        assert_eq!(parse("300"), 5);
        assert_eq!(parse("-1"), 0);
        assert_eq!(parse("4.4"), 4);
        assert_eq!(parse("4.5"), 5);
        assert_eq!(parse(r#""3""#), 3);
        assert_eq!(parse(r#""great""#), 0);
        assert_eq!(parse("null"), 0);
    }

    #[test]
    fn test_review_tolerates_missing_optional_fields() {
        let r: Review =
            serde_json::from_str(r#"{"name":"A","message":"B","created":"2024-01-01"}"#).unwrap();
        assert_eq!(r.rating, 0);
        assert!(r.location.is_none());
    }
}
