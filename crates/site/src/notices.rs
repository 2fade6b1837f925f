//! Auto-expiring notices ("3 images deleted successfully!").

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

/// Holds the single notice currently on screen. Posting replaces it.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            ttl: Duration::milliseconds(ttl_ms.min(i64::MAX as u64) as i64),
            current: None,
        }
    }

    pub fn post(&mut self, message: impl Into<String>) -> &Notice {
        self.post_at(message, Utc::now())
    }

    pub fn post_at(&mut self, message: impl Into<String>, now: DateTime<Utc>) -> &Notice {
        self.current.insert(Notice {
            message: message.into(),
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        })
    }

    /// The notice visible at `now`, if it has not expired.
    pub fn active_at(&self, now: DateTime<Utc>) -> Option<&Notice> {
        self.current.as_ref().filter(|n| now < n.expires_at)
    }

    pub fn active(&self) -> Option<&Notice> {
        self.active_at(Utc::now())
    }

    /// Most recent notice regardless of expiry.
    pub fn last(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

/// "1 image" / "3 images".
pub(crate) fn images(n: usize) -> String {
    if n == 1 {
        "1 image".to_string()
    } else {
        format!("{n} images")
    }
}
