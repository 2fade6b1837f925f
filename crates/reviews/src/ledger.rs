//! Persisted, capacity-bounded review ledger.

use chrono::{SecondsFormat, Utc};
use showcase_core::{Review, ReviewDraft, ReviewRejection, ShowcaseResult};
use showcase_storage::{keys, SharedStore, StoreExt};
use tracing::{info, warn};

use crate::seed::default_reviews;

/// Clamped mean rating; `0.0` for an empty slice.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: f64 = reviews.iter().map(|r| f64::from(r.rating)).sum();
    (total / reviews.len() as f64).clamp(0.0, 5.0)
}

/// Ordered (newest first) collection of visitor reviews.
pub struct ReviewLedger {
    store: SharedStore,
    reviews: Vec<Review>,
    capacity: usize,
    average: f64,
}

impl ReviewLedger {
    /// Load the ledger, seeding it with the default reviews when nothing
    /// usable is stored yet. The seed is written back so later loads agree.
    pub fn open(store: SharedStore, capacity: usize) -> Self {
        let mut ledger = Self {
            store,
            reviews: Vec::new(),
            capacity: capacity.max(1),
            average: 0.0,
        };
        ledger.reload();
        ledger
    }

    /// Re-read the ledger from the store.
    pub fn reload(&mut self) {
        let mut reviews: Vec<Review> = self.store.get_list(keys::REVIEWS);
        if reviews.is_empty() {
            reviews = default_reviews();
            reviews.truncate(self.capacity);
            if !self.store.set(keys::REVIEWS, &reviews) {
                warn!("Seed reviews could not be persisted");
            }
            info!(count = reviews.len(), "Review ledger seeded");
        }
        reviews.truncate(self.capacity);
        self.reviews = reviews;
        self.average = average_rating(&self.reviews);
    }

    /// Validate and record a review at the head of the ledger.
    ///
    /// Invalid input leaves the ledger and the store untouched.
    pub fn submit(&mut self, draft: ReviewDraft) -> ShowcaseResult<&Review> {
        let review = validate(draft)?;

        self.reviews.insert(0, review);
        self.reviews.truncate(self.capacity);
        self.store.set(keys::REVIEWS, &self.reviews);
        self.average = average_rating(&self.reviews);

        info!(
            rating = self.reviews[0].rating,
            total = self.reviews.len(),
            "Review submitted"
        );
        Ok(&self.reviews[0])
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn average_rating(&self) -> f64 {
        self.average
    }

    /// Average rating rendered with a fixed number of decimals.
    pub fn format_average(&self, decimals: usize) -> String {
        format!("{:.*}", decimals, self.average)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

fn validate(draft: ReviewDraft) -> Result<Review, ReviewRejection> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ReviewRejection::EmptyName);
    }
    let message = draft.message.trim();
    if message.is_empty() {
        return Err(ReviewRejection::EmptyMessage);
    }
    if !(1..=5).contains(&draft.rating) {
        return Err(ReviewRejection::RatingOutOfRange(draft.rating));
    }
    let location = draft
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);

    Ok(Review {
        name: name.to_string(),
        location,
        rating: draft.rating as u8,
        message: message.to_string(),
        created: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
