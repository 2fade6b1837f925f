use showcase_core::Review;

/// Reviews written on first visit, before anyone has submitted one.
pub fn default_reviews() -> Vec<Review> {
    vec![
        Review {
            name: "Sophia R.".to_string(),
            location: Some("San Mateo".to_string()),
            rating: 5,
            message: "I've tried threading everywhere, and this is the only place that gets my brow shape perfect every time.".to_string(),
            created: "2025-10-12".to_string(),
        },
        Review {
            name: "Priya K.".to_string(),
            location: Some("Daly City".to_string()),
            rating: 5,
            message: "The glow facial is heavenly. My skin feels soft and bright for days afterwards.".to_string(),
            created: "2024-10-06".to_string(),
        },
        Review {
            name: "Karen L.".to_string(),
            location: Some("San Francisco".to_string()),
            rating: 5,
            message: "Waxing has never been this comfortable. Highly recommend the full body package.".to_string(),
            created: "2024-10-15".to_string(),
        },
    ]
}
