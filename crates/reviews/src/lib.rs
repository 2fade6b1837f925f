//! Visitor review board: validated submissions, bounded newest-first
//! history, and the average rating shown in the metrics strip.

pub mod ledger;
pub mod seed;

pub use ledger::{average_rating, ReviewLedger};
