//! Shared building blocks for the showcase site: error type, configuration
//! and the persisted data model.

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{LoginRejection, ReviewRejection, ShowcaseError, ShowcaseResult};
pub use types::{AdminAccount, GalleryImage, ImageId, Review, ReviewDraft, SessionState};
